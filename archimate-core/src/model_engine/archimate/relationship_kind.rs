// FICHIER : archimate-core/src/model_engine/archimate/relationship_kind.rs

use crate::utils::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Les 12 types de relations acceptés.
/// `UsedBy` est l'ancien nom (ArchiMate 2) de `Serving`, conservé pour les fichiers hérités.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    Composition,
    Aggregation,
    Assignment,
    Realization,
    Serving,
    Access,
    Influence,
    Triggering,
    Flow,
    Specialization,
    Association,
    UsedBy,
}

/// Famille de la relation (classification ArchiMate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationshipCategory {
    Structural,
    Dependency,
    Dynamic,
    Other,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 12] = [
        RelationshipType::Composition,
        RelationshipType::Aggregation,
        RelationshipType::Assignment,
        RelationshipType::Realization,
        RelationshipType::Serving,
        RelationshipType::Access,
        RelationshipType::Influence,
        RelationshipType::Triggering,
        RelationshipType::Flow,
        RelationshipType::Specialization,
        RelationshipType::Association,
        RelationshipType::UsedBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Composition => "Composition",
            RelationshipType::Aggregation => "Aggregation",
            RelationshipType::Assignment => "Assignment",
            RelationshipType::Realization => "Realization",
            RelationshipType::Serving => "Serving",
            RelationshipType::Access => "Access",
            RelationshipType::Influence => "Influence",
            RelationshipType::Triggering => "Triggering",
            RelationshipType::Flow => "Flow",
            RelationshipType::Specialization => "Specialization",
            RelationshipType::Association => "Association",
            RelationshipType::UsedBy => "UsedBy",
        }
    }

    pub fn category(&self) -> RelationshipCategory {
        match self {
            RelationshipType::Composition
            | RelationshipType::Aggregation
            | RelationshipType::Assignment
            | RelationshipType::Realization => RelationshipCategory::Structural,
            RelationshipType::Serving
            | RelationshipType::UsedBy
            | RelationshipType::Access
            | RelationshipType::Influence
            | RelationshipType::Association => RelationshipCategory::Dependency,
            RelationshipType::Triggering | RelationshipType::Flow => RelationshipCategory::Dynamic,
            RelationshipType::Specialization => RelationshipCategory::Other,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        if needle.is_empty() {
            return Err(AppError::invalid_field(
                "type",
                "Le type de relation est obligatoire",
            ));
        }
        RelationshipType::ALL
            .iter()
            .find(|t| t.as_str() == needle)
            .or_else(|| {
                RelationshipType::ALL
                    .iter()
                    .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            })
            .copied()
            .ok_or_else(|| {
                AppError::invalid_field("type", format!("Type de relation inconnu : '{}'", s))
            })
    }
}
