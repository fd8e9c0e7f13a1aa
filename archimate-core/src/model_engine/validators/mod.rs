// FICHIER : archimate-core/src/model_engine/validators/mod.rs

pub mod business_rules;
pub mod integrity_checker;
pub mod reporter;
pub mod schema;
pub mod type_validator;

use crate::model_engine::types::ModelData;
use serde::{Deserialize, Serialize};

// Re-exports pour faciliter l'usage externe
pub use business_rules::BusinessRuleValidator;
pub use integrity_checker::IntegrityChecker;
pub use reporter::{Reporter, ValidationReport};
pub use schema::{NoopSchemaValidator, SchemaOutcome, SchemaValidator, StructuralSchemaValidator};
pub use type_validator::{TypeCheck, TypeValidator};

/// Niveau de sévérité d'un problème de validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,   // Bloquant / Rouge
    Warning, // Avertissement / Jaune
    Info,    // Suggestion / Bleu
}

/// Famille de contrôle ayant produit le problème (clé des compteurs du rapport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationCategory {
    Type,
    BusinessRule,
    ReferentialIntegrity,
    Schema,
}

impl ValidationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCategory::Type => "type",
            ValidationCategory::BusinessRule => "businessRule",
            ValidationCategory::ReferentialIntegrity => "referentialIntegrity",
            ValidationCategory::Schema => "schema",
        }
    }
}

/// Représente un problème détecté dans le modèle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: ValidationCategory,
    pub rule_id: String,
    /// Entité concernée (absente pour les problèmes globaux, ex: schéma)
    pub element_id: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(
        category: ValidationCategory,
        rule_id: &str,
        element_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            category,
            rule_id: rule_id.to_string(),
            element_id: element_id.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn warning(
        category: ValidationCategory,
        rule_id: &str,
        element_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, rule_id, element_id, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Trait commun des validateurs en mode rapport : ils ne lèvent jamais d'erreur,
/// ils décrivent les problèmes trouvés.
pub trait ModelValidator: Send + Sync {
    /// Nom court, utilisé dans les traces.
    fn name(&self) -> &'static str;

    /// Valide l'ensemble du modèle (Batch).
    fn validate_full(&self, model: &ModelData) -> Vec<ValidationIssue>;
}

/// Exécute une liste de validateurs et concatène leurs résultats.
pub fn run_all(validators: &[&dyn ModelValidator], model: &ModelData) -> Vec<ValidationIssue> {
    validators
        .iter()
        .flat_map(|v| {
            let issues = v.validate_full(model);
            tracing::debug!("[{}] {} problème(s) détecté(s)", v.name(), issues.len());
            issues
        })
        .collect()
}
