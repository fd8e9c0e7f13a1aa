// FICHIER : archimate-core/src/utils/error.rs

use serde::Serialize;
use std::fmt;
use std::io;

// --- RE-EXPORTS ANYHOW (Pour la flexibilité du CLI) ---
pub use anyhow::{anyhow, Context};
// On renomme le Result de anyhow pour ne pas qu'il écrase le nôtre
pub use anyhow::Result as AnyResult;

/// Type de résultat standard du moteur de modèles.
pub type Result<T> = std::result::Result<T, AppError>;

/// Nature de l'entité concernée par une erreur (porte la valeur pour les messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Element,
    Relationship,
    View,
    PropertyDefinition,
    Model,
}

impl EntityKind {
    /// Préfixe utilisé par la génération d'identifiants.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EntityKind::Element => "id-element",
            EntityKind::Relationship => "id-relationship",
            EntityKind::View => "id-view",
            EntityKind::PropertyDefinition => "propid",
            EntityKind::Model => "id-model",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Element => "Élément",
            EntityKind::Relationship => "Relation",
            EntityKind::View => "Vue",
            EntityKind::PropertyDefinition => "Définition de propriété",
            EntityKind::Model => "Modèle",
        };
        f.write_str(label)
    }
}

/// Enumération centrale des erreurs du moteur.
///
/// Les quatre premières variantes forment le contrat des opérations de mutation :
/// aucune n'est fatale, toutes laissent le modèle inchangé.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Erreur de validation : {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{kind} introuvable : {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Identifiant dupliqué ({kind}) : {id}")]
    Duplicate { kind: EntityKind, id: String },

    #[error("Intégrité référentielle violée ({kind} '{id}') : {reason}")]
    ReferentialIntegrity {
        kind: EntityKind,
        id: String,
        reason: String,
        dependents: Vec<String>,
    },

    #[error("Erreur de transaction : {0}")]
    Transaction(String),

    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] io::Error),

    #[error("Erreur XML : {0}")]
    Xml(String),

    #[error("Validation de schéma échouée : {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erreur Système : {0}")]
    System(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        AppError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        AppError::Duplicate {
            kind,
            id: id.into(),
        }
    }

    pub fn integrity(
        kind: EntityKind,
        id: impl Into<String>,
        reason: impl Into<String>,
        dependents: Vec<String>,
    ) -> Self {
        AppError::ReferentialIntegrity {
            kind,
            id: id.into(),
            reason: reason.into(),
            dependents,
        }
    }

    /// Liste des dépendants portée par une erreur d'intégrité (vide sinon).
    pub fn dependents(&self) -> &[String] {
        match self {
            AppError::ReferentialIntegrity { dependents, .. } => dependents,
            _ => &[],
        }
    }
}

// Implémentation manuelle de Serialize pour renvoyer l'erreur à un hôte JSON
// (la couche protocole exige des erreurs sérialisables).
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::System(anyhow::anyhow!(s))
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::System(anyhow::anyhow!(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_carries_kind_and_id() {
        let err = AppError::not_found(EntityKind::Element, "id-42");
        assert_eq!(err.to_string(), "Élément introuvable : id-42");
    }

    #[test]
    fn test_integrity_error_lists_dependents() {
        let err = AppError::integrity(
            EntityKind::Element,
            "A",
            "dépendances existantes : R1",
            vec!["R1".to_string()],
        );
        assert_eq!(err.dependents(), ["R1".to_string()]);
        assert!(err.to_string().contains("'A'"));
        assert!(AppError::validation("x").dependents().is_empty());
    }

    #[test]
    fn test_app_error_serialization() {
        let err = AppError::duplicate(EntityKind::View, "v1");
        let json = serde_json::to_string(&err).expect("Devrait être sérialisable");
        assert_eq!(json, "\"Identifiant dupliqué (Vue) : v1\"");
    }

    #[test]
    fn test_schema_error_joins_messages() {
        let err = AppError::Schema(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Validation de schéma échouée : a; b");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "absent");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_from_string_helpers() {
        let err: AppError = "Erreur str".into();
        match err {
            AppError::System(e) => assert_eq!(e.to_string(), "Erreur str"),
            _ => panic!("&str devrait devenir AppError::System"),
        }
    }
}
