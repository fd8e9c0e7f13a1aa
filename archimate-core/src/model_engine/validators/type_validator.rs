// FICHIER : archimate-core/src/model_engine/validators/type_validator.rs

use super::{ModelValidator, ValidationCategory, ValidationIssue};
use crate::model_engine::archimate::{ElementType, RelationshipType};
use crate::model_engine::types::ModelData;
use crate::utils::{AppError, Result};

/// Résultat structuré d'un contrôle de type.
/// Le moteur de mutation le convertit en `AppError::Validation` en cas d'échec.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeCheck<T> {
    Valid(T),
    Invalid { field: String, message: String },
}

impl<T> TypeCheck<T> {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        TypeCheck::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TypeCheck::Valid(_))
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            TypeCheck::Valid(value) => Ok(value),
            TypeCheck::Invalid { field, message } => Err(AppError::invalid_field(&field, message)),
        }
    }

    fn and_then<U>(self, f: impl FnOnce(T) -> TypeCheck<U>) -> TypeCheck<U> {
        match self {
            TypeCheck::Valid(value) => f(value),
            TypeCheck::Invalid { field, message } => TypeCheck::Invalid { field, message },
        }
    }
}

/// Validation de type (fail-fast) : champs obligatoires et taxonomie fermée.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeValidator;

impl TypeValidator {
    pub fn new() -> Self {
        Self
    }

    /// Un champ texte obligatoire ne peut pas être vide après `trim`.
    pub fn check_required(field: &str, value: &str) -> TypeCheck<()> {
        if value.trim().is_empty() {
            TypeCheck::invalid(field, format!("Le champ '{}' est obligatoire", field))
        } else {
            TypeCheck::Valid(())
        }
    }

    pub fn check_element_type(value: &str) -> TypeCheck<ElementType> {
        Self::check_required("type", value).and_then(|_| match value.parse::<ElementType>() {
            Ok(t) => TypeCheck::Valid(t),
            Err(_) => TypeCheck::invalid(
                "type",
                format!("Type d'élément inconnu : '{}'", value.trim()),
            ),
        })
    }

    pub fn check_relationship_type(value: &str) -> TypeCheck<RelationshipType> {
        Self::check_required("type", value).and_then(|_| match value.parse::<RelationshipType>() {
            Ok(t) => TypeCheck::Valid(t),
            Err(_) => TypeCheck::invalid(
                "type",
                format!("Type de relation inconnu : '{}'", value.trim()),
            ),
        })
    }

    /// Contrôle complet d'un élément : nom puis type.
    pub fn check_element(element_type: &str, name: &str) -> TypeCheck<ElementType> {
        Self::check_required("name", name).and_then(|_| Self::check_element_type(element_type))
    }

    /// Contrôle complet d'une relation : champs obligatoires, type, pas de boucle.
    pub fn check_relationship(
        relationship_type: &str,
        source_id: &str,
        target_id: &str,
    ) -> TypeCheck<RelationshipType> {
        Self::check_required("type", relationship_type)
            .and_then(|_| Self::check_required("sourceId", source_id))
            .and_then(|_| Self::check_required("targetId", target_id))
            .and_then(|_| {
                if source_id.trim() == target_id.trim() {
                    TypeCheck::invalid(
                        "targetId",
                        format!(
                            "Une relation ne peut pas relier un élément à lui-même ({})",
                            source_id.trim()
                        ),
                    )
                } else {
                    Self::check_relationship_type(relationship_type)
                }
            })
    }
}

impl ModelValidator for TypeValidator {
    fn name(&self) -> &'static str {
        "type"
    }

    /// Les types sont garantis par l'énumération : on contrôle les champs obligatoires
    /// et l'absence de boucle sur les données éventuellement importées.
    fn validate_full(&self, model: &ModelData) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for el in model.elements.values() {
            if el.name.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    ValidationCategory::Type,
                    "TYPE_001",
                    Some(&el.id),
                    format!("L'élément '{}' n'a pas de nom", el.id),
                ));
            }
        }

        for rel in model.relationships.values() {
            if rel.source_id == rel.target_id {
                issues.push(ValidationIssue::error(
                    ValidationCategory::Type,
                    "TYPE_002",
                    Some(&rel.id),
                    format!(
                        "La relation '{}' relie l'élément '{}' à lui-même",
                        rel.id, rel.source_id
                    ),
                ));
            }
        }

        for view in model.views.values() {
            if view.name.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    ValidationCategory::Type,
                    "TYPE_003",
                    Some(&view.id),
                    format!("La vue '{}' n'a pas de nom", view.id),
                ));
            }
        }

        issues
    }
}
