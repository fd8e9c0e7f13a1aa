// FICHIER : archimate-core/src/model_engine/validators/reporter.rs

use super::{Severity, ValidationCategory, ValidationIssue};
use crate::utils::AppError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Problème enrichi de pistes de correction.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportedIssue {
    #[serde(flatten)]
    pub issue: ValidationIssue,
    pub suggestions: Vec<String>,
}

/// Rapport consolidé d'une validation explicite.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub counts: BTreeMap<ValidationCategory, usize>,
    pub issues: Vec<ReportedIssue>,
}

impl ValidationReport {
    pub fn count(&self, category: ValidationCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn issues_in(&self, category: ValidationCategory) -> impl Iterator<Item = &ReportedIssue> {
        self.issues
            .iter()
            .filter(move |r| r.issue.category == category)
    }
}

// Motif (insensible à la casse) -> suggestions. Le premier motif trouvé l'emporte.
static MESSAGE_RULES: LazyLock<Vec<(Regex, &'static [&'static str])>> = LazyLock::new(|| {
    let rules: [(&str, &'static [&'static str]); 8] = [
        (
            r"(?i)introuvable|not found",
            &[
                "Créer l'entité manquante avant de la référencer",
                "Corriger l'identifiant référencé",
            ],
        ),
        (
            r"(?i)dupliqu|duplicate",
            &[
                "Régénérer un identifiant unique (laisser le moteur le générer)",
                "Supprimer ou fusionner le doublon",
            ],
        ),
        (
            r"(?i)non autorisée",
            &[
                "Choisir un type de relation compatible avec les types des extrémités",
                "Vérifier le sens de la relation (source / cible)",
            ],
        ),
        (
            r"(?i)lui-même",
            &["Choisir une cible différente de la source"],
        ),
        (
            r"(?i)inconnu",
            &["Utiliser un type de la taxonomie ArchiMate 3 (ex : ApplicationComponent, Serving)"],
        ),
        (
            r"(?i)obligatoire|pas de nom",
            &["Renseigner le champ obligatoire avec une valeur non vide"],
        ),
        (
            r"(?i)inverse|synchronis",
            &["Recharger le modèle pour reconstruire les références inverses"],
        ),
        (
            r"(?i)mal formé|racine|espace de noms|balise",
            &["Régénérer le fichier avec l'encodeur ArchiMate puis revalider"],
        ),
    ];
    rules
        .into_iter()
        .filter_map(|(pattern, suggestions)| Regex::new(pattern).ok().map(|re| (re, suggestions)))
        .collect()
});

/// Formateur pur : fusionne des résultats de validation en un rapport.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reporter;

impl Reporter {
    /// Fusionne n'importe quel sous-ensemble de résultats.
    pub fn build<I>(groups: I) -> ValidationReport
    where
        I: IntoIterator<Item = Vec<ValidationIssue>>,
    {
        let mut counts: BTreeMap<ValidationCategory, usize> = [
            ValidationCategory::Type,
            ValidationCategory::BusinessRule,
            ValidationCategory::ReferentialIntegrity,
            ValidationCategory::Schema,
        ]
        .into_iter()
        .map(|c| (c, 0))
        .collect();

        let issues: Vec<ReportedIssue> = groups
            .into_iter()
            .flatten()
            .map(|issue| {
                *counts.entry(issue.category).or_insert(0) += 1;
                ReportedIssue {
                    suggestions: Self::suggestions_for(&issue),
                    issue,
                }
            })
            .collect();

        let error_count = issues
            .iter()
            .filter(|r| r.issue.severity == Severity::Error)
            .count();
        let warning_count = issues
            .iter()
            .filter(|r| r.issue.severity == Severity::Warning)
            .count();

        ValidationReport {
            valid: error_count == 0,
            error_count,
            warning_count,
            counts,
            issues,
        }
    }

    /// Convertit une erreur fail-fast en rapport (pour les points d'entrée « validate »).
    pub fn from_error(err: &AppError) -> ValidationReport {
        let (category, rule_id, element_id) = match err {
            // Le champ fautif figure déjà dans le message
            AppError::Validation { .. } => (ValidationCategory::Type, "TYPE_000", None),
            AppError::NotFound { id, .. } => (
                ValidationCategory::ReferentialIntegrity,
                "REF_404",
                Some(id.as_str()),
            ),
            AppError::Duplicate { id, .. } => (
                ValidationCategory::ReferentialIntegrity,
                "REF_001",
                Some(id.as_str()),
            ),
            AppError::ReferentialIntegrity { id, .. } => (
                ValidationCategory::ReferentialIntegrity,
                "REF_000",
                Some(id.as_str()),
            ),
            _ => (ValidationCategory::Schema, "SCHEMA_000", None),
        };
        Self::build([vec![ValidationIssue::error(
            category,
            rule_id,
            element_id,
            err.to_string(),
        )]])
    }

    /// Suggestions : d'abord par motif du message, sinon par catégorie.
    pub fn suggestions_for(issue: &ValidationIssue) -> Vec<String> {
        if let Some((_, suggestions)) = MESSAGE_RULES
            .iter()
            .find(|(re, _)| re.is_match(&issue.message))
        {
            return suggestions.iter().map(|s| s.to_string()).collect();
        }

        let fallback: &[&str] = match issue.category {
            ValidationCategory::Type => &["Corriger la valeur du champ signalé"],
            ValidationCategory::BusinessRule => {
                &["Revoir la relation ou la vue selon les règles ArchiMate 3"]
            }
            ValidationCategory::ReferentialIntegrity => &[
                "Supprimer avec cascade pour nettoyer les dépendances",
                "Corriger les références pendantes",
            ],
            ValidationCategory::Schema => &["Vérifier le document XML contre le schéma d'échange"],
        };
        fallback.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EntityKind;

    fn issue(category: ValidationCategory, message: &str) -> ValidationIssue {
        ValidationIssue::error(category, "T", Some("x"), message)
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = Reporter::build(Vec::<Vec<ValidationIssue>>::new());
        assert!(report.valid);
        assert_eq!(report.counts.len(), 4);
        assert_eq!(report.count(ValidationCategory::Schema), 0);
    }

    #[test]
    fn test_counts_and_validity() {
        let warning = ValidationIssue::warning(ValidationCategory::BusinessRule, "W", None, "w");
        let report = Reporter::build([
            vec![warning],
            vec![issue(ValidationCategory::Schema, "XML mal formé")],
        ]);
        assert!(!report.valid);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.count(ValidationCategory::BusinessRule), 1);
        assert_eq!(report.issues_in(ValidationCategory::Schema).count(), 1);
    }

    #[test]
    fn test_warnings_only_stay_valid() {
        let warning = ValidationIssue::warning(ValidationCategory::BusinessRule, "W", None, "w");
        assert!(Reporter::build([vec![warning]]).valid);
    }

    #[test]
    fn test_suggestions_by_message_pattern() {
        let s = Reporter::suggestions_for(&issue(
            ValidationCategory::BusinessRule,
            "Élément introuvable : 'X'",
        ));
        assert!(s[0].contains("Créer"));

        let s = Reporter::suggestions_for(&issue(
            ValidationCategory::ReferentialIntegrity,
            "Identifiant dupliqué (Vue) : v1",
        ));
        assert!(s[0].contains("Régénérer"));
    }

    #[test]
    fn test_suggestions_fallback_on_category() {
        let s = Reporter::suggestions_for(&issue(ValidationCategory::Schema, "quelque chose"));
        assert_eq!(s.len(), 1);
        assert!(s[0].contains("schéma"));
    }

    #[test]
    fn test_from_error() {
        let report = Reporter::from_error(&AppError::not_found(EntityKind::Relationship, "R9"));
        assert!(!report.valid);
        assert_eq!(report.issues[0].issue.element_id.as_deref(), Some("R9"));
        assert!(report.issues[0].suggestions[0].contains("Créer"));
    }

    #[test]
    fn test_from_validation_error_has_no_element_id() {
        let report = Reporter::from_error(&AppError::invalid_field("type", "Type inconnu : Nope"));
        let reported = &report.issues[0].issue;
        assert_eq!(reported.category, ValidationCategory::Type);
        assert_eq!(reported.element_id, None);
        assert!(reported.message.contains("Nope"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = Reporter::build([vec![issue(ValidationCategory::Type, "obligatoire")]]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["counts"]["type"], 1);
        assert_eq!(json["issues"][0]["ruleId"], "T");
        assert!(json["issues"][0]["suggestions"].is_array());
    }
}
