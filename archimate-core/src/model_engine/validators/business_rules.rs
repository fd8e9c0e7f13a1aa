// FICHIER : archimate-core/src/model_engine/validators/business_rules.rs

use super::{ModelValidator, ValidationCategory, ValidationIssue};
use crate::model_engine::archimate::{rule_for, RelationshipType};
use crate::model_engine::types::{Element, ModelData, Relationship, View};
use std::collections::HashSet;

/// Validation des règles métier (mode rapport) :
/// compatibilité des extrémités, cardinalité 1-1 et intégrité des vues.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusinessRuleValidator;

impl BusinessRuleValidator {
    pub fn new() -> Self {
        Self
    }

    /// Cherche une relation jumelle (même type, même source, même cible) d'un type 1-1.
    /// `exclude` écarte la relation elle-même lors d'une mise à jour.
    pub fn find_one_to_one_twin<'a, I>(
        relationship_type: RelationshipType,
        source_id: &str,
        target_id: &str,
        exclude: Option<&str>,
        relationships: I,
    ) -> Option<&'a Relationship>
    where
        I: IntoIterator<Item = &'a Relationship>,
    {
        if !rule_for(relationship_type).is_one_to_one() {
            return None;
        }
        relationships.into_iter().find(|r| {
            Some(r.id.as_str()) != exclude
                && r.relationship_type == relationship_type
                && r.source_id == source_id
                && r.target_id == target_id
        })
    }

    /// Contrôle une relation avec ses extrémités résolues et la liste de toutes les relations.
    pub fn check_relationship<'a, I>(
        relationship: &Relationship,
        source: &Element,
        target: &Element,
        all: I,
    ) -> Vec<ValidationIssue>
    where
        I: IntoIterator<Item = &'a Relationship>,
    {
        let mut issues = Vec::new();
        let rule = rule_for(relationship.relationship_type);

        // RÈGLE 1 : Compatibilité des types d'extrémités
        if let Err(message) = rule.check(source.element_type, target.element_type) {
            issues.push(ValidationIssue::error(
                ValidationCategory::BusinessRule,
                "RULE_001",
                Some(&relationship.id),
                format!("{} (relation '{}')", message, relationship.id),
            ));
        }

        // RÈGLE 2 : Cardinalité 1-1
        if let Some(twin) = Self::find_one_to_one_twin(
            relationship.relationship_type,
            &relationship.source_id,
            &relationship.target_id,
            Some(&relationship.id),
            all,
        ) {
            issues.push(ValidationIssue::error(
                ValidationCategory::BusinessRule,
                "RULE_002",
                Some(&relationship.id),
                format!(
                    "Relation {} dupliquée entre '{}' et '{}' (cardinalité 1-1) : '{}' et '{}'",
                    relationship.relationship_type,
                    relationship.source_id,
                    relationship.target_id,
                    twin.id,
                    relationship.id
                ),
            ));
        }

        issues
    }

    /// Intégrité d'une vue : références existantes et hiérarchie cohérente.
    pub fn check_view(view: &View, model: &ModelData) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let vid = Some(view.id.as_str());

        let mut seen = HashSet::new();
        for element_id in &view.elements {
            if !model.elements.contains_key(element_id) {
                issues.push(ValidationIssue::error(
                    ValidationCategory::BusinessRule,
                    "VIEW_001",
                    vid,
                    format!(
                        "Élément introuvable : '{}' référencé par la vue '{}'",
                        element_id, view.id
                    ),
                ));
            }
            if !seen.insert(element_id.as_str()) {
                issues.push(ValidationIssue::warning(
                    ValidationCategory::BusinessRule,
                    "VIEW_005",
                    vid,
                    format!(
                        "L'élément '{}' apparaît plusieurs fois dans la vue '{}'",
                        element_id, view.id
                    ),
                ));
            }
        }

        for rel_id in &view.relationships {
            match model.relationships.get(rel_id) {
                None => issues.push(ValidationIssue::error(
                    ValidationCategory::BusinessRule,
                    "VIEW_002",
                    vid,
                    format!(
                        "Relation introuvable : '{}' référencée par la vue '{}'",
                        rel_id, view.id
                    ),
                )),
                Some(rel) => {
                    for end in [&rel.source_id, &rel.target_id] {
                        if !view.contains_element(end) {
                            issues.push(ValidationIssue::warning(
                                ValidationCategory::BusinessRule,
                                "VIEW_004",
                                vid,
                                format!(
                                    "La relation '{}' est affichée sans son extrémité '{}' dans la vue '{}'",
                                    rel.id, end, view.id
                                ),
                            ));
                        }
                    }
                }
            }
        }

        for link in &view.node_hierarchy {
            for end in [&link.parent_element, &link.child_element] {
                if !model.elements.contains_key(end) || !view.contains_element(end) {
                    issues.push(ValidationIssue::error(
                        ValidationCategory::BusinessRule,
                        "VIEW_003",
                        vid,
                        format!(
                            "Hiérarchie incohérente dans la vue '{}' : '{}' introuvable (paire {} -> {})",
                            view.id, end, link.parent_element, link.child_element
                        ),
                    ));
                }
            }
        }

        issues
    }

    /// Point d'entrée global : toutes les relations puis toutes les vues.
    pub fn validate_model_rules(model: &ModelData) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for rel in model.relationships.values() {
            // Les extrémités pendantes relèvent du contrôle d'intégrité
            if let (Some(source), Some(target)) = (
                model.elements.get(&rel.source_id),
                model.elements.get(&rel.target_id),
            ) {
                issues.extend(Self::check_relationship(
                    rel,
                    source,
                    target,
                    model.relationships.values(),
                ));
            }
        }

        for view in model.views.values() {
            issues.extend(Self::check_view(view, model));
        }

        issues
    }
}

impl ModelValidator for BusinessRuleValidator {
    fn name(&self) -> &'static str {
        "business_rules"
    }

    fn validate_full(&self, model: &ModelData) -> Vec<ValidationIssue> {
        Self::validate_model_rules(model)
    }
}
