// FICHIER : archimate-core/src/model_engine/validators/integrity_checker.rs

use super::{ModelValidator, ValidationCategory, ValidationIssue};
use crate::model_engine::types::ModelData;
use crate::utils::{AppError, EntityKind, Result};
use std::collections::HashMap;

/// Contrôle d'intégrité référentielle sur l'agrégat complet.
///
/// Deux modes : `check` (fail-fast, porte de sauvegarde) et `collect` (rapport).
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegrityChecker;

/// Violation brute, convertie en erreur ou en problème selon le mode.
struct Violation {
    error: AppError,
    element_id: String,
    rule_id: &'static str,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Lève la première violation rencontrée.
    pub fn check(model: &ModelData) -> Result<()> {
        match Self::scan(model, true).into_iter().next() {
            Some(v) => Err(v.error),
            None => Ok(()),
        }
    }

    /// Rassemble toutes les violations sous forme de problèmes.
    pub fn collect(model: &ModelData) -> Vec<ValidationIssue> {
        Self::scan(model, false)
            .into_iter()
            .map(|v| {
                ValidationIssue::error(
                    ValidationCategory::ReferentialIntegrity,
                    v.rule_id,
                    Some(&v.element_id),
                    v.error.to_string(),
                )
            })
            .collect()
    }

    fn scan(model: &ModelData, stop_at_first: bool) -> Vec<Violation> {
        let mut out = Vec::new();
        macro_rules! push {
            ($v:expr) => {{
                out.push($v);
                if stop_at_first {
                    return out;
                }
            }};
        }

        // 1. Unicité des identifiants (éléments, relations, vues)
        let mut owners: HashMap<&str, EntityKind> = HashMap::new();
        let ids = model
            .elements
            .iter()
            .map(|(k, e)| (k.as_str(), &e.id, EntityKind::Element))
            .chain(
                model
                    .relationships
                    .iter()
                    .map(|(k, r)| (k.as_str(), &r.id, EntityKind::Relationship)),
            )
            .chain(
                model
                    .views
                    .iter()
                    .map(|(k, v)| (k.as_str(), &v.id, EntityKind::View)),
            );
        for (key, id, kind) in ids {
            if key != id.as_str() {
                push!(Violation {
                    error: AppError::integrity(
                        kind,
                        id.clone(),
                        format!("clé de stockage '{}' différente de l'identifiant", key),
                        vec![],
                    ),
                    element_id: id.clone(),
                    rule_id: "REF_000",
                });
            }
            if owners.insert(key, kind).is_some() {
                push!(Violation {
                    error: AppError::duplicate(kind, key),
                    element_id: key.to_string(),
                    rule_id: "REF_001",
                });
            }
        }

        // 2. Extrémités des relations et références inverses
        for rel in model.relationships.values() {
            for (end, outgoing) in [(&rel.source_id, true), (&rel.target_id, false)] {
                match model.elements.get(end) {
                    None => push!(Violation {
                        error: AppError::integrity(
                            EntityKind::Relationship,
                            rel.id.clone(),
                            format!("extrémité introuvable : '{}'", end),
                            vec![end.clone()],
                        ),
                        element_id: rel.id.clone(),
                        rule_id: "REF_002",
                    }),
                    Some(el) => {
                        let set = if outgoing {
                            &el.outgoing_relations
                        } else {
                            &el.incoming_relations
                        };
                        if !set.contains(&rel.id) {
                            push!(Violation {
                                error: AppError::integrity(
                                    EntityKind::Element,
                                    el.id.clone(),
                                    format!("référence inverse manquante vers la relation '{}'", rel.id),
                                    vec![rel.id.clone()],
                                ),
                                element_id: el.id.clone(),
                                rule_id: "REF_003",
                            });
                        }
                    }
                }
            }
        }

        // 3. Références inverses orphelines (relation disparue ou ne pointant plus ici)
        for el in model.elements.values() {
            let stale_out = el.outgoing_relations.iter().filter(|rid| {
                model
                    .relationships
                    .get(*rid)
                    .map_or(true, |r| r.source_id != el.id)
            });
            let stale_in = el.incoming_relations.iter().filter(|rid| {
                model
                    .relationships
                    .get(*rid)
                    .map_or(true, |r| r.target_id != el.id)
            });
            let stale_views = el.in_views.iter().filter(|vid| {
                model
                    .views
                    .get(*vid)
                    .map_or(true, |v| !v.contains_element(&el.id))
            });
            let stale: Vec<String> = stale_out.chain(stale_in).chain(stale_views).cloned().collect();
            if !stale.is_empty() {
                push!(Violation {
                    error: AppError::integrity(
                        EntityKind::Element,
                        el.id.clone(),
                        format!("références inverses orphelines : {}", stale.join(", ")),
                        stale,
                    ),
                    element_id: el.id.clone(),
                    rule_id: "REF_004",
                });
            }
        }

        // 4. Références des vues
        for view in model.views.values() {
            let missing: Vec<String> = view
                .elements
                .iter()
                .filter(|id| !model.elements.contains_key(*id))
                .chain(
                    view.relationships
                        .iter()
                        .filter(|id| !model.relationships.contains_key(*id)),
                )
                .chain(
                    view.node_hierarchy
                        .iter()
                        .flat_map(|l| [&l.parent_element, &l.child_element])
                        .filter(|id| !view.contains_element(id)),
                )
                .cloned()
                .collect();
            if !missing.is_empty() {
                push!(Violation {
                    error: AppError::integrity(
                        EntityKind::View,
                        view.id.clone(),
                        format!("références introuvables : {}", missing.join(", ")),
                        missing,
                    ),
                    element_id: view.id.clone(),
                    rule_id: "REF_005",
                });
            }

            let unsynced: Vec<String> = view
                .elements
                .iter()
                .filter(|id| {
                    model
                        .elements
                        .get(*id)
                        .is_some_and(|e| !e.in_views.contains(&view.id))
                })
                .cloned()
                .collect();
            if !unsynced.is_empty() {
                push!(Violation {
                    error: AppError::integrity(
                        EntityKind::View,
                        view.id.clone(),
                        format!("appartenance non synchronisée pour : {}", unsynced.join(", ")),
                        unsynced,
                    ),
                    element_id: view.id.clone(),
                    rule_id: "REF_006",
                });
            }
        }

        out
    }
}

impl ModelValidator for IntegrityChecker {
    fn name(&self) -> &'static str {
        "integrity"
    }

    fn validate_full(&self, model: &ModelData) -> Vec<ValidationIssue> {
        Self::collect(model)
    }
}
