// FICHIER : archimate-core/src/model_engine/manipulator/relationships.rs

use super::{ids, ModelManipulator};
use crate::model_engine::archimate::{rule_for, RelationshipType};
use crate::model_engine::transactions::Operation;
use crate::model_engine::types::{non_blank, Relationship, RelationshipPatch, RelationshipSpec};
use crate::model_engine::validators::{BusinessRuleValidator, TypeValidator};
use crate::utils::{AppError, EntityKind, Result};
use tracing::{debug, instrument, warn};

impl ModelManipulator {
    #[instrument(skip(self, spec), fields(kind = %spec.relationship_type))]
    pub fn create_relationship(&mut self, spec: RelationshipSpec) -> Result<Relationship> {
        let (relationship_type, source_id, target_id) = self.check_endpoints(
            &spec.relationship_type,
            &spec.source_id,
            &spec.target_id,
            None,
        )?;
        let id = ids::claim(&self.model, EntityKind::Relationship, spec.id)?;

        let mut rel = Relationship::new(id.clone(), relationship_type, source_id, target_id);
        rel.name = non_blank(spec.name);
        rel.documentation = non_blank(spec.documentation);
        rel.properties = spec.properties.unwrap_or_default();

        self.attach_relationship(rel.clone());
        self.mark_dirty(Operation::Create {
            kind: EntityKind::Relationship,
            id,
        });
        Ok(rel)
    }

    pub fn get_relationship(&self, id: &str) -> Option<&Relationship> {
        self.model.relationships.get(id)
    }

    /// Mise à jour partielle ; un changement d'extrémité migre les références inverses.
    /// Les vues qui affichent la relation reçoivent les nouvelles extrémités.
    pub fn update_relationship(&mut self, id: &str, patch: RelationshipPatch) -> Result<Relationship> {
        let current = self
            .model
            .relationships
            .get(id)
            .ok_or_else(|| AppError::not_found(EntityKind::Relationship, id))?;

        let type_value = patch
            .relationship_type
            .clone()
            .unwrap_or_else(|| current.relationship_type.as_str().to_string());
        let source_value = patch
            .source_id
            .clone()
            .unwrap_or_else(|| current.source_id.clone());
        let target_value = patch
            .target_id
            .clone()
            .unwrap_or_else(|| current.target_id.clone());

        let (relationship_type, source_id, target_id) =
            self.check_endpoints(&type_value, &source_value, &target_value, Some(id))?;

        // Validation terminée : on détache puis rattache avec les valeurs effectives
        let Some(mut rel) = self.detach_relationship_keep_views(id) else {
            return Err(AppError::not_found(EntityKind::Relationship, id));
        };
        rel.relationship_type = relationship_type;
        rel.source_id = source_id;
        rel.target_id = target_id;
        if patch.name.is_some() {
            rel.name = non_blank(patch.name);
        }
        if patch.documentation.is_some() {
            rel.documentation = non_blank(patch.documentation);
        }
        if let Some(properties) = patch.properties {
            rel.properties = properties;
        }
        self.attach_relationship(rel.clone());
        self.sync_views_with_endpoints(&rel);

        self.mark_dirty(Operation::Update {
            kind: EntityKind::Relationship,
            id: id.to_string(),
        });
        Ok(rel)
    }

    pub fn delete_relationship(&mut self, id: &str) -> Result<Relationship> {
        let rel = self
            .detach_relationship(id)
            .ok_or_else(|| AppError::not_found(EntityKind::Relationship, id))?;
        self.mark_dirty(Operation::Delete {
            kind: EntityKind::Relationship,
            id: id.to_string(),
        });
        Ok(rel)
    }

    // --- INTERNE ---

    /// Contrôles communs création / mise à jour : champs, type, boucle,
    /// extrémités existantes, cardinalité 1-1. Renvoie les valeurs normalisées.
    fn check_endpoints(
        &self,
        relationship_type: &str,
        source_id: &str,
        target_id: &str,
        exclude: Option<&str>,
    ) -> Result<(RelationshipType, String, String)> {
        let relationship_type =
            TypeValidator::check_relationship(relationship_type, source_id, target_id)
                .into_result()?;
        let (source_id, target_id) = (source_id.trim(), target_id.trim());

        let source = self
            .model
            .elements
            .get(source_id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, source_id))?;
        let target = self
            .model
            .elements
            .get(target_id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, target_id))?;

        if let Some(twin) = BusinessRuleValidator::find_one_to_one_twin(
            relationship_type,
            source_id,
            target_id,
            exclude,
            self.model.relationships.values(),
        ) {
            return Err(AppError::invalid_field(
                "type",
                format!(
                    "Relation {} dupliquée entre '{}' et '{}' (cardinalité 1-1, existante : '{}')",
                    relationship_type, source_id, target_id, twin.id
                ),
            ));
        }

        // Compatibilité des types : signalée, jamais bloquante
        if let Err(message) = rule_for(relationship_type).check(source.element_type, target.element_type) {
            warn!("{}", message);
        }

        Ok((relationship_type, source_id.to_string(), target_id.to_string()))
    }

    fn attach_relationship(&mut self, rel: Relationship) {
        if let Some(source) = self.model.elements.get_mut(&rel.source_id) {
            source.outgoing_relations.insert(rel.id.clone());
        }
        if let Some(target) = self.model.elements.get_mut(&rel.target_id) {
            target.incoming_relations.insert(rel.id.clone());
        }
        self.model.relationships.insert(rel.id.clone(), rel);
    }

    /// Retire la relation du magasin et de ses extrémités, en laissant les vues intactes.
    /// La position dans le magasin est conservée pour le rattachement qui suit.
    fn detach_relationship_keep_views(&mut self, id: &str) -> Option<Relationship> {
        let rel = self.model.relationships.get(id)?.clone();
        if let Some(source) = self.model.elements.get_mut(&rel.source_id) {
            source.outgoing_relations.shift_remove(id);
        }
        if let Some(target) = self.model.elements.get_mut(&rel.target_id) {
            target.incoming_relations.shift_remove(id);
        }
        Some(rel)
    }

    /// Retrait complet : magasin, extrémités et toutes les vues.
    pub(super) fn detach_relationship(&mut self, id: &str) -> Option<Relationship> {
        let rel = self.detach_relationship_keep_views(id)?;
        self.model.relationships.shift_remove(id);
        for view in self.model.views.values_mut() {
            view.relationships.retain(|r| r != id);
        }
        debug!("Relation {} détachée", id);
        Some(rel)
    }

    /// Chaque vue qui affiche la relation affiche aussi ses deux extrémités.
    pub(super) fn sync_views_with_endpoints(&mut self, rel: &Relationship) {
        for view in self.model.views.values_mut() {
            if !view.contains_relationship(&rel.id) {
                continue;
            }
            for end in [&rel.source_id, &rel.target_id] {
                if !view.contains_element(end) {
                    view.elements.push(end.clone());
                    if let Some(element) = self.model.elements.get_mut(end) {
                        element.in_views.insert(view.id.clone());
                    }
                }
            }
        }
    }
}
