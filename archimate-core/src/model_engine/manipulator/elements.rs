// FICHIER : archimate-core/src/model_engine/manipulator/elements.rs

use super::{ids, ModelManipulator};
use crate::model_engine::transactions::Operation;
use crate::model_engine::types::{non_blank, DeleteOptions, Element, ElementPatch, ElementSpec};
use crate::model_engine::validators::TypeValidator;
use crate::utils::{AppError, EntityKind, Result};
use serde::Serialize;
use tracing::{info, instrument};

/// Bilan d'une suppression d'élément.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_id: String,
    pub removed_relationships: Vec<String>,
    pub updated_views: Vec<String>,
}

impl ModelManipulator {
    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub fn create_element(&mut self, spec: ElementSpec) -> Result<Element> {
        let element_type = TypeValidator::check_element(&spec.element_type, &spec.name).into_result()?;
        let id = ids::claim(&self.model, EntityKind::Element, spec.id)?;

        let mut element = Element::new(id.clone(), element_type, spec.name.trim());
        element.documentation = non_blank(spec.documentation);
        element.properties = spec.properties.unwrap_or_default();

        self.model.elements.insert(id.clone(), element.clone());
        self.mark_dirty(Operation::Create {
            kind: EntityKind::Element,
            id,
        });
        Ok(element)
    }

    pub fn get_element(&self, id: &str) -> Option<&Element> {
        self.model.elements.get(id)
    }

    /// Mise à jour partielle. Un changement de type ne revalide pas les relations.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) -> Result<Element> {
        if !self.model.elements.contains_key(id) {
            return Err(AppError::not_found(EntityKind::Element, id));
        }
        if let Some(name) = &patch.name {
            TypeValidator::check_required("name", name).into_result()?;
        }
        let new_type = patch
            .element_type
            .as_deref()
            .map(|t| TypeValidator::check_element_type(t).into_result())
            .transpose()?;

        let element = self
            .model
            .elements
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, id))?;
        if let Some(t) = new_type {
            element.element_type = t;
        }
        if let Some(name) = patch.name {
            element.name = name.trim().to_string();
        }
        if patch.documentation.is_some() {
            element.documentation = non_blank(patch.documentation);
        }
        if let Some(properties) = patch.properties {
            element.properties = properties;
        }
        let updated = element.clone();

        self.mark_dirty(Operation::Update {
            kind: EntityKind::Element,
            id: id.to_string(),
        });
        Ok(updated)
    }

    /// Suppression d'un élément.
    ///
    /// Avec `cascade`, les relations qui le touchent sont supprimées et les vues nettoyées.
    /// Sans `cascade` mais avec `validate`, la présence de dépendants est refusée.
    /// Sans l'un ni l'autre, la suppression est forcée ; les vues et relations
    /// sont tout de même nettoyées pour ne laisser aucune référence pendante.
    #[instrument(skip(self))]
    pub fn delete_element(&mut self, id: &str, options: DeleteOptions) -> Result<DeleteOutcome> {
        let element = self
            .model
            .elements
            .get(id)
            .ok_or_else(|| AppError::not_found(EntityKind::Element, id))?;

        if !options.cascade && options.validate && element.has_dependents() {
            return Err(AppError::integrity(
                EntityKind::Element,
                id,
                "l'élément est encore référencé (utiliser la suppression en cascade)",
                element.dependents(),
            ));
        }

        // Relations touchant l'élément : lues dans le magasin, pas seulement dans les références inverses
        let touching: Vec<String> = self
            .model
            .relationships
            .values()
            .filter(|r| r.touches(id))
            .map(|r| r.id.clone())
            .collect();
        for rel_id in &touching {
            self.detach_relationship(rel_id);
            self.mark_dirty(Operation::Delete {
                kind: EntityKind::Relationship,
                id: rel_id.clone(),
            });
        }

        let mut updated_views = Vec::new();
        for view in self.model.views.values_mut() {
            let before = (view.elements.len(), view.node_hierarchy.len());
            view.elements.retain(|e| e != id);
            view.node_hierarchy.retain(|link| !link.names(id));
            if before != (view.elements.len(), view.node_hierarchy.len()) {
                updated_views.push(view.id.clone());
            }
        }

        self.model.elements.shift_remove(id);
        self.mark_dirty(Operation::Delete {
            kind: EntityKind::Element,
            id: id.to_string(),
        });

        info!(
            "🗑️ Élément {} supprimé ({} relation(s), {} vue(s) nettoyée(s))",
            id,
            touching.len(),
            updated_views.len()
        );
        Ok(DeleteOutcome {
            deleted_id: id.to_string(),
            removed_relationships: touching,
            updated_views,
        })
    }
}
