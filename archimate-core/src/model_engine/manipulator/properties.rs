// FICHIER : archimate-core/src/model_engine/manipulator/properties.rs

//! Propriétés nommées : toute valeur passe par une définition existante.
//! La table `properties` fournie à la création reste, elle, non contrôlée.

use super::{ids, ModelManipulator};
use crate::model_engine::transactions::Operation;
use crate::model_engine::types::{PropertyDefinition, PropertyMap};
use crate::model_engine::validators::TypeValidator;
use crate::utils::{AppError, EntityKind, Result};

impl ModelManipulator {
    pub fn create_property_definition(
        &mut self,
        name: &str,
        id: Option<String>,
    ) -> Result<PropertyDefinition> {
        TypeValidator::check_required("name", name).into_result()?;
        let identifier = ids::claim(&self.model, EntityKind::PropertyDefinition, id)?;
        let definition = PropertyDefinition {
            identifier: identifier.clone(),
            name: name.trim().to_string(),
        };
        self.model
            .property_definitions
            .insert(identifier.clone(), definition.clone());
        self.mark_dirty(Operation::Create {
            kind: EntityKind::PropertyDefinition,
            id: identifier,
        });
        Ok(definition)
    }

    pub fn get_property_definition(&self, id: &str) -> Option<&PropertyDefinition> {
        self.model.property_definitions.get(id)
    }

    /// Recherche par nom exact, puis sans tenir compte de la casse.
    pub fn find_property_definition_by_name(&self, name: &str) -> Option<&PropertyDefinition> {
        let defs = &self.model.property_definitions;
        defs.values()
            .find(|d| d.name == name)
            .or_else(|| defs.values().find(|d| d.name.eq_ignore_ascii_case(name)))
    }

    pub fn list_property_definitions(&self) -> Vec<&PropertyDefinition> {
        self.model.property_definitions.values().collect()
    }

    /// Affecte une valeur (création ou remplacement).
    pub fn assign_property(&mut self, entity_id: &str, definition_id: &str, value: &str) -> Result<()> {
        self.require_definition(definition_id)?;
        let (kind, properties) = self.properties_mut(entity_id)?;
        properties.insert(definition_id.to_string(), value.to_string());
        self.mark_dirty(Operation::Update {
            kind,
            id: entity_id.to_string(),
        });
        Ok(())
    }

    /// Remplace une valeur déjà affectée ; `NotFound` si l'entité ne la porte pas.
    pub fn update_property(&mut self, entity_id: &str, definition_id: &str, value: &str) -> Result<()> {
        self.require_definition(definition_id)?;
        let (kind, properties) = self.properties_mut(entity_id)?;
        let slot = properties
            .get_mut(definition_id)
            .ok_or_else(|| AppError::not_found(EntityKind::PropertyDefinition, definition_id))?;
        *slot = value.to_string();
        self.mark_dirty(Operation::Update {
            kind,
            id: entity_id.to_string(),
        });
        Ok(())
    }

    /// Retire une valeur ; renvoie l'ancienne si elle existait.
    pub fn remove_property(&mut self, entity_id: &str, definition_id: &str) -> Result<Option<String>> {
        let (kind, properties) = self.properties_mut(entity_id)?;
        let previous = properties.remove(definition_id);
        if previous.is_some() {
            self.mark_dirty(Operation::Update {
                kind,
                id: entity_id.to_string(),
            });
        }
        Ok(previous)
    }

    fn require_definition(&self, definition_id: &str) -> Result<()> {
        if self.model.property_definitions.contains_key(definition_id) {
            Ok(())
        } else {
            Err(AppError::not_found(EntityKind::PropertyDefinition, definition_id))
        }
    }

    /// Propriétés d'un élément, d'une relation ou d'une vue (espace d'identifiants commun).
    fn properties_mut(&mut self, entity_id: &str) -> Result<(EntityKind, &mut PropertyMap)> {
        let model = &mut self.model;
        if let Some(e) = model.elements.get_mut(entity_id) {
            return Ok((EntityKind::Element, &mut e.properties));
        }
        if let Some(r) = model.relationships.get_mut(entity_id) {
            return Ok((EntityKind::Relationship, &mut r.properties));
        }
        if let Some(v) = model.views.get_mut(entity_id) {
            return Ok((EntityKind::View, &mut v.properties));
        }
        Err(AppError::not_found(EntityKind::Element, entity_id))
    }
}
