// FICHIER : archimate-core/src/model_engine/manipulator/views.rs

use super::{ids, ModelManipulator};
use crate::model_engine::transactions::Operation;
use crate::model_engine::types::{non_blank, ModelData, NodeLink, View, ViewPatch, ViewSpec};
use crate::model_engine::validators::TypeValidator;
use crate::utils::{AppError, EntityKind, Result};
use indexmap::IndexSet;
use tracing::instrument;

/// Contenu d'une vue après résolution de toutes les références.
struct ViewMembers {
    elements: Vec<String>,
    relationships: Vec<String>,
    node_hierarchy: Vec<NodeLink>,
}

impl ViewMembers {
    /// Résout et normalise : doublons retirés, extrémités des relations
    /// et membres de la hiérarchie ajoutés à la vue.
    fn resolve(
        model: &ModelData,
        elements: &[String],
        relationships: &[String],
        node_hierarchy: &[NodeLink],
    ) -> Result<Self> {
        let mut members: IndexSet<String> = IndexSet::new();
        for id in elements {
            if !model.elements.contains_key(id) {
                return Err(AppError::not_found(EntityKind::Element, id));
            }
            members.insert(id.clone());
        }

        let mut rels: IndexSet<String> = IndexSet::new();
        for id in relationships {
            let rel = model
                .relationships
                .get(id)
                .ok_or_else(|| AppError::not_found(EntityKind::Relationship, id))?;
            members.insert(rel.source_id.clone());
            members.insert(rel.target_id.clone());
            rels.insert(id.clone());
        }

        let mut links: IndexSet<NodeLink> = IndexSet::new();
        for link in node_hierarchy {
            for end in [&link.parent_element, &link.child_element] {
                if !model.elements.contains_key(end) {
                    return Err(AppError::not_found(EntityKind::Element, end));
                }
            }
            if link.parent_element == link.child_element {
                return Err(AppError::invalid_field(
                    "nodeHierarchy",
                    format!(
                        "Un élément ne peut pas être son propre parent ({})",
                        link.child_element
                    ),
                ));
            }
            members.insert(link.parent_element.clone());
            members.insert(link.child_element.clone());
            links.insert(link.clone());
        }

        Ok(Self {
            elements: members.into_iter().collect(),
            relationships: rels.into_iter().collect(),
            node_hierarchy: links.into_iter().collect(),
        })
    }
}

impl ModelManipulator {
    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub fn create_view(&mut self, spec: ViewSpec) -> Result<View> {
        TypeValidator::check_required("name", &spec.name).into_result()?;
        let members = ViewMembers::resolve(
            &self.model,
            &spec.elements,
            &spec.relationships,
            &spec.node_hierarchy,
        )?;
        let id = ids::claim(&self.model, EntityKind::View, spec.id)?;

        let mut view = View::new(id.clone(), spec.name.trim());
        view.view_type = non_blank(spec.view_type);
        view.viewpoint = non_blank(spec.viewpoint);
        view.documentation = non_blank(spec.documentation);
        view.properties = spec.properties.unwrap_or_default();
        view.elements = members.elements;
        view.relationships = members.relationships;
        view.node_hierarchy = members.node_hierarchy;

        for element_id in &view.elements {
            if let Some(element) = self.model.elements.get_mut(element_id) {
                element.in_views.insert(id.clone());
            }
        }
        self.model.views.insert(id.clone(), view.clone());
        self.mark_dirty(Operation::Create {
            kind: EntityKind::View,
            id,
        });
        Ok(view)
    }

    pub fn get_view(&self, id: &str) -> Option<&View> {
        self.model.views.get(id)
    }

    /// Mise à jour partielle. Remplacer `elements` retire aussi les paires
    /// de hiérarchie et, faute de liste explicite, les relations qui nomment
    /// un élément sorti de la vue.
    pub fn update_view(&mut self, id: &str, patch: ViewPatch) -> Result<View> {
        let current = self
            .model
            .views
            .get(id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, id))?;
        if let Some(name) = &patch.name {
            TypeValidator::check_required("name", name).into_result()?;
        }

        let members_changed = patch.elements.is_some()
            || patch.relationships.is_some()
            || patch.node_hierarchy.is_some();
        let members = if members_changed {
            let elements = patch.elements.as_deref().unwrap_or(current.elements());
            // Sans liste explicite, on garde les relations dont les deux extrémités
            // restent dans la vue (comme `remove_element_from_view`).
            let relationships: Vec<String> = match (&patch.relationships, &patch.elements) {
                (Some(rels), _) => rels.clone(),
                (None, None) => current.relationships().to_vec(),
                (None, Some(kept)) => current
                    .relationships()
                    .iter()
                    .filter(|rid| {
                        self.model.relationships.get(*rid).map_or(false, |rel| {
                            kept.contains(&rel.source_id) && kept.contains(&rel.target_id)
                        })
                    })
                    .cloned()
                    .collect(),
            };
            let hierarchy: Vec<NodeLink> = match &patch.node_hierarchy {
                Some(h) => h.clone(),
                None => current
                    .node_hierarchy()
                    .iter()
                    .filter(|l| {
                        patch.elements.is_none()
                            || (elements.contains(&l.parent_element)
                                && elements.contains(&l.child_element))
                    })
                    .cloned()
                    .collect(),
            };
            Some(ViewMembers::resolve(
                &self.model,
                elements,
                &relationships,
                &hierarchy,
            )?)
        } else {
            None
        };
        let previous: Vec<String> = current.elements.clone();

        let view = self
            .model
            .views
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, id))?;
        if let Some(name) = patch.name {
            view.name = name.trim().to_string();
        }
        if patch.view_type.is_some() {
            view.view_type = non_blank(patch.view_type);
        }
        if patch.viewpoint.is_some() {
            view.viewpoint = non_blank(patch.viewpoint);
        }
        if patch.documentation.is_some() {
            view.documentation = non_blank(patch.documentation);
        }
        if let Some(properties) = patch.properties {
            view.properties = properties;
        }
        if let Some(members) = members {
            view.elements = members.elements;
            view.relationships = members.relationships;
            view.node_hierarchy = members.node_hierarchy;
        }
        let updated = view.clone();

        // inViews : les retirés perdent la vue, les ajoutés la gagnent
        for element_id in previous.iter().filter(|e| !updated.contains_element(e)) {
            if let Some(element) = self.model.elements.get_mut(element_id) {
                element.in_views.shift_remove(id);
            }
        }
        for element_id in &updated.elements {
            if let Some(element) = self.model.elements.get_mut(element_id) {
                element.in_views.insert(id.to_string());
            }
        }

        self.mark_dirty(Operation::Update {
            kind: EntityKind::View,
            id: id.to_string(),
        });
        Ok(updated)
    }

    pub fn delete_view(&mut self, id: &str) -> Result<View> {
        let view = self
            .model
            .views
            .shift_remove(id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, id))?;
        for element in self.model.elements.values_mut() {
            element.in_views.shift_remove(id);
        }
        self.mark_dirty(Operation::Delete {
            kind: EntityKind::View,
            id: id.to_string(),
        });
        Ok(view)
    }

    /// Idempotent. Le parent éventuel est ajouté à la vue s'il n'y figure pas.
    pub fn add_element_to_view(
        &mut self,
        view_id: &str,
        element_id: &str,
        parent_id: Option<&str>,
    ) -> Result<View> {
        let view = self
            .model
            .views
            .get(view_id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))?;
        if !self.model.elements.contains_key(element_id) {
            return Err(AppError::not_found(EntityKind::Element, element_id));
        }
        if let Some(parent) = parent_id {
            if !self.model.elements.contains_key(parent) {
                return Err(AppError::not_found(EntityKind::Element, parent));
            }
            if parent == element_id {
                return Err(AppError::invalid_field(
                    "parentId",
                    format!("Un élément ne peut pas être son propre parent ({})", element_id),
                ));
            }
        }

        let link = parent_id.map(|p| NodeLink::new(p, element_id));
        let unchanged = view.contains_element(element_id)
            && parent_id.map_or(true, |p| view.contains_element(p))
            && link.as_ref().map_or(true, |l| view.node_hierarchy.contains(l));
        if unchanged {
            return Ok(view.clone());
        }

        let view = self
            .model
            .views
            .get_mut(view_id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))?;
        for member in parent_id.into_iter().chain([element_id]) {
            if !view.contains_element(member) {
                view.elements.push(member.to_string());
            }
            if let Some(element) = self.model.elements.get_mut(member) {
                element.in_views.insert(view_id.to_string());
            }
        }
        if let Some(link) = link {
            if !view.node_hierarchy.contains(&link) {
                view.node_hierarchy.push(link);
            }
        }
        let updated = view.clone();

        self.mark_dirty(Operation::AddToView {
            view_id: view_id.to_string(),
            member_id: element_id.to_string(),
        });
        Ok(updated)
    }

    /// Retire l'élément, ses paires de hiérarchie et les relations qui le touchent.
    pub fn remove_element_from_view(&mut self, view_id: &str, element_id: &str) -> Result<View> {
        let relationships = &self.model.relationships;
        let view = self
            .model
            .views
            .get_mut(view_id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))?;
        if !view.contains_element(element_id) {
            return Ok(view.clone());
        }

        view.elements.retain(|e| e != element_id);
        view.node_hierarchy.retain(|l| !l.names(element_id));
        view.relationships.retain(|r| {
            relationships
                .get(r)
                .map_or(true, |rel| !rel.touches(element_id))
        });
        let updated = view.clone();

        if let Some(element) = self.model.elements.get_mut(element_id) {
            element.in_views.shift_remove(view_id);
        }
        self.mark_dirty(Operation::RemoveFromView {
            view_id: view_id.to_string(),
            member_id: element_id.to_string(),
        });
        Ok(updated)
    }

    /// Les extrémités de la relation sont ajoutées à la vue.
    pub fn add_relationship_to_view(&mut self, view_id: &str, relationship_id: &str) -> Result<View> {
        let view = self
            .model
            .views
            .get(view_id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))?;
        let rel = self
            .model
            .relationships
            .get(relationship_id)
            .ok_or_else(|| AppError::not_found(EntityKind::Relationship, relationship_id))?
            .clone();
        if view.contains_relationship(relationship_id) {
            return Ok(view.clone());
        }

        if let Some(view) = self.model.views.get_mut(view_id) {
            view.relationships.push(relationship_id.to_string());
        }
        self.sync_views_with_endpoints(&rel);

        self.mark_dirty(Operation::AddToView {
            view_id: view_id.to_string(),
            member_id: relationship_id.to_string(),
        });
        self.model
            .views
            .get(view_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))
    }

    pub fn remove_relationship_from_view(
        &mut self,
        view_id: &str,
        relationship_id: &str,
    ) -> Result<View> {
        let view = self
            .model
            .views
            .get_mut(view_id)
            .ok_or_else(|| AppError::not_found(EntityKind::View, view_id))?;
        if !view.contains_relationship(relationship_id) {
            return Ok(view.clone());
        }
        view.relationships.retain(|r| r != relationship_id);
        let updated = view.clone();

        self.mark_dirty(Operation::RemoveFromView {
            view_id: view_id.to_string(),
            member_id: relationship_id.to_string(),
        });
        Ok(updated)
    }
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::super::tests::engine;
    use super::*;
    use crate::model_engine::types::{ElementSpec, RelationshipSpec};
    use crate::model_engine::validators::IntegrityChecker;

    #[test]
    fn test_create_view_syncs_in_views() {
        let m = engine();
        let view = m.get_view("V").unwrap();
        assert_eq!(view.elements(), ["A", "B"]);
        assert!(m.get_element("A").unwrap().in_views().contains("V"));
        assert!(m.get_element("B").unwrap().in_views().contains("V"));
    }

    #[test]
    fn test_create_view_missing_reference_names_it() {
        let mut m = engine();
        let before = m.get_model().clone();
        let err = m
            .create_view(ViewSpec::new("Vue 2").with_elements(["A", "GHOST"]))
            .unwrap_err();
        assert!(err.to_string().contains("GHOST"));

        let err = m
            .create_view(ViewSpec::new("Vue 3").with_child("A", "NOPE"))
            .unwrap_err();
        assert!(err.to_string().contains("NOPE"));
        assert_eq!(m.get_model(), &before);
    }

    #[test]
    fn test_create_view_adds_relationship_endpoints() {
        let mut m = engine();
        let view = m
            .create_view(ViewSpec::new("Flux").with_relationships(["R"]))
            .unwrap();
        assert_eq!(view.elements(), ["A", "B"]);
        assert!(IntegrityChecker::check(m.get_model()).is_ok());
    }

    #[test]
    fn test_update_view_diff_in_views() {
        let mut m = engine();
        m.create_element(ElementSpec::new("Node", "Serveur").with_id("N"))
            .unwrap();
        m.add_element_to_view("V", "B", Some("A")).unwrap();

        let patch = ViewPatch {
            elements: Some(vec!["B".into(), "N".into()]),
            relationships: Some(vec![]),
            ..Default::default()
        };
        let view = m.update_view("V", patch).unwrap();

        assert_eq!(view.elements(), ["B", "N"]);
        assert!(view.node_hierarchy().is_empty());
        assert!(!m.get_element("A").unwrap().in_views().contains("V"));
        assert!(m.get_element("N").unwrap().in_views().contains("V"));
        assert!(IntegrityChecker::check(m.get_model()).is_ok());
    }

    #[test]
    fn test_update_view_elements_only_drops_touching_relationships() {
        let mut m = engine();
        let patch = ViewPatch {
            elements: Some(vec!["B".into()]),
            ..Default::default()
        };
        let view = m.update_view("V", patch).unwrap();

        assert_eq!(view.elements(), ["B"]);
        assert!(view.relationships().is_empty());
        assert!(!m.get_element("A").unwrap().in_views().contains("V"));
        assert!(m.get_element("B").unwrap().in_views().contains("V"));
        // La relation reste dans le modèle
        assert!(m.get_relationship("R").is_some());
        assert!(IntegrityChecker::check(m.get_model()).is_ok());
    }

    #[test]
    fn test_update_view_elements_only_keeps_inner_relationships() {
        let mut m = engine();
        m.create_element(ElementSpec::new("Node", "Serveur").with_id("N"))
            .unwrap();
        let patch = ViewPatch {
            elements: Some(vec!["A".into(), "B".into(), "N".into()]),
            ..Default::default()
        };
        let view = m.update_view("V", patch).unwrap();

        assert_eq!(view.elements(), ["A", "B", "N"]);
        assert_eq!(view.relationships(), ["R"]);
    }

    #[test]
    fn test_update_view_blank_name_rejected() {
        let mut m = engine();
        let patch = ViewPatch {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(m.update_view("V", patch).is_err());
        assert_eq!(m.get_view("V").unwrap().name, "Vue");
    }

    #[test]
    fn test_add_element_to_view_is_idempotent_with_parent() {
        let mut m = engine();
        m.create_element(ElementSpec::new("Node", "Serveur").with_id("N"))
            .unwrap();
        m.create_view(ViewSpec::new("Vide").with_id("W")).unwrap();

        m.add_element_to_view("W", "A", Some("N")).unwrap();
        let view = m.add_element_to_view("W", "A", Some("N")).unwrap();

        assert_eq!(view.elements(), ["N", "A"]);
        assert_eq!(view.node_hierarchy(), [NodeLink::new("N", "A")]);
        assert!(m.get_element("N").unwrap().in_views().contains("W"));
    }

    #[test]
    fn test_remove_element_from_view_strips_links_and_relationships() {
        let mut m = engine();
        m.add_element_to_view("V", "B", Some("A")).unwrap();
        let view = m.remove_element_from_view("V", "A").unwrap();

        assert_eq!(view.elements(), ["B"]);
        assert!(view.relationships().is_empty());
        assert!(view.node_hierarchy().is_empty());
        assert!(!m.get_element("A").unwrap().in_views().contains("V"));
        // La relation reste dans le modèle
        assert!(m.get_relationship("R").is_some());
    }

    #[test]
    fn test_add_relationship_to_view_inserts_endpoints() {
        let mut m = engine();
        m.create_view(ViewSpec::new("Vide").with_id("W")).unwrap();
        let view = m.add_relationship_to_view("W", "R").unwrap();
        assert_eq!(view.elements(), ["A", "B"]);
        assert_eq!(view.relationships(), ["R"]);
        assert!(m.get_element("B").unwrap().in_views().contains("W"));

        let view = m.remove_relationship_from_view("W", "R").unwrap();
        assert!(view.relationships().is_empty());
        assert_eq!(view.elements(), ["A", "B"]);
    }

    #[test]
    fn test_delete_view_strips_in_views() {
        let mut m = engine();
        m.delete_view("V").unwrap();
        assert!(m.get_element("A").unwrap().in_views().is_empty());
        assert!(m.get_view("V").is_none());
        // La suppression stricte devient possible côté vue, pas côté relation
        m.delete_relationship("R").unwrap();
        assert!(m
            .delete_element("A", crate::model_engine::types::DeleteOptions::strict())
            .is_ok());
    }

    #[test]
    fn test_view_operations_unknown_targets() {
        let mut m = engine();
        assert!(m.add_element_to_view("GHOST", "A", None).is_err());
        assert!(m.add_element_to_view("V", "GHOST", None).is_err());
        assert!(m.add_relationship_to_view("V", "GHOST").is_err());
        assert!(m
            .create_relationship(RelationshipSpec::new("Flow", "A", "B"))
            .is_ok());
    }
}
