// FICHIER : archimate-core/src/model_engine/types.rs

use crate::model_engine::archimate::{ElementType, RelationshipType};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Valeurs de propriétés : identifiant de définition -> valeur (ordre sans importance).
pub type PropertyMap = BTreeMap<String, String>;

// --- ENTITÉS DU MODÈLE ---
// Les références croisées (relations entrantes/sortantes, appartenance aux vues)
// sont maintenues exclusivement par le moteur : champs `pub(crate)`, lecture par accesseurs.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,

    #[serde(default)]
    pub(crate) in_views: IndexSet<String>,
    #[serde(default)]
    pub(crate) outgoing_relations: IndexSet<String>,
    #[serde(default)]
    pub(crate) incoming_relations: IndexSet<String>,
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: ElementType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type,
            name: name.into(),
            documentation: None,
            properties: PropertyMap::new(),
            in_views: IndexSet::new(),
            outgoing_relations: IndexSet::new(),
            incoming_relations: IndexSet::new(),
        }
    }

    pub fn in_views(&self) -> &IndexSet<String> {
        &self.in_views
    }

    pub fn outgoing_relations(&self) -> &IndexSet<String> {
        &self.outgoing_relations
    }

    pub fn incoming_relations(&self) -> &IndexSet<String> {
        &self.incoming_relations
    }

    /// Vrai si l'élément est référencé par une relation ou une vue.
    pub fn has_dependents(&self) -> bool {
        !(self.in_views.is_empty()
            && self.outgoing_relations.is_empty()
            && self.incoming_relations.is_empty())
    }

    /// Identifiants des relations puis des vues qui dépendent de l'élément.
    pub fn dependents(&self) -> Vec<String> {
        self.outgoing_relations
            .iter()
            .chain(self.incoming_relations.iter())
            .chain(self.in_views.iter())
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        relationship_type: RelationshipType,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            relationship_type,
            source_id: source_id.into(),
            target_id: target_id.into(),
            name: None,
            documentation: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn touches(&self, element_id: &str) -> bool {
        self.source_id == element_id || self.target_id == element_id
    }
}

/// Paire d'imbrication visuelle dans une vue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLink {
    pub parent_element: String,
    pub child_element: String,
}

impl NodeLink {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent_element: parent.into(),
            child_element: child.into(),
        }
    }

    pub fn names(&self, element_id: &str) -> bool {
        self.parent_element == element_id || self.child_element == element_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,

    #[serde(default)]
    pub(crate) elements: Vec<String>,
    #[serde(default)]
    pub(crate) relationships: Vec<String>,
    #[serde(default)]
    pub(crate) node_hierarchy: Vec<NodeLink>,
}

impl View {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            view_type: None,
            viewpoint: None,
            documentation: None,
            properties: PropertyMap::new(),
            elements: Vec::new(),
            relationships: Vec::new(),
            node_hierarchy: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn relationships(&self) -> &[String] {
        &self.relationships
    }

    pub fn node_hierarchy(&self) -> &[NodeLink] {
        &self.node_hierarchy
    }

    pub fn contains_element(&self, element_id: &str) -> bool {
        self.elements.iter().any(|e| e == element_id)
    }

    pub fn contains_relationship(&self, relationship_id: &str) -> bool {
        self.relationships.iter().any(|r| r == relationship_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub identifier: String,
    pub name: String,
}

// --- AGRÉGAT (Unité de chargement / sauvegarde / snapshot) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelData {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Langue lue dans le fichier source (`xml:lang` du nom du modèle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,

    #[serde(default)]
    pub elements: IndexMap<String, Element>,
    #[serde(default)]
    pub relationships: IndexMap<String, Relationship>,
    #[serde(default)]
    pub views: IndexMap<String, View>,
    #[serde(default)]
    pub property_definitions: IndexMap<String, PropertyDefinition>,
}

impl Default for ModelData {
    fn default() -> Self {
        Self::new("id-model", "ArchiMate Model")
    }
}

impl ModelData {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
            language: None,
            properties: PropertyMap::new(),
            elements: IndexMap::new(),
            relationships: IndexMap::new(),
            views: IndexMap::new(),
            property_definitions: IndexMap::new(),
        }
    }

    /// Espace d'identifiants commun aux éléments, relations et vues.
    pub fn contains_id(&self, id: &str) -> bool {
        self.elements.contains_key(id)
            || self.relationships.contains_key(id)
            || self.views.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty() && self.views.is_empty()
    }

    /// Recalcule les références dérivées (relations entrantes/sortantes, `inViews`)
    /// à partir des seules données explicites des relations et des vues.
    /// Les références pendantes sont ignorées : le contrôle d'intégrité les signale.
    pub fn rebuild_back_references(&mut self) {
        for element in self.elements.values_mut() {
            element.in_views.clear();
            element.outgoing_relations.clear();
            element.incoming_relations.clear();
        }

        for rel in self.relationships.values() {
            if let Some(source) = self.elements.get_mut(&rel.source_id) {
                source.outgoing_relations.insert(rel.id.clone());
            }
            if let Some(target) = self.elements.get_mut(&rel.target_id) {
                target.incoming_relations.insert(rel.id.clone());
            }
        }

        for view in self.views.values() {
            for element_id in &view.elements {
                if let Some(element) = self.elements.get_mut(element_id) {
                    element.in_views.insert(view.id.clone());
                }
            }
        }
    }
}

// --- ENTRÉES DES OPÉRATIONS DE MUTATION ---
// Les types arrivent sous forme de chaînes : la taxonomie les valide à la frontière.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSpec {
    #[serde(rename = "type")]
    pub element_type: String,
    pub name: String,
    pub id: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
}

impl ElementSpec {
    pub fn new(element_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipSpec {
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub source_id: String,
    pub target_id: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
}

impl RelationshipSpec {
    pub fn new(
        relationship_type: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            relationship_type: relationship_type.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSpec {
    pub name: String,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub view_type: Option<String>,
    pub viewpoint: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
    pub elements: Vec<String>,
    pub relationships: Vec<String>,
    pub node_hierarchy: Vec<NodeLink>,
}

impl ViewSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_viewpoint(mut self, viewpoint: impl Into<String>) -> Self {
        self.viewpoint = Some(viewpoint.into());
        self
    }

    pub fn with_elements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relationships<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_child(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.node_hierarchy.push(NodeLink::new(parent, child));
        self
    }
}

// --- MISES À JOUR PARTIELLES ---
// `None` = champ inchangé. Pour les champs optionnels, `Some("")` efface la valeur.
// `properties` remplace la table entière.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipPatch {
    #[serde(rename = "type")]
    pub relationship_type: Option<String>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub view_type: Option<String>,
    pub viewpoint: Option<String>,
    pub documentation: Option<String>,
    pub properties: Option<PropertyMap>,
    pub elements: Option<Vec<String>>,
    pub relationships: Option<Vec<String>>,
    pub node_hierarchy: Option<Vec<NodeLink>>,
}

/// Options de suppression d'un élément.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteOptions {
    pub cascade: bool,
    pub validate: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            cascade: true,
            validate: true,
        }
    }
}

impl DeleteOptions {
    /// Refuse la suppression si des dépendances existent.
    pub fn strict() -> Self {
        Self {
            cascade: false,
            validate: true,
        }
    }

    /// Suppression forcée sans cascade ni contrôle.
    pub fn force() -> Self {
        Self {
            cascade: false,
            validate: false,
        }
    }
}

/// Normalise un champ texte optionnel : `Some("")` ou blanc devient `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| if v.trim().is_empty() { None } else { Some(v) })
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModelData {
        let mut model = ModelData::new("m1", "Test");
        model.elements.insert(
            "A".into(),
            Element::new("A", ElementType::ApplicationComponent, "X"),
        );
        model
            .elements
            .insert("B".into(), Element::new("B", ElementType::BusinessActor, "Y"));
        model.relationships.insert(
            "R".into(),
            Relationship::new("R", RelationshipType::Serving, "A", "B"),
        );
        let mut view = View::new("V", "Vue");
        view.elements = vec!["A".into(), "GHOST".into()];
        model.views.insert("V".into(), view);
        model
    }

    #[test]
    fn test_rebuild_back_references() {
        let mut model = sample();
        model.rebuild_back_references();

        let a = &model.elements["A"];
        assert_eq!(a.outgoing_relations().iter().collect::<Vec<_>>(), ["R"]);
        assert!(a.in_views().contains("V"));
        assert_eq!(
            model.elements["B"]
                .incoming_relations()
                .iter()
                .collect::<Vec<_>>(),
            ["R"]
        );
        assert!(model.elements["B"].in_views().is_empty());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut model = sample();
        model.rebuild_back_references();
        let first = model.clone();
        model.rebuild_back_references();
        assert_eq!(first, model);
    }

    #[test]
    fn test_global_id_space() {
        let model = sample();
        assert!(model.contains_id("A"));
        assert!(model.contains_id("R"));
        assert!(model.contains_id("V"));
        assert!(!model.contains_id("propid-1"));
    }

    #[test]
    fn test_dependents_listing() {
        let mut model = sample();
        model.rebuild_back_references();
        assert_eq!(model.elements["A"].dependents(), vec!["R", "V"]);
        assert!(model.elements["B"].has_dependents());
    }

    #[test]
    fn test_element_json_shape() {
        let el = Element::new("A", ElementType::Goal, "But");
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["type"], "Goal");
        assert!(json["outgoingRelations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some("doc".into())), Some("doc".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_delete_options_defaults() {
        let opts = DeleteOptions::default();
        assert!(opts.cascade && opts.validate);
        assert!(!DeleteOptions::strict().cascade);
        assert!(!DeleteOptions::force().validate);
    }
}
