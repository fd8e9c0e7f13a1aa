// FICHIER : archimate-core/src/model_engine/manipulator/queries.rs

use super::ModelManipulator;
use crate::model_engine::archimate::{ElementType, Layer, RelationshipType};
use crate::model_engine::types::{Element, Relationship, View};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Filtre de liste d'éléments ; les critères absents ne filtrent pas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementFilter {
    #[serde(rename = "type")]
    pub element_type: Option<ElementType>,
    pub layer: Option<Layer>,
    /// Sous-chaîne du nom, sans tenir compte de la casse
    pub name_contains: Option<String>,
}

impl ElementFilter {
    pub fn of_type(element_type: ElementType) -> Self {
        Self {
            element_type: Some(element_type),
            ..Default::default()
        }
    }

    pub fn in_layer(layer: Layer) -> Self {
        Self {
            layer: Some(layer),
            ..Default::default()
        }
    }

    pub fn named(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    fn matches(&self, element: &Element) -> bool {
        self.element_type.map_or(true, |t| element.element_type == t)
            && self.layer.map_or(true, |l| element.element_type.layer() == l)
            && self.name_contains.as_deref().map_or(true, |f| {
                element.name.to_lowercase().contains(&f.to_lowercase())
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationshipFilter {
    #[serde(rename = "type")]
    pub relationship_type: Option<RelationshipType>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

impl RelationshipFilter {
    fn matches(&self, rel: &Relationship) -> bool {
        self.relationship_type
            .map_or(true, |t| rel.relationship_type == t)
            && self.source_id.as_deref().map_or(true, |s| rel.source_id == s)
            && self.target_id.as_deref().map_or(true, |t| rel.target_id == t)
    }
}

/// Statistiques du modèle (comptes par couche et par type de relation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub elements: usize,
    pub relationships: usize,
    pub views: usize,
    pub property_definitions: usize,
    pub elements_per_layer: IndexMap<String, usize>,
    pub relationships_per_type: IndexMap<String, usize>,
}

impl ModelManipulator {
    pub fn list_elements(&self, filter: &ElementFilter) -> Vec<&Element> {
        self.model
            .elements
            .values()
            .filter(|e| filter.matches(e))
            .collect()
    }

    pub fn list_relationships(&self, filter: &RelationshipFilter) -> Vec<&Relationship> {
        self.model
            .relationships
            .values()
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Relations sortantes puis entrantes d'un élément (vide s'il est inconnu).
    pub fn relationships_of(&self, element_id: &str) -> Vec<&Relationship> {
        let Some(element) = self.model.elements.get(element_id) else {
            return Vec::new();
        };
        element
            .outgoing_relations()
            .iter()
            .chain(element.incoming_relations().iter())
            .filter_map(|id| self.model.relationships.get(id))
            .collect()
    }

    pub fn list_views(&self) -> Vec<&View> {
        self.model.views.values().collect()
    }

    pub fn model_stats(&self) -> ModelStats {
        let mut elements_per_layer: IndexMap<String, usize> =
            Layer::ALL.iter().map(|l| (l.to_string(), 0)).collect();
        for element in self.model.elements.values() {
            *elements_per_layer
                .entry(element.element_type.layer().to_string())
                .or_insert(0) += 1;
        }

        let mut relationships_per_type: IndexMap<String, usize> = IndexMap::new();
        for rel in self.model.relationships.values() {
            *relationships_per_type
                .entry(rel.relationship_type.to_string())
                .or_insert(0) += 1;
        }

        ModelStats {
            elements: self.model.elements.len(),
            relationships: self.model.relationships.len(),
            views: self.model.views.len(),
            property_definitions: self.model.property_definitions.len(),
            elements_per_layer,
            relationships_per_type,
        }
    }
}

// --- TESTS UNITAIRES ---
#[cfg(test)]
mod tests {
    use super::super::tests::engine;
    use super::*;
    use crate::model_engine::types::{ElementSpec, RelationshipSpec};

    #[test]
    fn test_list_elements_filters() {
        let mut m = engine();
        m.create_element(ElementSpec::new("ApplicationService", "Service CRM"))
            .unwrap();

        assert_eq!(m.list_elements(&ElementFilter::default()).len(), 3);
        assert_eq!(
            m.list_elements(&ElementFilter::in_layer(Layer::Application)).len(),
            2
        );
        let crm = m.list_elements(&ElementFilter::in_layer(Layer::Application).named("crm"));
        assert_eq!(crm.len(), 2);
        assert_eq!(
            m.list_elements(&ElementFilter::of_type(ElementType::BusinessActor))[0].id,
            "B"
        );
    }

    #[test]
    fn test_relationship_queries() {
        let mut m = engine();
        m.create_relationship(RelationshipSpec::new("Flow", "B", "A").with_id("F"))
            .unwrap();

        let from_a = m.list_relationships(&RelationshipFilter {
            source_id: Some("A".into()),
            ..Default::default()
        });
        assert_eq!(from_a.len(), 1);

        let ids: Vec<&str> = m.relationships_of("A").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["R", "F"]);
        assert!(m.relationships_of("GHOST").is_empty());
    }

    #[test]
    fn test_model_stats() {
        let stats = engine().model_stats();
        assert_eq!(stats.elements, 2);
        assert_eq!(stats.relationships, 1);
        assert_eq!(stats.views, 1);
        assert_eq!(stats.elements_per_layer.len(), Layer::ALL.len());
        assert_eq!(stats.relationships_per_type["Serving"], 1);
        assert_eq!(stats.elements_per_layer.values().sum::<usize>(), 2);
    }
}
