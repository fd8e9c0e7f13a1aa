// FICHIER : archimate-core/src/model_engine/exchange/reader.rs

use super::document::*;
use crate::model_engine::archimate::{ElementType, RelationshipType};
use crate::model_engine::types::{
    non_blank, Element, ModelData, NodeLink, PropertyDefinition, PropertyMap, Relationship, View,
};
use crate::utils::{AppError, Result};
use std::collections::HashSet;
use tracing::warn;

/// Reconstruit l'agrégat depuis un document d'échange.
///
/// Seules les données explicites sont lues : les références inverses
/// (`outgoingRelations`, `incomingRelations`, `inViews`) sont recalculées.
pub struct ModelReader<'a> {
    lang: &'a str,
}

impl<'a> ModelReader<'a> {
    pub fn new(lang: &'a str) -> Self {
        Self { lang }
    }

    pub fn read(&self, xml: &str) -> Result<ModelData> {
        let doc: ModelDoc =
            quick_xml::de::from_str(xml).map_err(|e| AppError::Xml(e.to_string()))?;
        self.from_document(doc)
    }

    pub fn from_document(&self, doc: ModelDoc) -> Result<ModelData> {
        if doc.identifier.trim().is_empty() {
            return Err(AppError::Xml(
                "Attribut 'identifier' manquant sur <model>".to_string(),
            ));
        }

        let name = pick_lang(&doc.name, self.lang);
        let mut model = ModelData::new(
            doc.identifier.clone(),
            name.map(|n| n.value.clone()).unwrap_or_default(),
        );
        model.language = name.and_then(|n| n.lang.clone());
        model.documentation = self.text(&doc.documentation);
        model.properties = Self::properties(doc.properties);

        // Types hors taxonomie : ignorés (avec trace), ainsi que ce qui les référence
        let mut skipped: HashSet<String> = HashSet::new();

        for e in doc.elements.map(|s| s.items).unwrap_or_default() {
            let element_type = match e.kind.parse::<ElementType>() {
                Ok(t) => t,
                Err(_) => {
                    warn!(
                        "Élément '{}' ignoré : type non supporté '{}'",
                        e.identifier, e.kind
                    );
                    skipped.insert(e.identifier);
                    continue;
                }
            };
            let mut element = Element::new(
                e.identifier.clone(),
                element_type,
                self.text(&e.name).unwrap_or_default(),
            );
            element.documentation = self.text(&e.documentation);
            element.properties = Self::properties(e.properties);
            Self::insert_unique(&mut model, &e.identifier)?;
            model.elements.insert(e.identifier, element);
        }

        for r in doc.relationships.map(|s| s.items).unwrap_or_default() {
            if skipped.contains(&r.source) || skipped.contains(&r.target) {
                warn!(
                    "Relation '{}' ignorée : extrémité non supportée",
                    r.identifier
                );
                skipped.insert(r.identifier);
                continue;
            }
            let relationship_type = match r.kind.parse::<RelationshipType>() {
                Ok(t) => t,
                Err(_) => {
                    warn!(
                        "Relation '{}' ignorée : type non supporté '{}'",
                        r.identifier, r.kind
                    );
                    skipped.insert(r.identifier);
                    continue;
                }
            };
            let mut rel = Relationship::new(
                r.identifier.clone(),
                relationship_type,
                r.source,
                r.target,
            );
            rel.name = self.text(&r.name);
            rel.documentation = self.text(&r.documentation);
            rel.properties = Self::properties(r.properties);
            Self::insert_unique(&mut model, &r.identifier)?;
            model.relationships.insert(r.identifier, rel);
        }

        for p in doc.property_definitions.map(|s| s.items).unwrap_or_default() {
            let name = self.text(&p.name).unwrap_or_else(|| p.identifier.clone());
            model.property_definitions.insert(
                p.identifier.clone(),
                PropertyDefinition {
                    identifier: p.identifier,
                    name,
                },
            );
        }

        let views = doc.views.map(|v| v.diagrams.items).unwrap_or_default();
        for v in views {
            let mut view = View::new(v.identifier.clone(), self.text(&v.name).unwrap_or_default());
            view.view_type = non_blank(v.kind);
            view.viewpoint = non_blank(v.viewpoint);
            view.documentation = self.text(&v.documentation);
            view.properties = Self::properties(v.properties);

            for node in &v.nodes {
                Self::collect_node(node, None, &skipped, &mut view);
            }
            for c in &v.connections {
                if let Some(rel_ref) = &c.relationship_ref {
                    if !skipped.contains(rel_ref) && !view.contains_relationship(rel_ref) {
                        view.relationships.push(rel_ref.clone());
                    }
                }
            }

            Self::insert_unique(&mut model, &v.identifier)?;
            model.views.insert(v.identifier, view);
        }

        model.rebuild_back_references();
        tracing::debug!(
            "Modèle décodé : {} éléments, {} relations, {} vues",
            model.elements.len(),
            model.relationships.len(),
            model.views.len()
        );
        Ok(model)
    }

    /// Les nœuds sans `elementRef` (groupes, notes) sont traversés :
    /// leurs enfants se rattachent au plus proche ancêtre élément.
    fn collect_node(
        node: &NodeDoc,
        parent: Option<&str>,
        skipped: &HashSet<String>,
        view: &mut View,
    ) {
        let element = node
            .element_ref
            .as_deref()
            .filter(|id| !skipped.contains(*id));

        if let Some(id) = element {
            if !view.contains_element(id) {
                view.elements.push(id.to_string());
            }
            if let Some(parent_id) = parent {
                let link = NodeLink::new(parent_id, id);
                if parent_id != id && !view.node_hierarchy.contains(&link) {
                    view.node_hierarchy.push(link);
                }
            }
        }

        let next_parent = element.or(parent);
        for child in &node.children {
            Self::collect_node(child, next_parent, skipped, view);
        }
    }

    fn insert_unique(model: &ModelData, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(AppError::Xml("Identifiant vide dans le document".to_string()));
        }
        if model.contains_id(id) {
            return Err(AppError::Xml(format!(
                "Identifiant dupliqué dans le document : {}",
                id
            )));
        }
        Ok(())
    }

    fn text(&self, values: &[LangString]) -> Option<String> {
        pick_lang(values, self.lang)
            .map(|v| v.value.clone())
            .filter(|v| !v.is_empty())
    }

    /// Propriétés : une valeur par définition (langue indifférente, première retenue).
    fn properties(doc: Option<PropertiesDoc>) -> PropertyMap {
        doc.map(|p| p.items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                let value = p.value.into_iter().next().map(|v| v.value)?;
                Some((p.definition_ref, value))
            })
            .collect()
    }
}
