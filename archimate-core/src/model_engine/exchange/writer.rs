// FICHIER : archimate-core/src/model_engine/exchange/writer.rs

use super::document::*;
use super::{ARCHIMATE_NS, SCHEMA_LOCATION, XSI_NS};
use crate::model_engine::types::{ModelData, PropertyMap, View};
use crate::utils::{AppError, Result};
use quick_xml::se::Serializer;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// Gabarit de mise en page (grille simple, coordonnées absolues)
const NODE_W: i64 = 120;
const NODE_H: i64 = 55;
const GAP: i64 = 20;
const HEADER: i64 = 30;
const ROOTS_PER_ROW: usize = 4;
const CHILDREN_PER_ROW: usize = 3;

/// Convertit l'agrégat en document d'échange puis en texte XML.
pub struct ModelWriter<'a> {
    lang: &'a str,
}

impl<'a> ModelWriter<'a> {
    pub fn new(lang: &'a str) -> Self {
        Self { lang }
    }

    pub fn write(&self, model: &ModelData) -> Result<String> {
        let doc = self.to_document(model);

        let mut body = String::new();
        let mut ser = Serializer::with_root(&mut body, Some("model"))
            .map_err(|e| AppError::Xml(e.to_string()))?;
        ser.indent(' ', 2);
        doc.serialize(ser)
            .map_err(|e| AppError::Xml(e.to_string()))?;

        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
            body
        ))
    }

    pub fn to_document(&self, model: &ModelData) -> ModelDoc {
        let elements: Vec<ElementDoc> = model
            .elements
            .values()
            .map(|e| ElementDoc {
                identifier: e.id.clone(),
                kind: e.element_type.as_str().to_string(),
                name: vec![self.text(&e.name)],
                documentation: self.optional_text(&e.documentation),
                properties: self.properties(&e.properties),
            })
            .collect();

        let relationships: Vec<RelationshipDoc> = model
            .relationships
            .values()
            .map(|r| RelationshipDoc {
                identifier: r.id.clone(),
                source: r.source_id.clone(),
                target: r.target_id.clone(),
                kind: r.relationship_type.as_str().to_string(),
                name: self.optional_text(&r.name),
                documentation: self.optional_text(&r.documentation),
                properties: self.properties(&r.properties),
            })
            .collect();

        let property_definitions: Vec<PropertyDefinitionDoc> = model
            .property_definitions
            .values()
            .map(|p| PropertyDefinitionDoc {
                identifier: p.identifier.clone(),
                data_type: "string".to_string(),
                name: vec![self.text(&p.name)],
            })
            .collect();

        let views: Vec<ViewDoc> = model
            .views
            .values()
            .map(|v| self.view(v, model))
            .collect();

        ModelDoc {
            xmlns: Some(ARCHIMATE_NS.to_string()),
            xmlns_xsi: Some(XSI_NS.to_string()),
            schema_location: Some(SCHEMA_LOCATION.to_string()),
            identifier: model.id.clone(),
            name: vec![self.text(&model.name)],
            documentation: self.optional_text(&model.documentation),
            properties: self.properties(&model.properties),
            elements: (!elements.is_empty()).then_some(ElementsDoc { items: elements }),
            relationships: (!relationships.is_empty())
                .then_some(RelationshipsDoc { items: relationships }),
            property_definitions: (!property_definitions.is_empty()).then_some(
                PropertyDefinitionsDoc {
                    items: property_definitions,
                },
            ),
            views: (!views.is_empty()).then_some(ViewsDoc {
                diagrams: DiagramsDoc { items: views },
            }),
        }
    }

    fn text(&self, value: &str) -> LangString {
        LangString::new(self.lang, value)
    }

    fn optional_text(&self, value: &Option<String>) -> Vec<LangString> {
        value
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| self.text(v))
            .collect()
    }

    fn properties(&self, props: &PropertyMap) -> Option<PropertiesDoc> {
        if props.is_empty() {
            return None;
        }
        Some(PropertiesDoc {
            items: props
                .iter()
                .map(|(k, v)| PropertyDoc {
                    definition_ref: k.clone(),
                    value: vec![self.text(v)],
                })
                .collect(),
        })
    }

    fn view(&self, view: &View, model: &ModelData) -> ViewDoc {
        // 1. Parents retenus par élément : toutes les paires valides, sans cycle.
        let parents = resolve_parents(view);

        // 2. Arbre de nœuds : un enfant est répété sous chacun de ses parents,
        //    sans parent affichable il reste à plat.
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut roots = Vec::new();
        for element_id in dedup(&view.elements) {
            if !model.elements.contains_key(element_id) {
                continue;
            }
            let shown: Vec<&str> = parents
                .get(element_id)
                .map(|ps| {
                    ps.iter()
                        .copied()
                        .filter(|p| model.elements.contains_key(*p))
                        .collect()
                })
                .unwrap_or_default();
            if shown.is_empty() {
                roots.push(element_id);
            }
            for parent in shown {
                children.entry(parent).or_default().push(element_id);
            }
        }

        let mut builder = NodeBuilder {
            children,
            used: HashSet::new(),
            first_node: HashMap::new(),
        };
        let prefix = format!("n-{}", view.id);
        let mut nodes: Vec<NodeDoc> = roots
            .into_iter()
            .map(|r| builder.build(r, &prefix))
            .collect();
        layout_roots(&mut nodes);

        // 3. Connexions : chaque extrémité pointe vers le premier nœud de l'élément
        let connections = dedup(&view.relationships)
            .into_iter()
            .filter_map(|rid| model.relationships.get(rid))
            .map(|r| ConnectionDoc {
                identifier: format!("c-{}-{}", view.id, r.id),
                relationship_ref: Some(r.id.clone()),
                kind: Some("Relationship".to_string()),
                source: builder.first_node.get(r.source_id.as_str()).cloned(),
                target: builder.first_node.get(r.target_id.as_str()).cloned(),
            })
            .collect();

        ViewDoc {
            identifier: view.id.clone(),
            // Pas de type par défaut inventé : le décodage restitue la valeur telle quelle
            kind: view.view_type.clone(),
            viewpoint: view.viewpoint.clone(),
            name: vec![self.text(&view.name)],
            documentation: self.optional_text(&view.documentation),
            properties: self.properties(&view.properties),
            nodes,
            connections,
        }
    }
}

fn dedup(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Construit les nœuds imbriqués d'une vue.
/// L'identifiant d'un nœud suit le chemin depuis la racine (`n-V-A-B`).
struct NodeBuilder<'v> {
    children: HashMap<&'v str, Vec<&'v str>>,
    used: HashSet<String>,
    /// Premier nœud émis pour chaque élément (cible des connexions)
    first_node: HashMap<&'v str, String>,
}

impl<'v> NodeBuilder<'v> {
    fn build(&mut self, element_id: &'v str, prefix: &str) -> NodeDoc {
        let identifier = self.unique_id(format!("{}-{}", prefix, element_id));
        self.first_node
            .entry(element_id)
            .or_insert_with(|| identifier.clone());

        let kids = self.children.get(element_id).cloned().unwrap_or_default();
        let children: Vec<NodeDoc> = kids
            .into_iter()
            .map(|kid| self.build(kid, &identifier))
            .collect();

        NodeDoc {
            identifier,
            element_ref: Some(element_id.to_string()),
            kind: Some("Element".to_string()),
            children,
            ..Default::default()
        }
    }

    fn unique_id(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.used.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}-{}", base, n);
        }
        candidate
    }
}

/// Parents visuels de chaque enfant : toutes les paires dont les deux membres
/// sont dans la vue. Une paire qui fermerait un cycle est ignorée.
fn resolve_parents(view: &View) -> HashMap<&str, Vec<&str>> {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for link in &view.node_hierarchy {
        let (parent, child) = (link.parent_element.as_str(), link.child_element.as_str());
        if parent == child || !view.contains_element(parent) || !view.contains_element(child) {
            continue;
        }
        if parents.get(child).is_some_and(|ps| ps.contains(&parent)) {
            continue;
        }
        if is_ancestor(&parents, child, parent) {
            continue;
        }
        parents.entry(child).or_default().push(parent);
    }
    parents
}

/// Vrai si `ancestor` est atteint en remontant les parents depuis `from` (inclus).
fn is_ancestor<'a>(parents: &HashMap<&'a str, Vec<&'a str>>, ancestor: &str, from: &'a str) -> bool {
    let mut stack = vec![from];
    let mut seen: HashSet<&'a str> = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == ancestor {
            return true;
        }
        if seen.insert(current) {
            if let Some(ps) = parents.get(current) {
                stack.extend(ps.iter().copied());
            }
        }
    }
    false
}

/// Taille d'un nœud selon ses enfants (rangées de `CHILDREN_PER_ROW`).
fn measure(node: &NodeDoc) -> (i64, i64) {
    if node.children.is_empty() {
        return (NODE_W, NODE_H);
    }
    let (mut width, mut height) = (0, HEADER);
    for row in node.children.chunks(CHILDREN_PER_ROW) {
        let sizes: Vec<(i64, i64)> = row.iter().map(measure).collect();
        let row_w = sizes.iter().map(|s| s.0).sum::<i64>() + GAP * (sizes.len() as i64 + 1);
        let row_h = sizes.iter().map(|s| s.1).max().unwrap_or(NODE_H);
        width = width.max(row_w);
        height += row_h + GAP;
    }
    (width.max(NODE_W), height)
}

fn place(node: &mut NodeDoc, x: i64, y: i64) {
    let (w, h) = measure(node);
    node.x = Some(x);
    node.y = Some(y);
    node.w = Some(w);
    node.h = Some(h);

    let mut cy = y + HEADER;
    for row in node.children.chunks_mut(CHILDREN_PER_ROW) {
        let mut cx = x + GAP;
        let mut row_h = 0;
        for child in row.iter_mut() {
            let (cw, ch) = measure(child);
            place(child, cx, cy);
            cx += cw + GAP;
            row_h = row_h.max(ch);
        }
        cy += row_h + GAP;
    }
}

fn layout_roots(nodes: &mut [NodeDoc]) {
    let mut y = GAP;
    for row in nodes.chunks_mut(ROOTS_PER_ROW) {
        let mut x = GAP;
        let mut row_h = 0;
        for node in row.iter_mut() {
            let (w, h) = measure(node);
            place(node, x, y);
            x += w + GAP;
            row_h = row_h.max(h);
        }
        y += row_h + GAP;
    }
}
