// FICHIER : archimate-core/src/model_engine/exchange/document.rs

//! Correspondance serde du format d'échange ArchiMate 3 (Open Group).
//!
//! Les attributs préfixés (`xsi:type`, `xml:lang`) sont écrits avec leur préfixe ;
//! à la lecture, quick-xml les présente par leur nom local, d'où les alias.

use serde::{Deserialize, Serialize};

/// Texte localisé : `<name xml:lang="en">Valeur</name>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LangString {
    #[serde(
        rename = "@xml:lang",
        alias = "@lang",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}

impl LangString {
    pub fn new(lang: &str, value: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.to_string()),
            value: value.into(),
        }
    }
}

/// Choisit la variante dans la langue demandée, sinon la première.
pub fn pick_lang<'a>(values: &'a [LangString], lang: &str) -> Option<&'a LangString> {
    values
        .iter()
        .find(|v| v.lang.as_deref() == Some(lang))
        .or_else(|| values.first())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDoc {
    #[serde(rename = "@propertyDefinitionRef")]
    pub definition_ref: String,
    #[serde(default)]
    pub value: Vec<LangString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertiesDoc {
    #[serde(rename = "property", default)]
    pub items: Vec<PropertyDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(rename = "@xsi:type", alias = "@type")]
    pub kind: String,
    #[serde(default)]
    pub name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementsDoc {
    #[serde(rename = "element", default)]
    pub items: Vec<ElementDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(rename = "@source")]
    pub source: String,
    #[serde(rename = "@target")]
    pub target: String,
    #[serde(rename = "@xsi:type", alias = "@type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipsDoc {
    #[serde(rename = "relationship", default)]
    pub items: Vec<RelationshipDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinitionDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(rename = "@type", default = "default_property_type")]
    pub data_type: String,
    #[serde(default)]
    pub name: Vec<LangString>,
}

fn default_property_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinitionsDoc {
    #[serde(rename = "propertyDefinition", default)]
    pub items: Vec<PropertyDefinitionDoc>,
}

/// Nœud de diagramme ; les nœuds imbriqués portent la hiérarchie visuelle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(rename = "@elementRef", default, skip_serializing_if = "Option::is_none")]
    pub element_ref: Option<String>,
    #[serde(
        rename = "@xsi:type",
        alias = "@type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(rename = "@x", default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(rename = "@y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(rename = "@w", default, skip_serializing_if = "Option::is_none")]
    pub w: Option<i64>,
    #[serde(rename = "@h", default, skip_serializing_if = "Option::is_none")]
    pub h: Option<i64>,
    #[serde(rename = "node", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(
        rename = "@relationshipRef",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relationship_ref: Option<String>,
    #[serde(
        rename = "@xsi:type",
        alias = "@type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(rename = "@source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "@target", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDoc {
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(
        rename = "@xsi:type",
        alias = "@type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(rename = "@viewpoint", default, skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<String>,
    #[serde(default)]
    pub name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesDoc>,
    // Tous les nœuds précèdent toutes les connexions dans le document
    #[serde(rename = "node", default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeDoc>,
    #[serde(rename = "connection", default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramsDoc {
    #[serde(rename = "view", default)]
    pub items: Vec<ViewDoc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewsDoc {
    #[serde(default)]
    pub diagrams: DiagramsDoc,
}

/// Racine `<model>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDoc {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,
    #[serde(rename = "@xmlns:xsi", default, skip_serializing_if = "Option::is_none")]
    pub xmlns_xsi: Option<String>,
    #[serde(
        rename = "@xsi:schemaLocation",
        alias = "@schemaLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_location: Option<String>,
    #[serde(rename = "@identifier")]
    pub identifier: String,
    #[serde(default)]
    pub name: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<LangString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<ElementsDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<RelationshipsDoc>,
    #[serde(
        rename = "propertyDefinitions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub property_definitions: Option<PropertyDefinitionsDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<ViewsDoc>,
}
