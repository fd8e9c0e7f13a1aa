// FICHIER : archimate-core/src/model_engine/exchange/mod.rs

//! Codec du format d'échange ArchiMate 3 (Open Group Exchange Format).

pub mod document;
pub mod reader;
pub mod writer;

use crate::model_engine::types::ModelData;
use crate::utils::{EngineConfig, Result};

pub use reader::ModelReader;
pub use writer::ModelWriter;

pub const ARCHIMATE_NS: &str = "http://www.opengroup.org/xsd/archimate/3.0/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str = "http://www.opengroup.org/xsd/archimate/3.0/ http://www.opengroup.org/xsd/archimate/3.1/archimate3_Diagram.xsd";

/// Point d'entrée du codec : encode / décode avec une langue par défaut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeCodec {
    language: String,
}

impl Default for ExchangeCodec {
    fn default() -> Self {
        Self::new("en")
    }
}

impl ExchangeCodec {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.language.clone())
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// La langue du modèle (lue à l'import) prime sur la langue par défaut.
    pub fn encode(&self, model: &ModelData) -> Result<String> {
        let lang = model.language.as_deref().unwrap_or(&self.language);
        ModelWriter::new(lang).write(model)
    }

    pub fn decode(&self, xml: &str) -> Result<ModelData> {
        ModelReader::new(&self.language).read(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_engine::archimate::{ElementType, RelationshipType};
    use crate::model_engine::types::{Element, NodeLink, PropertyDefinition, Relationship, View};
    use std::collections::HashSet;

    fn sample() -> ModelData {
        let mut m = ModelData::new("id-model-1", "Banque");
        m.documentation = Some("Cartographie & flux <SI>".into());
        m.properties.insert("propid-owner".into(), "DSI".into());
        m.property_definitions.insert(
            "propid-owner".into(),
            PropertyDefinition {
                identifier: "propid-owner".into(),
                name: "Propriétaire".into(),
            },
        );

        let mut a = Element::new("A", ElementType::ApplicationComponent, "CRM");
        a.documentation = Some("Gestion client".into());
        a.properties.insert("propid-owner".into(), "Équipe CRM".into());
        m.elements.insert("A".into(), a);
        m.elements
            .insert("B".into(), Element::new("B", ElementType::BusinessActor, "Client"));
        m.elements
            .insert("C".into(), Element::new("C", ElementType::Node, "Serveur"));

        let mut r = Relationship::new("R", RelationshipType::Serving, "A", "B");
        r.name = Some("sert".into());
        m.relationships.insert("R".into(), r);
        m.relationships.insert(
            "R2".into(),
            Relationship::new("R2", RelationshipType::Realization, "C", "A"),
        );

        let mut v = View::new("V", "Vue applicative");
        v.viewpoint = Some("Application Cooperation".into());
        v.elements = vec!["A".into(), "B".into(), "C".into()];
        v.relationships = vec!["R".into()];
        v.node_hierarchy = vec![NodeLink::new("C", "A")];
        m.views.insert("V".into(), v);
        m.rebuild_back_references();
        m
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let codec = ExchangeCodec::new("fr");
        let original = sample();
        let xml = codec.encode(&original).unwrap();
        let decoded = codec.decode(&xml).unwrap();

        assert_eq!(decoded.id, original.id);
        assert_eq!(decoded.name, original.name);
        assert_eq!(decoded.documentation, original.documentation);
        assert_eq!(decoded.properties, original.properties);
        assert_eq!(decoded.elements, original.elements);
        assert_eq!(decoded.relationships, original.relationships);
        assert_eq!(decoded.property_definitions, original.property_definitions);

        // L'imbrication des nœuds réordonne les éléments d'une vue : on compare en ensembles
        let (dv, ov) = (&decoded.views["V"], &original.views["V"]);
        let as_set = |v: &View| v.elements().iter().cloned().collect::<HashSet<String>>();
        assert_eq!(as_set(dv), as_set(ov));
        assert_eq!(dv.relationships(), ov.relationships());
        assert_eq!(dv.node_hierarchy(), ov.node_hierarchy());
        assert_eq!(dv.viewpoint, ov.viewpoint);
        assert_eq!(dv.name, ov.name);
        assert_eq!(dv.view_type, ov.view_type);
    }

    #[test]
    fn test_encoded_output_passes_structural_check() {
        use crate::model_engine::validators::{SchemaValidator, StructuralSchemaValidator};

        let xml = ExchangeCodec::default().encode(&sample()).unwrap();
        let outcome = StructuralSchemaValidator.validate(&xml, "archimate3_Diagram.xsd");
        assert!(outcome.valid, "{:?}", outcome.errors);
    }

    #[test]
    fn test_model_language_wins_over_default() {
        let mut m = sample();
        m.language = Some("de".into());
        let xml = ExchangeCodec::new("en").encode(&m).unwrap();
        assert!(xml.contains(r#"xml:lang="de""#));
        assert!(!xml.contains(r#"xml:lang="en""#));
    }
}
