// FICHIER : archimate-core/src/model_engine/mod.rs

// 1. Modules Fondamentaux (Le cœur du moteur)
pub mod archimate; // Taxonomie fermée : couches, types, règles de relation
pub mod types;

// 2. Modules de Logique Métier
pub mod exchange; // Format d'échange ArchiMate 3 (XML)
pub mod manipulator; // Mutations avec maintien des invariants
pub mod persistence; // Chargement / sauvegarde (sauvegarde horodatée, écriture atomique)
pub mod state; // Accès partagé pour les hôtes asynchrones
pub mod transactions; // Snapshot + rollback
pub mod validators; // Type, règles métier, intégrité, schéma, rapport

// 3. Re-exports (Façade publique pour le reste de l'app)

// Modèle
pub use types::{
    DeleteOptions, Element, ElementPatch, ElementSpec, ModelData, NodeLink, PropertyDefinition,
    PropertyMap, Relationship, RelationshipPatch, RelationshipSpec, View, ViewPatch, ViewSpec,
};

// Taxonomie
pub use archimate::{ElementType, Layer, RelationshipType};

// Moteur & Persistance
pub use exchange::ExchangeCodec;
pub use manipulator::{DeleteOutcome, ElementFilter, ModelManipulator, ModelStats, RelationshipFilter};
pub use persistence::{SaveOptions, SaveOutcome};
pub use state::SharedModel;
pub use transactions::{Transaction, TransactionRecord, TransactionStatus};

// Validators
pub use validators::{
    ModelValidator, SchemaOutcome, SchemaValidator, Severity, ValidationIssue, ValidationReport,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EngineConfig;

    #[test]
    fn test_integration_facade() {
        // 1. Accès aux types de base
        let model = ModelData::default();
        assert!(model.is_empty());

        // 2. Moteur + codec via la façade
        let mut engine = ModelManipulator::new(EngineConfig::default());
        let el = engine
            .create_element(ElementSpec::new("BusinessProcess", "Souscription"))
            .unwrap();
        assert_eq!(el.element_type.layer(), Layer::Business);
        let xml = ExchangeCodec::default().encode(engine.get_model()).unwrap();
        assert!(xml.contains("BusinessProcess"));

        // 3. Taxonomie
        assert_eq!("Serving".parse::<RelationshipType>().unwrap(), RelationshipType::Serving);
    }
}
