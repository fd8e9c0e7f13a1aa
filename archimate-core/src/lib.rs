// FICHIER : archimate-core/src/lib.rs

pub mod model_engine;
pub mod utils;

// Façade publique : ce que la couche protocole (hors de ce crate) consomme.
pub use model_engine::{
    DeleteOptions, Element, ElementPatch, ElementSpec, ElementType, ExchangeCodec, Layer,
    ModelData, ModelManipulator, NodeLink, PropertyDefinition, Relationship, RelationshipPatch,
    RelationshipSpec, RelationshipType, SaveOptions, SharedModel, Transaction,
    TransactionRecord, ValidationReport, View, ViewPatch, ViewSpec,
};
pub use utils::{AppError, EngineConfig, EntityKind, Result};
