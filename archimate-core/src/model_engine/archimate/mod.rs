// FICHIER : archimate-core/src/model_engine/archimate/mod.rs

//! Taxonomie fermée ArchiMate 3 : couches, types d'éléments, types de relations
//! et table des règles de compatibilité. Recherche pure, sans état.

pub mod element_kind;
pub mod relationship_kind;
pub mod rules;

pub use element_kind::{Aspect, ElementType, Layer};
pub use relationship_kind::{RelationshipCategory, RelationshipType};
pub use rules::{rule_for, Cardinality, EndpointConstraint, RelationshipRule};
