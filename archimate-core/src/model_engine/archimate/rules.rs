// FICHIER : archimate-core/src/model_engine/archimate/rules.rs

use super::element_kind::{Aspect, ElementType};
use super::relationship_kind::RelationshipType;
use serde::Serialize;

/// Cardinalité déclarée d'un type de relation.
/// `OneToOne` interdit deux relations identiques (même type, même source, même cible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    OneToOne,
    ManyToMany,
}

/// Contrainte de compatibilité sur les extrémités d'une relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointConstraint {
    None,
    Aspects {
        source: &'static [Aspect],
        target: &'static [Aspect],
    },
    /// La cible doit être un élément de motivation
    MotivationTarget,
    /// Si une extrémité relève de la motivation, l'autre aussi
    MotivationClosed,
    /// Une source de motivation ne réalise qu'un élément de motivation
    MotivationRealization,
    SameType,
}

#[derive(Debug, Clone, Copy)]
pub struct RelationshipRule {
    pub relationship: RelationshipType,
    pub cardinality: Cardinality,
    pub constraint: EndpointConstraint,
}

const DYNAMIC_ENDS: &[Aspect] = &[
    Aspect::Behavior,
    Aspect::ActiveStructure,
    Aspect::Strategy,
    Aspect::Implementation,
];
const SERVING_SOURCES: &[Aspect] = &[
    Aspect::Behavior,
    Aspect::ActiveStructure,
    Aspect::Strategy,
    Aspect::Composite,
];
const SERVING_TARGETS: &[Aspect] = &[
    Aspect::Behavior,
    Aspect::ActiveStructure,
    Aspect::Strategy,
    Aspect::Composite,
    Aspect::Implementation,
];

/// Table des règles : une entrée par type de relation.
pub fn rule_for(relationship: RelationshipType) -> RelationshipRule {
    use RelationshipType::*;

    let cardinality = match relationship {
        Composition | Aggregation | Assignment | Realization | Specialization => {
            Cardinality::OneToOne
        }
        _ => Cardinality::ManyToMany,
    };

    let constraint = match relationship {
        Assignment => EndpointConstraint::Aspects {
            source: &[Aspect::ActiveStructure, Aspect::Strategy],
            target: &[
                Aspect::ActiveStructure,
                Aspect::Behavior,
                Aspect::Strategy,
                Aspect::Implementation,
            ],
        },
        Access => EndpointConstraint::Aspects {
            source: &[
                Aspect::Behavior,
                Aspect::ActiveStructure,
                Aspect::Implementation,
            ],
            target: &[Aspect::PassiveStructure],
        },
        Triggering | Flow => EndpointConstraint::Aspects {
            source: DYNAMIC_ENDS,
            target: DYNAMIC_ENDS,
        },
        Serving | UsedBy => EndpointConstraint::Aspects {
            source: SERVING_SOURCES,
            target: SERVING_TARGETS,
        },
        Influence => EndpointConstraint::MotivationTarget,
        Realization => EndpointConstraint::MotivationRealization,
        Specialization => EndpointConstraint::SameType,
        Composition | Aggregation => EndpointConstraint::MotivationClosed,
        Association => EndpointConstraint::None,
    };

    RelationshipRule {
        relationship,
        cardinality,
        constraint,
    }
}

impl RelationshipRule {
    /// Vérifie la compatibilité des extrémités. Renvoie le message d'erreur en cas de refus.
    pub fn check(&self, source: ElementType, target: ElementType) -> Result<(), String> {
        let refused = || {
            format!(
                "Relation {} non autorisée de {} vers {}",
                self.relationship, source, target
            )
        };

        let allowed = match self.constraint {
            EndpointConstraint::None => true,
            EndpointConstraint::Aspects {
                source: sources,
                target: targets,
            } => sources.contains(&source.aspect()) && targets.contains(&target.aspect()),
            EndpointConstraint::MotivationTarget => target.is_motivation(),
            EndpointConstraint::MotivationClosed => source.is_motivation() == target.is_motivation(),
            EndpointConstraint::MotivationRealization => {
                !source.is_motivation() || target.is_motivation()
            }
            EndpointConstraint::SameType => source == target,
        };

        if allowed {
            Ok(())
        } else {
            Err(refused())
        }
    }

    pub fn is_one_to_one(&self) -> bool {
        self.cardinality == Cardinality::OneToOne
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_table() {
        assert!(rule_for(RelationshipType::Composition).is_one_to_one());
        assert!(rule_for(RelationshipType::Specialization).is_one_to_one());
        assert!(!rule_for(RelationshipType::Serving).is_one_to_one());
        assert!(!rule_for(RelationshipType::Association).is_one_to_one());
    }

    #[test]
    fn test_serving_component_to_actor_allowed() {
        let rule = rule_for(RelationshipType::Serving);
        assert!(rule
            .check(ElementType::ApplicationComponent, ElementType::BusinessActor)
            .is_ok());
        assert!(rule
            .check(ElementType::DataObject, ElementType::BusinessActor)
            .is_err());
    }

    #[test]
    fn test_access_requires_passive_target() {
        let rule = rule_for(RelationshipType::Access);
        assert!(rule
            .check(ElementType::BusinessProcess, ElementType::BusinessObject)
            .is_ok());
        let err = rule
            .check(ElementType::BusinessProcess, ElementType::BusinessActor)
            .unwrap_err();
        assert!(err.contains("Access"));
    }

    #[test]
    fn test_motivation_constraints() {
        assert!(rule_for(RelationshipType::Influence)
            .check(ElementType::Driver, ElementType::Goal)
            .is_ok());
        assert!(rule_for(RelationshipType::Influence)
            .check(ElementType::Goal, ElementType::Node)
            .is_err());
        assert!(rule_for(RelationshipType::Realization)
            .check(ElementType::Requirement, ElementType::Node)
            .is_err());
        assert!(rule_for(RelationshipType::Realization)
            .check(ElementType::Node, ElementType::Requirement)
            .is_ok());
        assert!(rule_for(RelationshipType::Composition)
            .check(ElementType::Goal, ElementType::Node)
            .is_err());
    }

    #[test]
    fn test_specialization_same_type() {
        let rule = rule_for(RelationshipType::Specialization);
        assert!(rule.check(ElementType::Node, ElementType::Node).is_ok());
        assert!(rule.check(ElementType::Node, ElementType::Device).is_err());
    }

    #[test]
    fn test_association_unconstrained() {
        assert!(rule_for(RelationshipType::Association)
            .check(ElementType::Gap, ElementType::Material)
            .is_ok());
    }
}
