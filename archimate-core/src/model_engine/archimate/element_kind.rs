// FICHIER : archimate-core/src/model_engine/archimate/element_kind.rs

use crate::utils::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Les 7 couches du langage ArchiMate 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Strategy,
    Business,
    Application,
    Technology,
    Physical,
    Motivation,
    ImplementationMigration,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Strategy,
        Layer::Business,
        Layer::Application,
        Layer::Technology,
        Layer::Physical,
        Layer::Motivation,
        Layer::ImplementationMigration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Strategy => "Strategy",
            Layer::Business => "Business",
            Layer::Application => "Application",
            Layer::Technology => "Technology",
            Layer::Physical => "Physical",
            Layer::Motivation => "Motivation",
            Layer::ImplementationMigration => "ImplementationMigration",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Layer::ALL
            .iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| AppError::invalid_field("layer", format!("Couche inconnue : '{}'", s)))
    }
}

/// Aspect transverse d'un élément : sert de clé aux contraintes de relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    ActiveStructure,
    Behavior,
    PassiveStructure,
    Motivation,
    Strategy,
    Composite,
    Implementation,
}

/// Génère l'énumération fermée des types d'éléments avec leur couche et leur aspect.
/// Chaque entrée a la forme `Couche => [Variante: Aspect, ...]`.
macro_rules! element_types {
    (
        $(
            $layer:ident => [
                $( $variant:ident : $aspect:ident ),* $(,)?
            ]
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ElementType {
            $( $( $variant, )* )*
        }

        impl ElementType {
            /// Toute la taxonomie, dans l'ordre de déclaration des couches.
            pub const ALL: &'static [ElementType] = &[
                $( $( ElementType::$variant, )* )*
            ];

            /// Nom canonique, tel qu'écrit dans `xsi:type`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $( ElementType::$variant => stringify!($variant), )* )*
                }
            }

            pub fn layer(&self) -> Layer {
                match self {
                    $( $( ElementType::$variant => Layer::$layer, )* )*
                }
            }

            pub fn aspect(&self) -> Aspect {
                match self {
                    $( $( ElementType::$variant => Aspect::$aspect, )* )*
                }
            }
        }
    };
}

element_types! {
    Strategy => [
        Resource: Strategy,
        Capability: Strategy,
        ValueStream: Strategy,
        CourseOfAction: Strategy,
    ],
    Business => [
        BusinessActor: ActiveStructure,
        BusinessRole: ActiveStructure,
        BusinessCollaboration: ActiveStructure,
        BusinessInterface: ActiveStructure,
        BusinessProcess: Behavior,
        BusinessFunction: Behavior,
        BusinessInteraction: Behavior,
        BusinessEvent: Behavior,
        BusinessService: Behavior,
        BusinessObject: PassiveStructure,
        Contract: PassiveStructure,
        Representation: PassiveStructure,
        Product: Composite,
    ],
    Application => [
        ApplicationComponent: ActiveStructure,
        ApplicationCollaboration: ActiveStructure,
        ApplicationInterface: ActiveStructure,
        ApplicationFunction: Behavior,
        ApplicationInteraction: Behavior,
        ApplicationProcess: Behavior,
        ApplicationEvent: Behavior,
        ApplicationService: Behavior,
        DataObject: PassiveStructure,
    ],
    Technology => [
        Node: ActiveStructure,
        Device: ActiveStructure,
        SystemSoftware: ActiveStructure,
        TechnologyCollaboration: ActiveStructure,
        TechnologyInterface: ActiveStructure,
        Path: ActiveStructure,
        CommunicationNetwork: ActiveStructure,
        TechnologyFunction: Behavior,
        TechnologyProcess: Behavior,
        TechnologyInteraction: Behavior,
        TechnologyEvent: Behavior,
        TechnologyService: Behavior,
        Artifact: PassiveStructure,
    ],
    Physical => [
        Equipment: ActiveStructure,
        Facility: ActiveStructure,
        DistributionNetwork: ActiveStructure,
        Material: PassiveStructure,
    ],
    Motivation => [
        Stakeholder: Motivation,
        Driver: Motivation,
        Assessment: Motivation,
        Goal: Motivation,
        Outcome: Motivation,
        Principle: Motivation,
        Requirement: Motivation,
        Constraint: Motivation,
        Meaning: Motivation,
        Value: Motivation,
    ],
    ImplementationMigration => [
        WorkPackage: Implementation,
        Deliverable: Implementation,
        ImplementationEvent: Implementation,
        Plateau: Implementation,
        Gap: Implementation,
    ],
}

impl ElementType {
    /// Types d'une couche donnée (ordre de déclaration).
    pub fn in_layer(layer: Layer) -> impl Iterator<Item = ElementType> {
        ElementType::ALL
            .iter()
            .copied()
            .filter(move |t| t.layer() == layer)
    }

    pub fn is_motivation(&self) -> bool {
        self.aspect() == Aspect::Motivation
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = AppError;

    /// Correspondance exacte d'abord, puis insensible à la casse.
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        if needle.is_empty() {
            return Err(AppError::invalid_field(
                "type",
                "Le type d'élément est obligatoire",
            ));
        }
        ElementType::ALL
            .iter()
            .find(|t| t.as_str() == needle)
            .or_else(|| {
                ElementType::ALL
                    .iter()
                    .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            })
            .copied()
            .ok_or_else(|| {
                AppError::invalid_field("type", format!("Type d'élément inconnu : '{}'", s))
            })
    }
}
