// FICHIER : archimate-core/tests/model_engine_suite/mod.rs

use archimate_core::model_engine::validators::IntegrityChecker;
use archimate_core::{
    ElementSpec, EngineConfig, ModelData, ModelManipulator, RelationshipSpec, ViewSpec,
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Traces de test : une seule initialisation pour toute la suite.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

pub fn engine() -> ModelManipulator {
    init_tracing();
    ModelManipulator::new(EngineConfig::default())
}

/// A (ApplicationComponent "X") -> B (BusinessActor "Y") via R (Serving), vue V vide.
pub fn scenario_engine() -> ModelManipulator {
    let mut m = engine();
    m.create_element(ElementSpec::new("ApplicationComponent", "X").with_id("A"))
        .expect("A");
    m.create_element(ElementSpec::new("BusinessActor", "Y").with_id("B"))
        .expect("B");
    m.create_relationship(RelationshipSpec::new("Serving", "A", "B").with_id("R"))
        .expect("R");
    m.create_view(ViewSpec::new("Vue").with_id("V")).expect("V");
    m
}

/// Invariants 1 à 4 : intégrité complète, sans tolérance.
pub fn assert_invariants(model: &ModelData) {
    if let Err(e) = IntegrityChecker::check(model) {
        panic!("Invariant violé : {}", e);
    }
}
