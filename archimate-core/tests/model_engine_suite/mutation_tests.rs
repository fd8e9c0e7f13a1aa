// FICHIER : archimate-core/tests/model_engine_suite/mutation_tests.rs

use crate::common::{assert_invariants, engine, scenario_engine};
use archimate_core::{
    AppError, DeleteOptions, ElementPatch, ElementSpec, ElementType, EntityKind, RelationshipSpec,
    ViewSpec,
};

#[test]
fn test_scenario_serving_back_references() {
    let m = scenario_engine();
    let a = m.get_element("A").unwrap();
    let b = m.get_element("B").unwrap();

    assert_eq!(a.outgoing_relations().iter().collect::<Vec<_>>(), ["R"]);
    assert_eq!(b.incoming_relations().iter().collect::<Vec<_>>(), ["R"]);
    assert_invariants(m.get_model());
}

#[test]
fn test_scenario_unknown_type_is_validation_error() {
    let mut m = engine();
    let err = m.create_element(ElementSpec::new("Bogus", "X")).unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert!(m.get_model().elements.is_empty());
    assert!(!m.is_modified());
}

#[test]
fn test_scenario_self_loop_is_validation_error() {
    let mut m = scenario_engine();
    let err = m
        .create_relationship(RelationshipSpec::new("Serving", "A", "A"))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
    assert_eq!(m.get_model().relationships.len(), 1);
}

#[test]
fn test_scenario_strict_delete_lists_relationship() {
    let mut m = scenario_engine();
    let err = m.delete_element("A", DeleteOptions::strict()).unwrap_err();
    match err {
        AppError::ReferentialIntegrity {
            kind, dependents, ..
        } => {
            assert_eq!(kind, EntityKind::Element);
            assert!(dependents.contains(&"R".to_string()));
        }
        other => panic!("Erreur inattendue : {other}"),
    }
    assert!(m.get_element("A").is_some());
}

#[test]
fn test_scenario_add_relationship_to_view_brings_endpoints() {
    let mut m = scenario_engine();
    let view = m.add_relationship_to_view("V", "R").unwrap();

    assert!(view.contains_element("A"));
    assert!(view.contains_element("B"));
    assert!(m.get_element("A").unwrap().in_views().contains("V"));
    assert!(m.get_element("B").unwrap().in_views().contains("V"));
    assert_invariants(m.get_model());
}

#[test]
fn test_cascade_delete_leaves_no_reference() {
    let mut m = scenario_engine();
    m.create_element(ElementSpec::new("Node", "Serveur").with_id("N"))
        .unwrap();
    m.create_relationship(RelationshipSpec::new("Realization", "N", "A").with_id("R2"))
        .unwrap();
    m.add_relationship_to_view("V", "R").unwrap();
    m.add_element_to_view("V", "N", Some("A")).unwrap();

    m.delete_element("A", DeleteOptions::default()).unwrap();

    let model = m.get_model();
    assert!(model.relationships.values().all(|r| !r.touches("A")));
    for view in model.views.values() {
        assert!(!view.contains_element("A"));
        assert!(view.relationships().iter().all(|r| r != "R" && r != "R2"));
        assert!(view.node_hierarchy().iter().all(|l| !l.names("A")));
    }
    assert!(m.get_element("N").unwrap().outgoing_relations().is_empty());
    assert_invariants(model);
}

#[test]
fn test_ids_unique_across_kinds() {
    let mut m = scenario_engine();
    for taken in ["A", "R", "V"] {
        assert!(matches!(
            m.create_element(ElementSpec::new("Node", "N").with_id(taken)),
            Err(AppError::Duplicate { .. })
        ));
        assert!(matches!(
            m.create_view(ViewSpec::new("W").with_id(taken)),
            Err(AppError::Duplicate { .. })
        ));
    }
}

#[test]
fn test_update_element_type_does_not_revalidate_relationships() {
    let mut m = scenario_engine();
    let patch = ElementPatch {
        element_type: Some("Goal".into()),
        ..Default::default()
    };
    let el = m.update_element("A", patch).unwrap();
    assert_eq!(el.element_type, ElementType::Goal);
    assert!(m.get_relationship("R").is_some());
    // Le rapport signale désormais l'incompatibilité
    assert!(!m.validate_relationship("R").valid);
}

#[test]
fn test_generated_ids_follow_prefix_convention() {
    let mut m = engine();
    let el = m.create_element(ElementSpec::new("Node", "N")).unwrap();
    let el2 = m.create_element(ElementSpec::new("Device", "D")).unwrap();
    let rel = m
        .create_relationship(RelationshipSpec::new("Association", &el.id, &el2.id))
        .unwrap();
    let view = m.create_view(ViewSpec::new("Infra")).unwrap();

    assert!(el.id.starts_with("id-element-"));
    assert!(rel.id.starts_with("id-relationship-"));
    assert!(view.id.starts_with("id-view-"));
    assert_ne!(el.id, el2.id);
}
