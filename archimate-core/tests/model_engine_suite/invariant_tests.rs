// FICHIER : archimate-core/tests/model_engine_suite/invariant_tests.rs

use crate::common::{assert_invariants, engine};
use archimate_core::{
    DeleteOptions, ElementPatch, ElementSpec, RelationshipPatch, RelationshipSpec, ViewPatch,
    ViewSpec,
};

/// Séquence mixte : les invariants sont contrôlés après chaque étape.
#[test]
fn test_invariants_hold_after_every_mutation() {
    let mut m = engine();
    let types = ["BusinessActor", "BusinessRole", "ApplicationComponent", "Node", "Goal"];

    let mut ids = Vec::new();
    for (i, t) in types.iter().enumerate() {
        let el = m
            .create_element(ElementSpec::new(*t, format!("E{}", i)))
            .unwrap();
        ids.push(el.id);
        assert_invariants(m.get_model());
    }

    let mut rels = Vec::new();
    for w in ids.windows(2) {
        let rel = m
            .create_relationship(RelationshipSpec::new("Association", &w[0], &w[1]))
            .unwrap();
        rels.push(rel.id);
        assert_invariants(m.get_model());
    }

    let view = m
        .create_view(ViewSpec::new("Tout").with_relationships(rels.clone()))
        .unwrap();
    assert_eq!(view.elements().len(), ids.len());
    assert_invariants(m.get_model());

    m.add_element_to_view(&view.id, &ids[1], Some(ids[0].as_str())).unwrap();
    assert_invariants(m.get_model());

    m.update_relationship(
        &rels[0],
        RelationshipPatch {
            target_id: Some(ids[4].clone()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_invariants(m.get_model());

    m.update_element(
        &ids[2],
        ElementPatch {
            name: Some("Renommé".into()),
            ..Default::default()
        },
    )
    .unwrap();

    m.remove_element_from_view(&view.id, &ids[0]).unwrap();
    assert_invariants(m.get_model());

    m.update_view(
        &view.id,
        ViewPatch {
            elements: Some(ids[2..].to_vec()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_invariants(m.get_model());

    m.delete_element(&ids[3], DeleteOptions::default()).unwrap();
    assert_invariants(m.get_model());

    m.delete_element(&ids[4], DeleteOptions::force()).unwrap();
    assert_invariants(m.get_model());

    m.delete_view(&view.id).unwrap();
    assert_invariants(m.get_model());

    assert!(m.validate_model().valid);
}
