// FICHIER : archimate-core/tests/model_engine_suite/exchange_tests.rs

use crate::common::{assert_invariants, scenario_engine};
use archimate_core::model_engine::SaveOutcome;
use archimate_core::{
    AppError, EngineConfig, ExchangeCodec, ModelManipulator, SaveOptions, ViewPatch,
};
use std::collections::HashSet;

fn rich_engine() -> ModelManipulator {
    let mut m = scenario_engine();
    m.create_property_definition("Coût", Some("propid-cost".into()))
        .unwrap();
    m.assign_property("A", "propid-cost", "1200").unwrap();
    m.assign_property("R", "propid-cost", "15").unwrap();
    m.add_relationship_to_view("V", "R").unwrap();
    m.update_view(
        "V",
        ViewPatch {
            viewpoint: Some("Application Usage".into()),
            node_hierarchy: Some(vec![archimate_core::NodeLink::new("A", "B")]),
            ..Default::default()
        },
    )
    .unwrap();
    m
}

#[test]
fn test_round_trip_reproduces_sets_and_properties() {
    let m = rich_engine();
    let codec = ExchangeCodec::new("fr");
    let original = m.get_model();
    let decoded = codec.decode(&codec.encode(original).unwrap()).unwrap();

    assert_eq!(decoded.elements, original.elements);
    assert_eq!(decoded.relationships, original.relationships);
    assert_eq!(decoded.property_definitions, original.property_definitions);

    let (dv, ov) = (&decoded.views["V"], &original.views["V"]);
    let set = |ids: &[String]| ids.iter().cloned().collect::<HashSet<_>>();
    assert_eq!(set(dv.elements()), set(ov.elements()));
    assert_eq!(dv.relationships(), ov.relationships());
    assert_eq!(dv.node_hierarchy(), ov.node_hierarchy());
    assert_eq!(dv.viewpoint, ov.viewpoint);
    assert_invariants(&decoded);
}

#[test]
fn test_save_open_cycle_with_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banque.xml");

    let mut m = rich_engine();
    let first: SaveOutcome = m.save(Some(&path)).unwrap();
    assert!(first.backup.is_none());

    m.delete_relationship("R").unwrap();
    let second = m.save(None).unwrap();
    let backup = second.backup.expect("une sauvegarde de l'ancien fichier");
    assert!(backup.exists());

    let reopened = ModelManipulator::open(&path, EngineConfig::default()).unwrap();
    assert!(reopened.get_relationship("R").is_none());
    let old = ModelManipulator::open(&backup, EngineConfig::default()).unwrap();
    assert!(old.get_relationship("R").is_some());
}

#[test]
fn test_save_without_backup_option() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.xml");
    let mut m = rich_engine();
    m.save(Some(&path)).unwrap();

    let opts = SaveOptions {
        create_backup: false,
        validate: true,
    };
    assert!(m.save_with(None, opts).unwrap().backup.is_none());
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_open_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = ModelManipulator::open(dir.path().join("absent.xml"), EngineConfig::default());
    assert!(matches!(missing, Err(AppError::Io(_))));

    let bad = dir.path().join("bad.xml");
    std::fs::write(&bad, "<model identifier=").unwrap();
    let malformed = ModelManipulator::open(&bad, EngineConfig::default());
    assert!(matches!(malformed, Err(AppError::Xml(_))));
}

#[test]
fn test_round_trip_keeps_every_parent_of_a_child() {
    let mut m = scenario_engine();
    m.create_element(archimate_core::ElementSpec::new("Node", "Serveur").with_id("N"))
        .unwrap();
    m.add_element_to_view("V", "B", Some("A")).unwrap();
    m.add_element_to_view("V", "B", Some("N")).unwrap();
    assert_invariants(m.get_model());

    let codec = ExchangeCodec::default();
    let xml = codec.encode(m.get_model()).unwrap();
    let decoded = codec.decode(&xml).unwrap();

    let links = |v: &archimate_core::View| {
        v.node_hierarchy()
            .iter()
            .map(|l| (l.parent_element.clone(), l.child_element.clone()))
            .collect::<HashSet<_>>()
    };
    let (dv, ov) = (&decoded.views["V"], &m.get_model().views["V"]);
    assert_eq!(ov.node_hierarchy().len(), 2);
    assert_eq!(links(dv), links(ov));
    assert_eq!(dv.elements().len(), 3);
    assert_invariants(&decoded);
}

#[test]
fn test_round_trip_keeps_explicit_view_type() {
    let mut m = scenario_engine();
    m.update_view(
        "V",
        ViewPatch {
            view_type: Some("Diagram".into()),
            ..Default::default()
        },
    )
    .unwrap();
    m.create_view(archimate_core::ViewSpec::new("Sans type").with_id("W"))
        .unwrap();

    let codec = ExchangeCodec::default();
    let decoded = codec.decode(&codec.encode(m.get_model()).unwrap()).unwrap();

    assert_eq!(decoded.views["V"].view_type.as_deref(), Some("Diagram"));
    assert_eq!(decoded.views["W"].view_type, None);
}
