// FICHIER : archimate-core/tests/model_engine_suite/transaction_tests.rs

use crate::common::{assert_invariants, scenario_engine};
use archimate_core::model_engine::TransactionStatus;
use archimate_core::{AppError, DeleteOptions, ElementSpec, RelationshipSpec};

#[test]
fn test_scenario_rollback_removes_created_element() {
    let mut m = scenario_engine();
    let tx = m.begin_transaction().unwrap();
    m.create_element(ElementSpec::new("Node", "C").with_id("C"))
        .unwrap();
    assert!(m.get_element("C").is_some());

    let record = m.rollback_transaction(tx).unwrap();
    assert_eq!(record.status, TransactionStatus::Aborted);
    assert!(m.get_element("C").is_none());
    assert_invariants(m.get_model());
}

#[test]
fn test_rollback_after_cascade_restores_everything() {
    let mut m = scenario_engine();
    m.add_relationship_to_view("V", "R").unwrap();
    let before = m.get_model().clone();

    let tx = m.begin_transaction().unwrap();
    m.delete_element("A", DeleteOptions::default()).unwrap();
    m.create_relationship(RelationshipSpec::new("Association", "B", "B2"))
        .unwrap_err();
    m.rollback_transaction(tx).unwrap();

    assert_eq!(m.get_model(), &before);
}

#[test]
fn test_commit_returns_journal() {
    let mut m = scenario_engine();
    let tx = m.begin_transaction().unwrap();
    m.create_element(ElementSpec::new("Node", "C")).unwrap();
    m.add_relationship_to_view("V", "R").unwrap();
    let record = m.commit_transaction(tx).unwrap();

    assert_eq!(record.status, TransactionStatus::Committed);
    assert_eq!(record.operations.len(), 2);
    assert!(m.is_modified());
}

#[test]
fn test_nested_begin_is_rejected() {
    let mut m = scenario_engine();
    let tx = m.begin_transaction().unwrap();
    assert!(matches!(
        m.begin_transaction(),
        Err(AppError::Transaction(_))
    ));
    m.commit_transaction(tx).unwrap();
    assert!(m.begin_transaction().is_ok());
}
