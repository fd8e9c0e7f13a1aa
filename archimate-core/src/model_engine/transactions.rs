// FICHIER : archimate-core/src/model_engine/transactions.rs

//! Transactions du moteur : snapshot complet au `begin`, restauration au `rollback`.
//!
//! Les mutations restent immédiates. Le journal sert au diagnostic et n'est
//! jamais rejoué.

use crate::model_engine::types::ModelData;
use crate::utils::EntityKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mutation effectuée pendant une transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    Create { kind: EntityKind, id: String },
    Update { kind: EntityKind, id: String },
    Delete { kind: EntityKind, id: String },
    #[serde(rename_all = "camelCase")]
    AddToView { view_id: String, member_id: String },
    #[serde(rename_all = "camelCase")]
    RemoveFromView { view_id: String, member_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationRecord {
    pub operation: Operation,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Committed,
    Aborted,
}

/// Bilan d'une transaction terminée.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub status: TransactionStatus,
    pub operations: Vec<OperationRecord>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Poignée d'une transaction ouverte. Consommée par `commit` ou `rollback`.
#[derive(Debug)]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) snapshot: ModelData,
    pub(crate) was_modified: bool,
    pub(crate) started_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn begin(model: &ModelData, was_modified: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            snapshot: model.clone(),
            was_modified,
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Journal en ajout seul : opérations de la transaction courante et historique.
#[derive(Debug, Default)]
pub struct TransactionJournal {
    open: Option<(String, Vec<OperationRecord>)>,
    history: Vec<TransactionRecord>,
}

impl TransactionJournal {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_id(&self) -> Option<&str> {
        self.open.as_ref().map(|(id, _)| id.as_str())
    }

    pub(crate) fn start(&mut self, id: &str) {
        self.open = Some((id.to_string(), Vec::new()));
    }

    /// Sans transaction ouverte, l'opération n'est pas journalisée.
    pub(crate) fn record(&mut self, operation: Operation) {
        if let Some((_, ops)) = self.open.as_mut() {
            ops.push(OperationRecord {
                operation,
                at: Utc::now(),
            });
        }
    }

    pub(crate) fn finish(
        &mut self,
        tx: &Transaction,
        status: TransactionStatus,
    ) -> TransactionRecord {
        let operations = self.open.take().map(|(_, ops)| ops).unwrap_or_default();
        let record = TransactionRecord {
            id: tx.id.clone(),
            status,
            operations,
            started_at: tx.started_at,
            ended_at: Utc::now(),
        };
        self.history.push(record.clone());
        record
    }

    pub fn pending(&self) -> &[OperationRecord] {
        self.open.as_ref().map(|(_, ops)| ops.as_slice()).unwrap_or(&[])
    }

    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }
}
