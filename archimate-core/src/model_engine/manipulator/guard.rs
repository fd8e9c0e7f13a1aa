// FICHIER : archimate-core/src/model_engine/manipulator/guard.rs

use super::ModelManipulator;
use crate::model_engine::transactions::{Transaction, TransactionRecord, TransactionStatus};
use crate::utils::{AppError, Result};
use tracing::{info, warn};

impl ModelManipulator {
    /// Ouvre une transaction (pas d'imbrication).
    pub fn begin_transaction(&mut self) -> Result<Transaction> {
        if let Some(open) = self.journal.open_id() {
            return Err(AppError::Transaction(format!(
                "Une transaction est déjà ouverte : {}",
                open
            )));
        }
        let tx = Transaction::begin(&self.model, self.modified);
        self.journal.start(tx.id());
        info!("🔒 Transaction ouverte : {}", tx.id());
        Ok(tx)
    }

    /// Conserve les changements déjà appliqués. Le modèle est marqué modifié,
    /// même sans opération journalisée.
    pub fn commit_transaction(&mut self, tx: Transaction) -> Result<TransactionRecord> {
        self.ensure_current(&tx)?;
        let record = self.journal.finish(&tx, TransactionStatus::Committed);
        self.modified = true;
        info!(
            "✅ Transaction {} validée ({} opération(s))",
            record.id,
            record.operations.len()
        );
        Ok(record)
    }

    /// Restaure le modèle tel qu'il était à l'ouverture.
    pub fn rollback_transaction(&mut self, tx: Transaction) -> Result<TransactionRecord> {
        self.ensure_current(&tx)?;
        let record = self.journal.finish(&tx, TransactionStatus::Aborted);
        let Transaction {
            snapshot,
            was_modified,
            ..
        } = tx;
        self.model = snapshot;
        self.modified = was_modified;
        warn!(
            "↩️ Transaction {} annulée ({} opération(s) défaite(s))",
            record.id,
            record.operations.len()
        );
        Ok(record)
    }

    pub fn in_transaction(&self) -> bool {
        self.journal.is_open()
    }

    fn ensure_current(&self, tx: &Transaction) -> Result<()> {
        match self.journal.open_id() {
            Some(open) if open == tx.id() => Ok(()),
            Some(open) => Err(AppError::Transaction(format!(
                "Poignée {} ne correspond pas à la transaction ouverte {}",
                tx.id(),
                open
            ))),
            None => Err(AppError::Transaction(format!(
                "Aucune transaction ouverte (poignée {})",
                tx.id()
            ))),
        }
    }
}
