// FICHIER : archimate-core/src/model_engine/state.rs

//! État partagé pour les hôtes asynchrones : un seul propriétaire logique,
//! les mutations s'exécutent sous le verrou sans point d'attente.

use crate::model_engine::manipulator::ModelManipulator;
use crate::model_engine::persistence::SaveOutcome;
use crate::model_engine::types::ModelData;
use crate::model_engine::validators::ValidationReport;
use crate::utils::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct SharedModel {
    inner: Arc<Mutex<ModelManipulator>>,
}

impl SharedModel {
    pub fn new(manipulator: ModelManipulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manipulator)),
        }
    }

    /// Accès direct au moteur (garder la section critique synchrone).
    pub async fn lock(&self) -> MutexGuard<'_, ModelManipulator> {
        self.inner.lock().await
    }

    /// Exécute une opération synchrone sous le verrou.
    pub async fn with<R>(&self, f: impl FnOnce(&mut ModelManipulator) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }

    pub async fn snapshot(&self) -> ModelData {
        self.inner.lock().await.get_model().clone()
    }

    pub async fn is_modified(&self) -> bool {
        self.inner.lock().await.is_modified()
    }

    pub async fn validate(&self) -> ValidationReport {
        self.inner.lock().await.validate_model()
    }

    pub async fn save(&self, path: Option<PathBuf>) -> Result<SaveOutcome> {
        self.inner.lock().await.save(path.as_deref())
    }
}
