// FICHIER : archimate-core/src/model_engine/persistence.rs

use crate::model_engine::exchange::ExchangeCodec;
use crate::model_engine::types::ModelData;
use crate::model_engine::validators::{IntegrityChecker, SchemaValidator};
use crate::utils::{fs, AppError, EngineConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Options de sauvegarde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveOptions {
    pub create_backup: bool,
    pub validate: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            create_backup: true,
            validate: true,
        }
    }
}

impl SaveOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            create_backup: config.create_backup,
            validate: config.validate_on_save,
        }
    }
}

/// Résultat d'une sauvegarde réussie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub backup: Option<PathBuf>,
    pub bytes: usize,
}

/// Charge un fichier d'échange. Erreurs : `Io` (absent, illisible), `Xml` (mal formé).
#[instrument(skip(codec))]
pub fn load(path: &Path, codec: &ExchangeCodec) -> Result<ModelData> {
    let xml = std::fs::read_to_string(path)?;
    let model = codec.decode(&xml)?;
    info!(
        "📂 Modèle chargé depuis {:?} ({} éléments)",
        path,
        model.elements.len()
    );
    Ok(model)
}

/// Sauvegarde : validation éventuelle (sans écriture en cas d'échec),
/// sauvegarde horodatée de l'existant, puis écriture atomique.
#[instrument(skip(model, codec, schema))]
pub fn save(
    model: &ModelData,
    path: &Path,
    options: SaveOptions,
    codec: &ExchangeCodec,
    schema: &dyn SchemaValidator,
    schema_name: &str,
) -> Result<SaveOutcome> {
    if options.validate {
        IntegrityChecker::check(model)?;
    }

    let xml = codec.encode(model)?;

    if options.validate {
        let outcome = schema.validate(&xml, schema_name);
        if !outcome.valid {
            return Err(AppError::Schema(outcome.errors));
        }
    }

    let backup = if options.create_backup {
        fs::backup_existing(path)?
    } else {
        None
    };

    fs::write_atomic(path, xml.as_bytes())?;
    info!("💾 Modèle sauvegardé dans {:?}", path);

    Ok(SaveOutcome {
        path: path.to_path_buf(),
        backup,
        bytes: xml.len(),
    })
}
