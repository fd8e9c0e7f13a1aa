// FICHIER : archimate-core/tools/archimate-cli/src/commands/mod.rs

// Déclaration des modules disponibles dans le CLI
// Chaque module ici correspondra à un fichier .rs dans le même dossier

pub mod info;
pub mod normalize;
pub mod validate;

use anyhow::{Context, Result};
use archimate_core::model_engine::validators::NoopSchemaValidator;
use archimate_core::{EngineConfig, ModelManipulator};
use std::path::Path;

/// Ouvre un modèle avec la configuration active.
/// `skip_schema` remplace le validateur structurel par un validateur neutre.
pub fn open_model(path: &Path, skip_schema: bool) -> Result<ModelManipulator> {
    let engine = ModelManipulator::open(path, EngineConfig::get().clone())
        .with_context(|| format!("Ouverture impossible de {}", path.display()))?;
    Ok(if skip_schema {
        engine.with_schema_validator(NoopSchemaValidator)
    } else {
        engine
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use archimate_core::{
        ElementSpec, EngineConfig, ModelManipulator, RelationshipSpec, SaveOptions, ViewSpec,
    };
    use std::path::Path;

    /// Écrit un petit modèle valide dans `path`.
    pub fn write_model(path: &Path) {
        let mut m = ModelManipulator::new(EngineConfig::default());
        m.create_element(ElementSpec::new("ApplicationComponent", "CRM").with_id("A"))
            .unwrap();
        m.create_element(ElementSpec::new("BusinessActor", "Client").with_id("B"))
            .unwrap();
        m.create_relationship(RelationshipSpec::new("Serving", "A", "B").with_id("R"))
            .unwrap();
        m.create_view(ViewSpec::new("Vue").with_relationships(["R"]))
            .unwrap();
        m.save_with(
            Some(path),
            SaveOptions {
                create_backup: false,
                validate: true,
            },
        )
        .unwrap();
    }
}
