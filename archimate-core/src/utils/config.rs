// FICHIER : archimate-core/src/utils/config.rs

use crate::utils::{env, AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Singleton global pour la configuration
static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Variables d'environnement reconnues
pub const ENV_CONFIG_PATH: &str = "ARCHIMATE_CONFIG";
pub const ENV_LANG: &str = "ARCHIMATE_LANG";
pub const ENV_LOG_LEVEL: &str = "ARCHIMATE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ARCHIMATE_LOG_DIR";
pub const ENV_MODEL_NAME: &str = "ARCHIMATE_MODEL_NAME";
pub const ENV_NO_BACKUP: &str = "ARCHIMATE_NO_BACKUP";
pub const ENV_NO_VALIDATE: &str = "ARCHIMATE_NO_VALIDATE";

pub const DEFAULT_SCHEMA_NAME: &str = "archimate3_Diagram.xsd";

/// Configuration du moteur ArchiMate.
///
/// Tous les champs ont une valeur par défaut : un fichier partiel est accepté.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Langue écrite dans les attributs `xml:lang`
    pub language: String,
    /// Nom utilisé pour un modèle créé de zéro
    pub model_name: String,
    /// Nom du schéma transmis au validateur délégué
    pub schema_name: String,
    pub create_backup: bool,
    pub validate_on_save: bool,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            model_name: "ArchiMate Model".to_string(),
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            create_backup: true,
            validate_on_save: true,
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

// --- IMPLÉMENTATION PRINCIPALE ---

impl EngineConfig {
    /// Initialise le singleton depuis les sources standard (fichier puis environnement).
    pub fn init() -> Result<()> {
        if CONFIG.get().is_some() {
            return Ok(());
        }
        let config = Self::load()?;
        if CONFIG.set(config).is_err() {
            return Err(AppError::Config(
                "La configuration est déjà initialisée".to_string(),
            ));
        }
        Ok(())
    }

    /// Accès au singleton. Sans `init()` préalable, on retombe sur les défauts + environnement.
    pub fn get() -> &'static EngineConfig {
        CONFIG.get_or_init(|| {
            let mut config = EngineConfig::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Charge la configuration : fichier JSON (s'il existe), puis surcharges d'environnement.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if env::get_optional(ENV_CONFIG_PATH).is_some() => {
                // Un chemin explicite qui n'existe pas est une erreur de l'opérateur
                return Err(AppError::Config(format!(
                    "Fichier de configuration introuvable : {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Lecture impossible de {} : {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("Configuration chargée depuis {:?}", path);
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Configuration JSON invalide : {}", e)))
    }

    /// Applique les variables `ARCHIMATE_*` par-dessus les valeurs courantes.
    pub fn apply_env_overrides(&mut self) {
        if let Some(lang) = env::get_optional(ENV_LANG) {
            self.language = lang;
        }
        if let Some(level) = env::get_optional(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = env::get_optional(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(name) = env::get_optional(ENV_MODEL_NAME) {
            self.model_name = name;
        }
        if env::is_enabled(ENV_NO_BACKUP) {
            self.create_backup = false;
        }
        if env::is_enabled(ENV_NO_VALIDATE) {
            self.validate_on_save = false;
        }
    }

    /// Chemin du fichier de configuration : `ARCHIMATE_CONFIG` ou `~/.archimate/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        env::get_optional(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .or_else(Self::default_config_path)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".archimate").join("config.json"))
    }
}
