// FICHIER : archimate-core/src/utils/mod.rs

// =========================================================================
//  ARCHIMATE UTILS - Foundation Layer
// =========================================================================

pub mod config;
pub mod env;
pub mod error;
pub mod fs;
pub mod logger;

/// **Application Context** : Accès global Config/Log/Env.
pub mod context {
    pub use super::config::EngineConfig;
    pub use super::env::{get, get_or, is_enabled};
    pub use super::logger::init_logging;
}

pub use config::EngineConfig;
pub use error::{AppError, AnyResult, Context, EntityKind, Result};
pub use logger::init_logging;
