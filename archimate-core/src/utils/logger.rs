// FICHIER : archimate-core/src/utils/logger.rs

use crate::utils::config::EngineConfig;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Sécurité pour éviter la double initialisation (crash fréquent en tests)
static INIT: Once = Once::new();

pub fn init_logging(config: &EngineConfig) {
    INIT.call_once(|| {
        // =========================================================================
        // LAYER 1 : CONSOLE (Pour l'Humain)
        // =========================================================================
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

        let console_layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter);

        // =========================================================================
        // LAYER 2 : FICHIER JSON (Optionnel, rotation quotidienne)
        // =========================================================================
        let file_layer = config.log_dir.as_ref().and_then(|dir| {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("⚠️ [Logger] Dossier de logs inaccessible {:?} : {}", dir, e);
                return None;
            }
            let file_appender = rolling::daily(dir, "archimate.log");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
        });

        // =========================================================================
        // ASSEMBLAGE ET INITIALISATION
        // =========================================================================
        let registry = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if let Err(_e) = registry.try_init() {
            tracing::warn!(
                "⚠️ [Logger] Tentative de ré-initialisation ignorée (Global subscriber déjà actif)."
            );
            return;
        }

        match &config.log_dir {
            Some(dir) => tracing::info!("🚀 Logger initialisé. Logs disponibles dans : {:?}", dir),
            None => tracing::info!("🚀 Logger initialisé (console uniquement)."),
        }
    });
}
