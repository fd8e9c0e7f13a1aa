// FICHIER : archimate-core/tools/archimate-cli/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};

// On garde le module local des commandes
mod commands;

use archimate_core::utils::context;

#[derive(Parser)]
#[command(name = "archimate-cli")]
#[command(about = "CLI de contrôle des modèles ArchiMate (format d'échange Open Group)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Valide un fichier et affiche le rapport JSON
    Validate(commands::validate::ValidateArgs),

    /// Statistiques du modèle (par couche, par type de relation)
    Info(commands::info::InfoArgs),

    /// Ré-encode un fichier (sauvegarde horodatée de l'original)
    Normalize(commands::normalize::NormalizeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialisation de la Configuration (CRITIQUE)
    if let Err(e) = context::EngineConfig::init() {
        eprintln!("❌ CRITICAL ERROR: Impossible d'initialiser la configuration.");
        eprintln!("   Détails : {}", e);
        std::process::exit(1);
    }

    // 2. Initialisation du Logger
    context::init_logging(context::EngineConfig::get());

    // 3. Parsing & Dispatch
    let cli = Cli::parse();
    if let Err(e) = execute_command(cli.command).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }

    tracing::debug!("Fin de l'exécution du CLI");
    Ok(())
}

async fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Validate(args) => commands::validate::handle(args).await,
        Commands::Info(args) => commands::info::handle(args).await,
        Commands::Normalize(args) => commands::normalize::handle(args).await,
    }
}
