// FICHIER : archimate-core/tools/archimate-cli/src/commands/validate.rs

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Fichier au format d'échange ArchiMate
    pub file: PathBuf,

    /// Ignore la validation structurelle du XML
    #[arg(long)]
    pub no_schema: bool,

    /// N'échoue pas sur un rapport invalide (affichage seul)
    #[arg(long)]
    pub report_only: bool,
}

pub async fn handle(args: ValidateArgs) -> Result<()> {
    let engine = super::open_model(&args.file, args.no_schema)?;
    let report = engine.validate_model();

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.valid && !args.report_only {
        bail!(
            "Modèle invalide : {} erreur(s), {} avertissement(s)",
            report.error_count,
            report.warning_count
        );
    }
    tracing::info!("✅ {} validé", args.file.display());
    Ok(())
}
