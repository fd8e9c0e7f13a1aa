// FICHIER : archimate-core/tools/archimate-cli/src/commands/normalize.rs

use anyhow::Result;
use archimate_core::SaveOptions;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct NormalizeArgs {
    pub file: PathBuf,

    /// Fichier de sortie (par défaut : réécriture sur place)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Pas de sauvegarde horodatée de l'original
    #[arg(long)]
    pub no_backup: bool,
}

pub async fn handle(args: NormalizeArgs) -> Result<()> {
    let mut engine = super::open_model(&args.file, false)?;
    let mut options = SaveOptions::from_config(engine.config());
    if args.no_backup {
        options.create_backup = false;
    }

    let outcome = engine.save_with(args.out.as_deref(), options)?;
    println!("💾 {} ({} octets)", outcome.path.display(), outcome.bytes);
    if let Some(backup) = outcome.backup {
        println!("   Sauvegarde : {}", backup.display());
    }
    Ok(())
}
