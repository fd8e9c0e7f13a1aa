// FICHIER : archimate-core/tools/archimate-cli/src/commands/info.rs

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct InfoArgs {
    pub file: PathBuf,

    /// Sortie JSON brute
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(args: InfoArgs) -> Result<()> {
    let engine = super::open_model(&args.file, true)?;
    let stats = engine.model_stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let model = engine.get_model();
    println!("--- 📐 MODÈLE : {} ({}) ---", model.name, model.id);
    println!(
        "Éléments : {} | Relations : {} | Vues : {} | Définitions : {}",
        stats.elements, stats.relationships, stats.views, stats.property_definitions
    );
    for (layer, count) in stats.elements_per_layer.iter().filter(|(_, c)| **c > 0) {
        println!("  {:<24} {}", layer, count);
    }
    for (kind, count) in &stats.relationships_per_type {
        println!("  {:<24} {}", kind, count);
    }
    Ok(())
}
