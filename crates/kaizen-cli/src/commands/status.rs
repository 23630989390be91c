//! Status command: inspect the case index

use crate::app::StatusArgs;
use anyhow::Result;
use kaizen_core::{CaseIndex, Config};

pub async fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let index_path = args
        .index
        .unwrap_or_else(|| config.resolved_index_path());

    let index = CaseIndex::open(&index_path)?;

    println!("Index: {}", index_path.display());
    println!("  Cases:      {}", index.len()?);
    println!(
        "  Model:      {}",
        index.embedding_model()?.unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "  Dimensions: {}",
        index
            .dimensions()?
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "  Built at:   {}",
        index.built_at()?.unwrap_or_else(|| "unknown".to_string())
    );

    Ok(())
}
