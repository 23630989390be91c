//! Index command: build the case index from a corpus CSV

use crate::app::IndexArgs;
use anyhow::Result;
use kaizen_core::{Config, IndexBuilder, OpenAiClient};

pub async fn run(args: IndexArgs, config: &Config) -> Result<()> {
    let index_path = args
        .index
        .unwrap_or_else(|| config.resolved_index_path());

    let client = OpenAiClient::new(config.llm_service.clone())?;
    let builder = IndexBuilder::new(&client);

    println!("Building case index from {}...", args.csv.display());
    let stats = builder.build_from_csv(&args.csv, &index_path).await?;

    println!("Index built: {}", index_path.display());
    println!("  Cases:      {}", stats.cases);
    println!("  Model:      {}", stats.embedding_model);
    println!("  Dimensions: {}", stats.dimensions);

    Ok(())
}
