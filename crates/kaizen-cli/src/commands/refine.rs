//! Refine command: curate an analysis session into the deliverable

use crate::app::{OutputFormat, RefineArgs};
use crate::output;
use anyhow::{bail, Result};
use kaizen_core::AnalysisSession;
use std::fs;

pub async fn run(args: RefineArgs, format: OutputFormat) -> Result<()> {
    let mut session: AnalysisSession = serde_json::from_str(&fs::read_to_string(&args.session)?)?;

    for description in &args.add {
        session.add_opportunity(description.clone());
    }

    let descriptions: Vec<String> = session
        .opportunities()
        .iter()
        .map(|o| o.oportunidade_melhoria.clone())
        .collect();

    if args.list {
        for (i, description) in descriptions.iter().enumerate() {
            println!("{}. {}", i + 1, description);
        }
        return Ok(());
    }

    for number in &args.select {
        match descriptions.get(number.wrapping_sub(1)) {
            Some(description) => session.select(description),
            None => bail!(
                "No opportunity number {} (session has {})",
                number,
                descriptions.len()
            ),
        }
    }

    let rows = session.selected_rows();
    if rows.is_empty() {
        eprintln!("No opportunities selected.");
    } else {
        println!("{}", output::format_rows(&rows, format)?);
    }

    if let Some(ref out) = args.out {
        output::write_pipe_csv(out, &rows)?;
        eprintln!("Deliverable written to {}", out.display());
    }

    // Persist curation state for further refinement rounds
    fs::write(&args.session, serde_json::to_string_pretty(&session)?)?;

    Ok(())
}
