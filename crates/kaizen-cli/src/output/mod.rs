//! Output formatters for analysis rows

use crate::app::OutputFormat;
use anyhow::Result;
use kaizen_core::{ImprovementOpportunity, RESULT_COLUMNS};
use std::path::Path;

/// Render rows in the requested format
pub fn format_rows(rows: &[ImprovementOpportunity], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Cli => Ok(format_table(rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => pipe_csv(rows),
    }
}

/// Human-readable numbered table
fn format_table(rows: &[ImprovementOpportunity]) -> String {
    if rows.is_empty() {
        return "No improvement opportunities.".to_string();
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, row.oportunidade_melhoria));
        if !row.tarefa.is_empty() {
            out.push_str(&format!("   Tarefa:   {}\n", row.tarefa));
        }
        if !row.criterio_aceitacao.is_empty() {
            out.push_str(&format!("   Critério: {}\n", row.criterio_aceitacao));
        }
    }
    out
}

/// Pipe-separated CSV with a header row (the deliverable format)
pub fn pipe_csv(rows: &[ImprovementOpportunity]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .from_writer(Vec::new());

    writer.write_record(RESULT_COLUMNS)?;
    for row in rows {
        writer.write_record([
            &row.oportunidade_melhoria,
            &row.tarefa,
            &row.criterio_aceitacao,
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Write rows as pipe-separated CSV to a file
pub fn write_pipe_csv(path: impl AsRef<Path>, rows: &[ImprovementOpportunity]) -> Result<()> {
    let csv = pipe_csv(rows)?;
    std::fs::write(path, csv)?;
    Ok(())
}
