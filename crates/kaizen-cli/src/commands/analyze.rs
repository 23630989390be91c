//! Analyze command: one process record through the retrieval pipeline

use crate::app::{AnalyzeArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use kaizen_core::{AnalysisSession, Config, KaizenError, ProcessAnalyzer, ProcessRecord};
use std::fs;

pub async fn run(args: AnalyzeArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let record = load_record(&args)?;

    // Caller-side validation gate: the analyzer itself never validates
    let missing = record.missing_mandatory_fields();
    if !missing.is_empty() {
        return Err(KaizenError::InvalidInput(format!(
            "Missing mandatory fields: {}",
            missing.join(", ")
        ))
        .into());
    }

    let mut config = config.clone();
    if let Some(ref index) = args.index {
        config.index_path = Some(index.clone());
    }

    // Fresh analyzer (and hence fresh conversation history) per request
    let mut analyzer = ProcessAnalyzer::from_config(&config)?;

    eprintln!("Identifying improvement opportunities...");
    let result = analyzer.analyze(&record).await?;

    println!("{}", output::format_rows(result.rows(), format)?);

    if let Some(ref csv_path) = args.csv {
        output::write_pipe_csv(csv_path, result.rows())?;
        eprintln!("Results written to {}", csv_path.display());
    }

    if let Some(ref session_path) = args.session {
        let session = AnalysisSession::new(result);
        fs::write(session_path, serde_json::to_string_pretty(&session)?)?;
        eprintln!(
            "Session written to {} (curate it with `kaizen refine`)",
            session_path.display()
        );
    }

    Ok(())
}

fn load_record(args: &AnalyzeArgs) -> Result<ProcessRecord> {
    let mut record: ProcessRecord = if let Some(ref path) = args.record {
        serde_json::from_str(&fs::read_to_string(path)?)?
    } else {
        ProcessRecord {
            ramo_empresa: args.ramo_empresa.clone().unwrap_or_default(),
            direcionadores: args.direcionadores.clone().unwrap_or_default(),
            nome_processo: args.nome_processo.clone().unwrap_or_default(),
            atividade: args.atividade.clone().unwrap_or_default(),
            evento: args.evento.clone().unwrap_or_default(),
            causa: args.causa.clone().unwrap_or_default(),
            operaciona_atividade: args.operaciona_atividade.clone(),
            sistema_relacionado: args.sistema_relacionado.clone(),
            solucao_gap: args.solucao_gap.clone(),
            outro_gap: args.outro_gap.clone(),
            transcricao: String::new(),
        }
    };

    if let Some(ref transcript) = args.transcript {
        record.transcricao = fs::read_to_string(transcript)?;
    }

    Ok(record)
}
