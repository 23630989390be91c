//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kaizen")]
#[command(
    author,
    version,
    about = "Analyze business processes against a historical improvement-case index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the case index from a historical-case CSV (offline one-shot)
    Index(IndexArgs),

    /// Show case index status
    Status(StatusArgs),

    /// Analyze one process record
    Analyze(Box<AnalyzeArgs>),

    /// Curate an analysis session into the final deliverable
    Refine(RefineArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Cli,
    /// JSON array
    Json,
    /// Pipe-separated CSV
    Csv,
}

#[derive(Args)]
pub struct IndexArgs {
    /// Corpus CSV with the historical-case columns
    pub csv: PathBuf,

    /// Index file to write
    #[arg(long)]
    pub index: Option<PathBuf>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Index file to inspect
    #[arg(long)]
    pub index: Option<PathBuf>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Read the whole record from a JSON file instead of flags
    #[arg(long, conflicts_with_all = [
        "ramo_empresa", "direcionadores", "nome_processo",
        "atividade", "evento", "causa"
    ])]
    pub record: Option<PathBuf>,

    /// Industry / market segment (mandatory)
    #[arg(long)]
    pub ramo_empresa: Option<String>,

    /// Business drivers (mandatory)
    #[arg(long)]
    pub direcionadores: Option<String>,

    /// Process name (mandatory)
    #[arg(long)]
    pub nome_processo: Option<String>,

    /// Activity (mandatory)
    #[arg(long)]
    pub atividade: Option<String>,

    /// Triggering event (mandatory)
    #[arg(long)]
    pub evento: Option<String>,

    /// Root cause (mandatory)
    #[arg(long)]
    pub causa: Option<String>,

    /// Who operates the activity today
    #[arg(long, default_value = "")]
    pub operaciona_atividade: String,

    /// Related system, if any
    #[arg(long, default_value = "")]
    pub sistema_relacionado: String,

    /// Previously attempted solution, if any
    #[arg(long, default_value = "")]
    pub solucao_gap: String,

    /// Other related gap, if any
    #[arg(long, default_value = "")]
    pub outro_gap: String,

    /// Interview transcript file to attach
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Index file to query
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Write a curation session file for `kaizen refine`
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Write all result rows as pipe-separated CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Args)]
pub struct RefineArgs {
    /// Session file produced by `kaizen analyze --session`
    #[arg(long)]
    pub session: PathBuf,

    /// Just list the numbered opportunities and exit
    #[arg(long)]
    pub list: bool,

    /// Opportunities to select, by 1-based number
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Manually append a new opportunity description (repeatable)
    #[arg(long)]
    pub add: Vec<String>,

    /// Write the final deliverable as pipe-separated CSV
    #[arg(long)]
    pub out: Option<PathBuf>,
}
