//! Kaizen Core Library
//!
//! Retrieval-augmented analysis of business processes against a
//! pre-built index of historical process-improvement cases.
//!
//! # Features
//! - Deterministic combined-text serialization of process records
//! - SQLite case index with cosine similarity search (HNSW above a
//!   corpus-size threshold)
//! - OpenAI-compatible embedding and chat client
//! - Strictly parsed, tabular improvement opportunities
//! - Curation session for selecting and extending results

pub mod analyzer;
pub mod config;
pub mod error;
pub mod index;
pub mod llm;
pub mod record;
pub mod session;

pub use analyzer::{Exchange, ProcessAnalyzer, RETRIEVAL_K};
pub use config::{Config, LlmServiceConfig};
pub use error::{Error, KaizenError, Result};
pub use index::{BuildStats, CaseIndex, IndexBuilder};
pub use llm::{ChatMessage, LlmClient, OpenAiClient};
pub use record::{
    AnalysisResult, HistoricalCase, ImprovementOpportunity, ProcessRecord, RetrievedCase,
    MANDATORY_FIELDS, RESULT_COLUMNS,
};
pub use session::AnalysisSession;

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "kaizen";

/// Conventional index file name in the working directory
pub const DEFAULT_INDEX_FILE: &str = "process_index.db";
