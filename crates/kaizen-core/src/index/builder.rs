//! Offline one-shot index construction from the historical-case corpus
//!
//! Reads a CSV of historical improvement cases, embeds each case's
//! combined text and persists text + vectors into a fresh index file.
//! No incremental update: rebuilding means re-running the whole pass.

use super::{embedding_to_bytes, hash_content, CREATE_TABLES};
use crate::error::{KaizenError, Result};
use crate::llm::LlmClient;
use crate::record::HistoricalCase;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// Batch size for embedding requests
const EMBED_BATCH_SIZE: usize = 32;

/// Outcome of an index build
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub cases: usize,
    pub dimensions: usize,
    pub embedding_model: String,
}

/// One-shot builder for the case index
pub struct IndexBuilder<'a> {
    client: &'a dyn LlmClient,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(client: &'a dyn LlmClient) -> Self {
        Self { client }
    }

    /// Load historical cases from a CSV file.
    ///
    /// The CSV must carry a header row with the corpus column names
    /// (`ramo_empresa`, `direcionadores`, ... `melhoria`).
    pub fn load_cases(&self, csv_path: impl AsRef<Path>) -> Result<Vec<HistoricalCase>> {
        let csv_path = csv_path.as_ref();
        let mut reader = csv::Reader::from_path(csv_path).map_err(|e| {
            KaizenError::InvalidInput(format!(
                "Failed to read corpus CSV {}: {}",
                csv_path.display(),
                e
            ))
        })?;

        let mut cases = Vec::new();
        for (row, result) in reader.deserialize::<HistoricalCase>().enumerate() {
            let case = result.map_err(|e| {
                KaizenError::Parse(format!("Corpus CSV row {}: {}", row + 1, e))
            })?;
            cases.push(case);
        }

        if cases.is_empty() {
            return Err(KaizenError::InvalidInput(
                "Corpus CSV contains no cases".to_string(),
            ));
        }

        Ok(cases)
    }

    /// Build and persist the index at `index_path`.
    ///
    /// Overwrites any existing file. The embedding model and dimensions
    /// are recorded as the index fingerprint for later consistency
    /// checks at query time.
    pub async fn build(
        &self,
        cases: &[HistoricalCase],
        index_path: impl AsRef<Path>,
    ) -> Result<BuildStats> {
        let index_path = index_path.as_ref();
        if index_path.exists() {
            std::fs::remove_file(index_path)?;
        }

        let texts: Vec<String> = cases.iter().map(|c| c.combined_text()).collect();

        tracing::info!(cases = texts.len(), "embedding corpus");

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(EMBED_BATCH_SIZE) {
            let chunk_embeddings = self.client.embed_batch(chunk).await?;
            embeddings.extend(chunk_embeddings);
        }

        if embeddings.len() != texts.len() {
            return Err(KaizenError::Llm(format!(
                "Embedding count mismatch: {} cases, {} embeddings",
                texts.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(|e| e.len()).unwrap_or(0);

        let conn = Connection::open(index_path)?;
        conn.execute_batch(CREATE_TABLES)?;

        let now = Utc::now().to_rfc3339();
        conn.execute("BEGIN IMMEDIATE", [])?;
        let result: Result<()> = (|| {
            for (text, embedding) in texts.iter().zip(embeddings.iter()) {
                let hash = hash_content(text);
                conn.execute(
                    "INSERT OR REPLACE INTO cases (hash, doc, created_at) VALUES (?1, ?2, ?3)",
                    params![hash, text, now],
                )?;
                conn.execute(
                    "INSERT OR REPLACE INTO case_vectors (hash, embedding, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![hash, embedding_to_bytes(embedding), now],
                )?;
            }

            for (key, value) in [
                ("embedding_model", self.client.embedding_model().to_string()),
                ("dimensions", dimensions.to_string()),
                ("built_at", now.clone()),
            ] {
                conn.execute(
                    "INSERT OR REPLACE INTO index_metadata (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )?;
            }
            Ok(())
        })();

        if result.is_ok() {
            conn.execute("COMMIT", [])?;
        } else {
            let _ = conn.execute("ROLLBACK", []);
        }
        result?;

        tracing::info!(
            path = %index_path.display(),
            cases = texts.len(),
            dimensions,
            "case index built"
        );

        Ok(BuildStats {
            cases: texts.len(),
            dimensions,
            embedding_model: self.client.embedding_model().to_string(),
        })
    }

    /// Convenience: load the corpus CSV and build in one pass
    pub async fn build_from_csv(
        &self,
        csv_path: impl AsRef<Path>,
        index_path: impl AsRef<Path>,
    ) -> Result<BuildStats> {
        let cases = self.load_cases(csv_path)?;
        self.build(&cases, index_path).await
    }
}
