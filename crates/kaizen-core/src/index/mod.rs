//! Similarity index over the historical improvement-case corpus
//!
//! Single-file SQLite store: case text plus one embedding per case as
//! a little-endian f32 BLOB. Built offline once by [`IndexBuilder`],
//! consumed read-only at analysis time.

mod ann;
mod builder;

pub use ann::AnnIndex;
pub use builder::{BuildStats, IndexBuilder};

use crate::error::{KaizenError, Result};
use crate::record::RetrievedCase;
use rusqlite::{params, Connection, OpenFlags};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Metadata keys stored alongside the index
const META_EMBEDDING_MODEL: &str = "embedding_model";
const META_DIMENSIONS: &str = "dimensions";
const META_BUILT_AT: &str = "built_at";

const CREATE_TABLES: &str = r#"
-- Case storage (content-addressable by SHA-256 of the combined text)
CREATE TABLE IF NOT EXISTS cases (
    hash TEXT PRIMARY KEY,
    doc TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- One embedding per case
CREATE TABLE IF NOT EXISTS case_vectors (
    hash TEXT PRIMARY KEY REFERENCES cases(hash),
    embedding BLOB NOT NULL,
    created_at TEXT NOT NULL
);

-- Build-time fingerprint (embedding model, dimensions)
CREATE TABLE IF NOT EXISTS index_metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Hash case content using SHA-256
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read-only handle to a pre-built case index
pub struct CaseIndex {
    conn: Connection,
    ann: AnnIndex,
}

impl std::fmt::Debug for CaseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseIndex").finish_non_exhaustive()
    }
}

impl CaseIndex {
    /// Open an existing index read-only.
    ///
    /// A missing file fails fast with [`KaizenError::IndexNotFound`],
    /// before any network call is made. Opening is idempotent and
    /// side-effect-free on the stored file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KaizenError::IndexNotFound(path.display().to_string()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let mut index = Self {
            conn,
            ann: AnnIndex::new(),
        };
        index.ann = AnnIndex::build(&index)?;

        tracing::debug!(
            path = %path.display(),
            cases = index.len()?,
            "case index opened"
        );

        Ok(index)
    }

    /// Number of stored cases
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cases", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Embedding model recorded at build time, if any
    pub fn embedding_model(&self) -> Result<Option<String>> {
        self.get_metadata(META_EMBEDDING_MODEL)
    }

    /// Embedding dimensions recorded at build time, if any
    pub fn dimensions(&self) -> Result<Option<usize>> {
        Ok(self
            .get_metadata(META_DIMENSIONS)?
            .and_then(|s| s.parse().ok()))
    }

    /// Build timestamp recorded at build time, if any
    pub fn built_at(&self) -> Result<Option<String>> {
        self.get_metadata(META_BUILT_AT)
    }

    fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM index_metadata WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Top-k most similar cases for a query embedding.
    ///
    /// Uses the HNSW accelerator when built, brute-force cosine
    /// otherwise. Ranks start at 1.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedCase>> {
        let scored = if self.ann.is_built() {
            self.ann.search(query, k)
        } else {
            let mut similarities: Vec<(String, f32)> = self
                .all_embeddings()?
                .into_iter()
                .map(|(hash, embedding)| (hash, cosine_similarity(query, &embedding)))
                .collect();

            similarities
                .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            similarities.truncate(k);
            similarities
        };

        let mut results = Vec::with_capacity(scored.len());
        for (rank, (hash, score)) in scored.into_iter().enumerate() {
            if let Some(content) = self.get_case(&hash)? {
                results.push(RetrievedCase {
                    content,
                    rank: rank + 1,
                    score,
                });
            }
        }

        Ok(results)
    }

    /// Get stored case text by hash
    pub fn get_case(&self, hash: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT doc FROM cases WHERE hash = ?1",
            params![hash],
            |row| row.get(0),
        );
        match result {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All stored embeddings as (hash, vector) pairs
    pub fn all_embeddings(&self) -> Result<Vec<(String, Vec<f32>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT hash, embedding FROM case_vectors")?;

        let results = stmt
            .query_map([], |row| {
                let hash: String = row.get(0)?;
                let bytes: Vec<u8> = row.get(1)?;
                Ok((hash, bytes_to_embedding(&bytes)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
