//! HNSW approximate nearest neighbor accelerator for case search

use super::{cosine_similarity, CaseIndex};
use crate::error::Result;
use instant_distance::{Builder, HnswMap, Search};

/// Minimum case count to justify building an ANN index.
/// Below this threshold, brute-force is fast enough.
const ANN_THRESHOLD: usize = 1000;

/// Wrapper for f32 vectors implementing instant_distance::Point
#[derive(Clone)]
struct EmbeddingPoint {
    values: Vec<f32>,
}

impl instant_distance::Point for EmbeddingPoint {
    fn distance(&self, other: &Self) -> f32 {
        // Cosine distance = 1.0 - cosine_similarity
        1.0 - cosine_similarity(&self.values, &other.values)
    }
}

/// HNSW-backed approximate nearest neighbor index over case embeddings
pub struct AnnIndex {
    index: Option<HnswMap<EmbeddingPoint, String>>,
    embedding_count: usize,
}

impl AnnIndex {
    pub fn new() -> Self {
        Self {
            index: None,
            embedding_count: 0,
        }
    }

    /// Build from the stored embeddings of a case index.
    /// Skips building if fewer than ANN_THRESHOLD cases.
    pub fn build(index: &CaseIndex) -> Result<Self> {
        let embeddings = index.all_embeddings()?;
        let count = embeddings.len();

        if count < ANN_THRESHOLD {
            tracing::debug!(
                "Skipping ANN index build: {} cases < {} threshold",
                count,
                ANN_THRESHOLD
            );
            return Ok(Self {
                index: None,
                embedding_count: count,
            });
        }

        let (points, keys): (Vec<EmbeddingPoint>, Vec<String>) = embeddings
            .into_iter()
            .map(|(hash, values)| (EmbeddingPoint { values }, hash))
            .unzip();

        let hnsw_map = Builder::default().build(points, keys);

        tracing::info!("Built ANN index with {} cases", count);
        Ok(Self {
            index: Some(hnsw_map),
            embedding_count: count,
        })
    }

    /// Search for k nearest neighbors.
    /// Returns (case hash, cosine similarity) pairs, best first.
    /// Returns empty vec if index not built.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(String, f32)> {
        let map = match self.index.as_ref() {
            Some(m) => m,
            None => return vec![],
        };

        let query_point = EmbeddingPoint {
            values: query.to_vec(),
        };
        let mut search = Search::default();

        map.search(&query_point, &mut search)
            .take(k)
            .map(|item| {
                let similarity = 1.0 - item.distance;
                (item.value.clone(), similarity)
            })
            .collect()
    }

    /// Whether the HNSW index has been built
    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// Number of embeddings seen (even if index wasn't built)
    pub fn len(&self) -> usize {
        self.embedding_count
    }

    pub fn is_empty(&self) -> bool {
        self.embedding_count == 0
    }
}

impl Default for AnnIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_empty_index() {
        let ann = AnnIndex::new();
        let results = ann.search(&[1.0, 0.0], 5);
        assert!(results.is_empty());
        assert!(!ann.is_built());
        assert!(ann.is_empty());
    }
}
