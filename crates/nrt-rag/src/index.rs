//! In-memory vector index with exact nearest-neighbor search

use serde::{Deserialize, Serialize};

use nrt_core::{EmbeddedChunk, Error, Result, RetrievedChunk};

/// A collection of embedded chunks supporting nearest-neighbor lookup by
/// cosine similarity. Built once per ingestion run; a rebuild fully
/// replaces the previous index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    chunks: Vec<EmbeddedChunk>,
}

impl VectorIndex {
    /// Build an index over embedded chunks. All embeddings must be
    /// non-empty and share one dimension.
    pub fn new(chunks: Vec<EmbeddedChunk>) -> Result<Self> {
        let dimension = chunks
            .first()
            .map(|c| c.embedding.len())
            .ok_or_else(|| Error::Embedding("cannot build an index over zero chunks".to_string()))?;

        if dimension == 0 {
            return Err(Error::Embedding(
                "embedding provider returned an empty vector".to_string(),
            ));
        }

        for chunk in &chunks {
            if chunk.embedding.len() != dimension {
                return Err(Error::Embedding(format!(
                    "inconsistent embedding dimensions: expected {}, got {} for chunk from {}",
                    dimension,
                    chunk.embedding.len(),
                    chunk.chunk.source_url
                )));
            }
        }

        Ok(Self { dimension, chunks })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[EmbeddedChunk] {
        &self.chunks
    }

    /// Return the `k` chunks nearest to `query` by cosine similarity,
    /// highest score first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<RetrievedChunk> {
        let mut scored: Vec<RetrievedChunk> = self
            .chunks
            .iter()
            .map(|embedded| RetrievedChunk {
                text: embedded.chunk.text.clone(),
                source_url: embedded.chunk.source_url.clone(),
                score: cosine_similarity(query, &embedded.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
