//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Capability for computing fixed-dimension embedding vectors.
///
/// Assumed deterministic for a given input and model version. All vectors
/// returned by one provider instance must share the same dimension; the
/// pipeline treats a dimension mismatch as an embedding failure.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
