//! Language-model provider trait and answer contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One retrieved chunk handed to the language model as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source_url: String,
    pub score: f32,
}

/// The single normalized response contract for any language-model provider.
///
/// `sources` is the subset of context URLs the model reported using, or
/// `None` when the provider does not report citations; the query engine
/// then falls back to the full retrieved set. Adapters normalize whatever
/// shape their provider returns into this struct exactly once, so the
/// ambiguity never reaches the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub answer: String,
    pub sources: Option<Vec<String>>,
}

/// Capability for producing an answer from a question plus retrieved
/// context chunks.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer to `question` grounded in `context`.
    async fn generate(&self, question: &str, context: &[RetrievedChunk]) -> Result<GeneratedAnswer>;
}
