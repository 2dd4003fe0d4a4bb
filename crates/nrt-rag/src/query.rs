//! Query operation: retrieve nearest chunks and assemble an answer

use std::sync::Arc;

use nrt_core::{
    EmbeddingProvider, Error, GeneratedAnswer, LlmProvider, QueryResult, Result, RetrievedChunk,
};

use crate::store::IndexStore;

/// Retrieval breadth: how many nearest chunks are handed to the language
/// model per question.
pub const DEFAULT_TOP_K: usize = 4;

/// Answers questions against a persisted index.
pub struct QueryEngine<E: EmbeddingProvider, L: LlmProvider> {
    embedder: Arc<E>,
    llm: Arc<L>,
    top_k: usize,
}

impl<E: EmbeddingProvider, L: LlmProvider> QueryEngine<E, L> {
    pub fn new(embedder: Arc<E>, llm: Arc<L>) -> Self {
        Self {
            embedder,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer `question` using the index persisted in `store`.
    ///
    /// Loads the index (a missing file is `IndexNotFound` and retrieval is
    /// never attempted), embeds the question, retrieves the nearest
    /// chunks, and asks the language model for an answer. The returned
    /// sources are deduplicated in first-seen order; model-cited URLs are
    /// kept only when they belong to the retrieved set, otherwise the full
    /// retrieved set is used.
    pub async fn answer(&self, store: &IndexStore, question: &str) -> Result<QueryResult> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::Retrieval("question must not be empty".to_string()));
        }

        let index = match store.load() {
            Ok(index) => index,
            Err(Error::IndexNotFound(path)) => return Err(Error::IndexNotFound(path)),
            Err(Error::Persistence(message)) => return Err(Error::Retrieval(message)),
            Err(e) => return Err(Error::Retrieval(e.to_string())),
        };

        let query_vector = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| Error::Retrieval(format!("question embedding failed: {}", e)))?;

        let retrieved = index.search(&query_vector, self.top_k);
        if retrieved.is_empty() {
            return Err(Error::Retrieval("the index contains no chunks".to_string()));
        }

        let generated = self.llm.generate(question, &retrieved).await?;
        let sources = resolve_sources(&generated, &retrieved);

        Ok(QueryResult {
            answer: generated.answer,
            sources,
        })
    }
}

/// Pick the source list for a result: model-cited URLs restricted to the
/// retrieved set when the model reported any, otherwise every retrieved
/// chunk's URL. Duplicates collapse to the first occurrence.
fn resolve_sources(generated: &GeneratedAnswer, retrieved: &[RetrievedChunk]) -> Vec<String> {
    let retrieved_urls: Vec<&str> = retrieved.iter().map(|c| c.source_url.as_str()).collect();

    let candidates: Vec<String> = match &generated.sources {
        Some(cited) => {
            let filtered: Vec<String> = cited
                .iter()
                .filter(|url| retrieved_urls.contains(&url.as_str()))
                .cloned()
                .collect();

            if filtered.is_empty() {
                retrieved_urls.iter().map(|s| s.to_string()).collect()
            } else {
                filtered
            }
        }
        None => retrieved_urls.iter().map(|s| s.to_string()).collect(),
    };

    let mut sources = Vec::new();
    for url in candidates {
        if !sources.contains(&url) {
            sources.push(url);
        }
    }
    sources
}
