//! Ingestion pipeline: fetch, split, embed, index

use std::sync::Arc;
use url::Url;

use nrt_core::{
    ArticleFetcher, Chunk, Document, EmbeddedChunk, EmbeddingProvider, Error, IngestStage,
    ProgressSink, Result,
};

use crate::index::VectorIndex;
use crate::splitter::TextSplitter;

/// Maximum number of article URLs per ingestion run.
pub const MAX_URLS: usize = 3;

/// Builds a vector index from a small set of article URLs.
///
/// Failure policy is fail-fast: any fetch, split, or embedding failure
/// aborts the whole run and no partial index is exposed. A previously
/// persisted index is never touched by a failed run because persistence is
/// a separate operation on the finished index.
pub struct IngestPipeline<F: ArticleFetcher, E: EmbeddingProvider> {
    fetcher: F,
    embedder: Arc<E>,
    splitter: TextSplitter,
}

impl<F: ArticleFetcher, E: EmbeddingProvider> IngestPipeline<F, E> {
    pub fn new(fetcher: F, embedder: Arc<E>) -> Self {
        Self {
            fetcher,
            embedder,
            splitter: TextSplitter::default(),
        }
    }

    pub fn with_splitter(fetcher: F, embedder: Arc<E>, splitter: TextSplitter) -> Self {
        Self {
            fetcher,
            embedder,
            splitter,
        }
    }

    /// Fetch every URL, split the documents into chunks, embed them, and
    /// assemble an in-memory index. Progress stages are reported to `sink`
    /// as the run advances.
    pub async fn build_index(
        &self,
        urls: &[String],
        sink: &dyn ProgressSink,
    ) -> Result<VectorIndex> {
        validate_urls(urls)?;

        sink.stage(IngestStage::Loading);
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            documents.push(self.fetcher.fetch(url).await?);
        }

        sink.stage(IngestStage::Splitting);
        let chunks = self.split_documents(&documents)?;

        sink.stage(IngestStage::Embedding);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "embedding provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        sink.stage(IngestStage::Indexing);
        let embedded = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect();

        VectorIndex::new(embedded)
    }

    fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for document in documents {
            let texts = self.splitter.split_text(&document.text);
            if texts.is_empty() {
                return Err(Error::Fetch {
                    url: document.url.clone(),
                    message: "the page contained no indexable text".to_string(),
                });
            }

            for text in texts {
                chunks.push(Chunk {
                    id: chunk_id(&document.url, &text),
                    text,
                    source_url: document.url.clone(),
                });
            }
        }

        Ok(chunks)
    }
}

fn validate_urls(urls: &[String]) -> Result<()> {
    if urls.is_empty() {
        return Err(Error::Configuration(
            "at least one article URL is required".to_string(),
        ));
    }

    if urls.len() > MAX_URLS {
        return Err(Error::Configuration(format!(
            "at most {} article URLs are supported, got {}",
            MAX_URLS,
            urls.len()
        )));
    }

    for url in urls {
        Url::parse(url).map_err(|e| Error::Fetch {
            url: url.clone(),
            message: format!("invalid URL: {}", e),
        })?;
    }

    Ok(())
}

/// Stable content-derived chunk id: url hash plus text hash.
fn chunk_id(url: &str, text: &str) -> String {
    format!("{:x}-{:x}", md5::compute(url.as_bytes()), md5::compute(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_url_list() {
        assert!(matches!(
            validate_urls(&[]),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn rejects_more_than_three_urls() {
        let urls: Vec<String> = (0..4).map(|i| format!("https://a.example/{}", i)).collect();
        assert!(matches!(validate_urls(&urls), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_unparseable_urls() {
        let urls = vec!["definitely not a url".to_string()];
        assert!(matches!(validate_urls(&urls), Err(Error::Fetch { .. })));
    }

    #[test]
    fn chunk_ids_are_stable_and_distinct() {
        let a = chunk_id("https://a.example/1", "some text");
        let b = chunk_id("https://a.example/1", "some text");
        let c = chunk_id("https://a.example/1", "other text");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
