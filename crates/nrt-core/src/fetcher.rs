//! Article fetcher trait

use async_trait::async_trait;

use crate::{Document, Result};

/// Capability for turning a URL into raw article text.
///
/// Failure modes (network errors, non-HTML content, empty extraction) are
/// the fetcher's concern; the pipeline only needs a pass/fail result per
/// URL and fails the whole ingestion on the first failure.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetch one URL and return its extracted text with provenance.
    async fn fetch(&self, url: &str) -> Result<Document>;
}
