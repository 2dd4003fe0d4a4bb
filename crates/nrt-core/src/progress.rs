//! Ingestion progress reporting

/// Discrete named stages of an ingestion run, reported in order.
///
/// A UI concern, not a correctness contract: sinks may ignore stages
/// entirely and the pipeline's behavior does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    /// Fetching article pages.
    Loading,
    /// Splitting text into chunks.
    Splitting,
    /// Computing embeddings for each chunk.
    Embedding,
    /// Assembling the vector index.
    Indexing,
}

impl IngestStage {
    pub fn label(&self) -> &'static str {
        match self {
            IngestStage::Loading => "loading",
            IngestStage::Splitting => "splitting",
            IngestStage::Embedding => "embedding",
            IngestStage::Indexing => "indexing",
        }
    }
}

/// Receiver for stage notifications during ingestion.
pub trait ProgressSink: Send + Sync {
    fn stage(&self, stage: IngestStage);
}

/// Sink that discards all progress notifications.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn stage(&self, _stage: IngestStage) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_are_stable() {
        assert_eq!(IngestStage::Loading.label(), "loading");
        assert_eq!(IngestStage::Splitting.label(), "splitting");
        assert_eq!(IngestStage::Embedding.label(), "embedding");
        assert_eq!(IngestStage::Indexing.label(), "indexing");
    }
}
