//! Ingestion progress rendering

use colored::*;

use nrt_core::{IngestStage, ProgressSink};

/// Progress sink that renders each ingestion stage as a status line.
pub struct CliProgress;

impl ProgressSink for CliProgress {
    fn stage(&self, stage: IngestStage) {
        let line = match stage {
            IngestStage::Loading => format!("{} Loading articles...", "🔄".cyan()),
            IngestStage::Splitting => format!("{} Splitting text into chunks...", "✂️".cyan()),
            IngestStage::Embedding => format!("{} Embedding chunks...", "🧮".cyan()),
            IngestStage::Indexing => format!("{} Building index...", "📦".cyan()),
        };
        println!("{}", line);
    }
}
