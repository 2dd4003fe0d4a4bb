//! Document, chunk, and query result types

use serde::{Deserialize, Serialize};

/// Raw article text fetched from one URL.
///
/// Created during ingestion, consumed by the splitter, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub text: String,
}

impl Document {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// A bounded contiguous slice of a document's text, tagged with the
/// originating URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub source_url: String,
}

/// A chunk plus its fixed-dimension embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Generated answer plus the ordered set of distinct source URLs the
/// retrieved chunks came from. Exists only for one render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<String>,
}
