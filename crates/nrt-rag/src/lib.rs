//! Ingestion, persistence, and question answering for NRT
//!
//! This crate implements the index-backed question answering workflow:
//! fetch article pages, split them into overlapping chunks, embed each
//! chunk, persist the resulting vector index atomically to a single file,
//! and answer questions by retrieving the nearest chunks and handing them
//! to a language model along with the question.

mod fetcher;
mod index;
mod ingest;
mod query;
mod splitter;
mod store;

pub use fetcher::HttpArticleFetcher;
pub use index::VectorIndex;
pub use ingest::{IngestPipeline, MAX_URLS};
pub use query::{DEFAULT_TOP_K, QueryEngine};
pub use splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter};
pub use store::{DEFAULT_INDEX_PATH, FORMAT_VERSION, IndexStore};

// Re-export core types for convenience
pub use nrt_core::{
    ArticleFetcher, Chunk, Document, EmbeddedChunk, EmbeddingProvider, Error, GeneratedAnswer,
    IngestStage, LlmProvider, NullProgress, ProgressSink, QueryResult, Result, RetrievedChunk,
};
