//! Core traits and types for NRT (News Research Tool)
//!
//! This crate defines the fundamental traits and types used across the NRT system.
//! It provides capability-facing interfaces for the article fetcher, embedding
//! provider, and language-model provider, making the pipeline test-friendly and
//! keeping every external collaborator mockable.

pub mod document;
pub mod embedder;
pub mod error;
pub mod fetcher;
pub mod llm;
pub mod progress;

pub use document::{Chunk, Document, EmbeddedChunk, QueryResult};
pub use embedder::EmbeddingProvider;
pub use error::{Error, Result};
pub use fetcher::ArticleFetcher;
pub use llm::{GeneratedAnswer, LlmProvider, RetrievedChunk};
pub use progress::{IngestStage, NullProgress, ProgressSink};
