//! OpenAI integration for NRT
//!
//! This crate provides the OpenAI implementations of the EmbeddingProvider
//! and LlmProvider traits.

mod client;
mod config;


pub use client::OpenAiClient;
pub use config::OpenAiConfig;

// Re-export core types for convenience
pub use nrt_core::{EmbeddingProvider, Error, GeneratedAnswer, LlmProvider, Result, RetrievedChunk};
