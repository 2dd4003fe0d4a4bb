//! OpenAI configuration

use nrt_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the OpenAI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_url: String,
    pub completion_model: String,
    pub embedding_model: String,
    /// Sampling temperature for answer generation.
    pub temperature: f32,
    /// Maximum tokens in a generated answer.
    pub max_tokens: u32,
}

impl OpenAiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Configuration("OPENAI_API_KEY environment variable not found".to_string())
        })?;

        let api_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let completion_model =
            env::var("NRT_COMPLETION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let embedding_model = env::var("NRT_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-ada-002".to_string());

        Ok(Self {
            api_key,
            api_url,
            completion_model,
            embedding_model,
            temperature: 0.9,
            max_tokens: 500,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: "https://api.openai.com/v1".to_string(),
            completion_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            temperature: 0.9,
            max_tokens: 500,
        }
    }
}
