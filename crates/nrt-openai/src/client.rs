//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use nrt_core::{
    EmbeddingProvider, Error, GeneratedAnswer, LlmProvider, Result, RetrievedChunk,
};

use crate::config::OpenAiConfig;

const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI client serving both embeddings and answer generation.
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

const SYSTEM_PROMPT: &str = "You answer questions about news articles using only the provided \
context chunks. Each chunk is tagged with its source URL. After your answer, list the URLs of \
the chunks you actually used on a final line starting with SOURCES:, separated by spaces. \
If the context does not contain the answer, say so.";

impl OpenAiClient {
    /// Create a new OpenAI client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new OpenAI client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    async fn perform_embedding(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request_body = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let url = format!("{}/embeddings", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "OpenAI embeddings request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if parsed.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        // The API does not promise response order, only an index per entry.
        let mut vectors = vec![Vec::new(); texts.len()];
        for entry in parsed.data {
            if entry.index >= vectors.len() || entry.embedding.is_empty() {
                return Err(Error::Embedding(
                    "malformed embedding entry in response".to_string(),
                ));
            }
            vectors[entry.index] = entry.embedding;
        }

        Ok(vectors)
    }

    async fn perform_generation(&self, prompt: &str) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.config.completion_model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.config.api_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Generation(format!(
                "OpenAI chat request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::Generation(
                "empty response from OpenAI chat API".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Render the user prompt: the question followed by numbered context
/// chunks, each tagged with its source URL.
pub(crate) fn build_user_prompt(question: &str, context: &[RetrievedChunk]) -> String {
    let mut prompt = String::new();
    prompt.push_str("Question: ");
    prompt.push_str(question);
    prompt.push_str("\n\nContext:\n");

    for (i, chunk) in context.iter().enumerate() {
        prompt.push_str(&format!(
            "\n[{}] Source: {}\n{}\n",
            i + 1,
            chunk.source_url,
            chunk.text
        ));
    }

    prompt
}

/// Split a raw completion into answer text and the optional `SOURCES:`
/// citation list, normalizing into the GeneratedAnswer contract once.
pub(crate) fn parse_completion(raw: &str) -> GeneratedAnswer {
    let trimmed = raw.trim();

    if let Some(pos) = trimmed.rfind("SOURCES:") {
        let answer = trimmed[..pos].trim().to_string();
        let sources: Vec<String> = trimmed[pos + "SOURCES:".len()..]
            .split_whitespace()
            .map(|s| s.trim_matches(|c| c == ',' || c == ';').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let sources = if sources.is_empty() {
            None
        } else {
            Some(sources)
        };

        return GeneratedAnswer { answer, sources };
    }

    GeneratedAnswer {
        answer: trimmed.to_string(),
        sources: None,
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.perform_embedding(texts).await
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, question: &str, context: &[RetrievedChunk]) -> Result<GeneratedAnswer> {
        let prompt = build_user_prompt(question, context);
        let generation_future = self.perform_generation(&prompt);

        let raw = match timeout(GENERATION_TIMEOUT, generation_future).await {
            Ok(result) => result?,
            Err(_) => return Err(Error::Timeout("answer generation timed out".to_string())),
        };

        Ok(parse_completion(&raw))
    }
}
