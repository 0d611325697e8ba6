//! Embedding service client.
//!
//! The service is treated as an opaque `embed(text) -> vector` dependency;
//! any failure here is recoverable and downgrades retrieval to lexical.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Settings;

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Port over the embedding provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Whether the provider has credentials and can be called at all.
    fn is_configured(&self) -> bool;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, String>;
}

/// OpenAI embeddings implementation.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.openai_api_key.clone(),
            model: settings.openai_embedding_model.clone(),
        }
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[tracing::instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| "OPENAI_API_KEY is not configured".to_string())?;

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|e| format!("Embedding request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Embedding API error ({}): {}", status, body));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| format!("Embedding response was not valid JSON: {}", e))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| "Embedding response contained no vectors".to_string())
    }
}
