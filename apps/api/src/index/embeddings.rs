//! Embedding client for a text-embeddings-inference style HTTP service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding API returned {got} vectors for {expected} inputs")]
    Shape { expected: usize, got: usize },
}

/// Turns text into vectors. The screening service never embeds locally; the
/// model runs behind an HTTP endpoint.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
}

/// Client for a `POST {base}/embed` endpoint taking `{"inputs": [...]}` and
/// returning one vector per input.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
}

impl HttpEmbedder {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let response = self
            .client
            .post(format!("{}/embed", self.base_url))
            .json(&EmbedRequest { inputs: texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let vectors: Vec<Vec<f32>> = response.json().await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Shape {
                expected: texts.len(),
                got: vectors.len(),
            });
        }

        debug!(
            "embedded {} texts (dimension {})",
            vectors.len(),
            vectors.first().map(Vec::len).unwrap_or(0)
        );
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_request_serializes_as_inputs_array() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let body = serde_json::to_string(&EmbedRequest { inputs: &texts }).unwrap();
        assert_eq!(body, r#"{"inputs":["a","b"]}"#);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let embedder = HttpEmbedder::new("http://localhost:8081/".to_string());
        assert_eq!(embedder.base_url, "http://localhost:8081");
    }
}
