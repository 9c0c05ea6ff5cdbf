use anyhow::{bail, Context, Result};

/// Which snippet-index backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBackend {
    /// In-process cosine-similarity store. Default; no external vector DB.
    Memory,
    /// Qdrant collection over REST.
    Qdrant,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub embedder_url: String,
    pub index_backend: IndexBackend,
    pub qdrant_url: String,
    pub qdrant_collection: String,
    pub embedding_dimension: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let index_backend = match std::env::var("INDEX_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => IndexBackend::Memory,
            "qdrant" => IndexBackend::Qdrant,
            other => bail!("INDEX_BACKEND must be 'memory' or 'qdrant', got '{other}'"),
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedder_url: require_env("EMBEDDER_URL")?,
            index_backend,
            qdrant_url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:6333".to_string()),
            qdrant_collection: std::env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "resume-index".to_string()),
            embedding_dimension: std::env::var("EMBEDDING_DIMENSION")
                .unwrap_or_else(|_| "768".to_string())
                .parse::<usize>()
                .context("EMBEDDING_DIMENSION must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
