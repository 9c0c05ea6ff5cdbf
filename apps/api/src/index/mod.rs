//! Snippet index — stores resume chunks per document id and answers
//! similarity queries scoped to a single document.
//!
//! Retrieval isolation is the load-bearing invariant here: a query tagged
//! with document id A must never surface a chunk indexed under id B.

pub mod embeddings;
pub mod memory;
pub mod qdrant;

use async_trait::async_trait;
use thiserror::Error;

use crate::loader::TextChunk;

use self::embeddings::EmbeddingError;

/// Default number of snippets fetched per classifier query.
pub const TOP_K: usize = 10;
/// Separator placed between retrieved snippets before prompting.
pub const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Vector-search boundary of the screening pipeline.
///
/// Implementations are shared across concurrent requests; document-id tagging
/// is what keeps requests isolated from each other.
#[async_trait]
pub trait SnippetIndex: Send + Sync {
    /// Indexes `chunks` under `document_id`. Upserting the same document id
    /// again is overwrite-safe.
    async fn upsert(&self, document_id: &str, chunks: &[TextChunk]) -> Result<(), IndexError>;

    /// Returns the `top_k` most relevant snippets for `query`, restricted to
    /// chunks indexed under `document_id`, joined with `SNIPPET_SEPARATOR`.
    /// An unknown document id yields an empty string, not an error.
    async fn retrieve(
        &self,
        document_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<String, IndexError>;
}
