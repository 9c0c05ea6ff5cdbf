//! In-process snippet index. Default backend: a screening request only ever
//! queries the resume it just indexed, so a per-process store is enough
//! unless deployments need retrieval state shared across replicas.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::loader::TextChunk;

use super::embeddings::Embedder;
use super::{IndexError, SnippetIndex, SNIPPET_SEPARATOR};

struct StoredChunk {
    text: String,
    vector: Vec<f32>,
}

/// Cosine-similarity store over embedded chunks, keyed by document id.
pub struct MemoryIndex {
    embedder: Arc<dyn Embedder>,
    documents: RwLock<HashMap<String, Vec<StoredChunk>>>,
}

impl MemoryIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            documents: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SnippetIndex for MemoryIndex {
    async fn upsert(&self, document_id: &str, chunks: &[TextChunk]) -> Result<(), IndexError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;

        let stored: Vec<StoredChunk> = texts
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| StoredChunk { text, vector })
            .collect();

        // Replace, don't append: re-submitting a document id overwrites.
        self.documents
            .write()
            .await
            .insert(document_id.to_string(), stored);
        Ok(())
    }

    async fn retrieve(
        &self,
        document_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<String, IndexError> {
        let query_vector = self
            .embedder
            .embed(std::slice::from_ref(&query.to_string()))
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();

        let documents = self.documents.read().await;
        let Some(chunks) = documents.get(document_id) else {
            return Ok(String::new());
        };

        let mut scored: Vec<(f32, &str)> = chunks
            .iter()
            .map(|c| (cosine_similarity(&query_vector, &c.vector), c.text.as_str()))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .iter()
            .take(top_k)
            .map(|(_, text)| *text)
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
