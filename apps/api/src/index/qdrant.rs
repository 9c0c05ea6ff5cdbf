//! Qdrant-backed snippet index over REST, for deployments where retrieval
//! state must outlive the process or be shared across replicas.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use async_trait::async_trait;

use crate::loader::TextChunk;

use super::embeddings::Embedder;
use super::{IndexError, SnippetIndex, SNIPPET_SEPARATOR};

/// Points are embedded and upserted in batches of this many chunks.
const UPSERT_BATCH: usize = 32;

pub struct QdrantIndex {
    client: Client,
    base_url: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct Point {
    id: Uuid,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Debug, Serialize, Deserialize)]
struct PointPayload {
    source: String,
    text: String,
    ordinal: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    payload: PointPayload,
}

impl QdrantIndex {
    pub fn new(
        base_url: String,
        collection: String,
        embedder: Arc<dyn Embedder>,
        dimension: usize,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            collection,
            embedder,
            dimension,
        }
    }

    /// Creates the collection if it does not exist yet. Safe to call on every
    /// startup.
    pub async fn ensure_collection(&self) -> Result<(), IndexError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);

        let existing = self.client.get(&url).send().await?;
        if existing.status().is_success() {
            debug!("Qdrant collection '{}' already exists", self.collection);
            return Ok(());
        }

        let response = self
            .client
            .put(&url)
            .json(&json!({
                "vectors": { "size": self.dimension, "distance": "Cosine" }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!(
            "Created Qdrant collection '{}' (dimension {})",
            self.collection, self.dimension
        );
        Ok(())
    }

    async fn upsert_batch(&self, points: Vec<Point>) -> Result<(), IndexError> {
        let response = self
            .client
            .put(format!(
                "{}/collections/{}/points?wait=true",
                self.base_url, self.collection
            ))
            .json(&json!({ "points": points }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Deterministic point id for a chunk: the same document id and ordinal
/// always map to the same point, so re-indexing overwrites in place.
fn point_id(document_id: &str, ordinal: usize) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("{document_id}-chunk-{ordinal}").as_bytes(),
    )
}

#[async_trait]
impl SnippetIndex for QdrantIndex {
    async fn upsert(&self, document_id: &str, chunks: &[TextChunk]) -> Result<(), IndexError> {
        for batch in chunks.chunks(UPSERT_BATCH) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed(&texts).await?;

            let points: Vec<Point> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| Point {
                    id: point_id(document_id, chunk.ordinal),
                    vector,
                    payload: PointPayload {
                        source: document_id.to_string(),
                        text: chunk.text.clone(),
                        ordinal: chunk.ordinal,
                    },
                })
                .collect();

            self.upsert_batch(points).await?;
        }
        debug!(
            "upserted {} chunks under document id '{document_id}'",
            chunks.len()
        );
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

        let response = self
            .client
            .post(format!(
                "{}/collections/{}/points/search",
                self.base_url, self.collection
            ))
            .json(&json!({
                "vector": query_vector,
                "limit": top_k,
                "with_payload": true,
                // Scope strictly to this request's document.
                "filter": {
                    "must": [{ "key": "source", "match": { "value": document_id } }]
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let search: SearchResponse = response.json().await?;
        Ok(search
            .result
            .iter()
            .map(|hit| hit.payload.text.as_str())
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_is_deterministic() {
        assert_eq!(point_id("cv.pdf", 0), point_id("cv.pdf", 0));
        assert_eq!(point_id("cv.pdf", 7), point_id("cv.pdf", 7));
    }

    #[test]
    fn test_point_id_distinguishes_documents_and_ordinals() {
        assert_ne!(point_id("cv.pdf", 0), point_id("cv.pdf", 1));
        assert_ne!(point_id("alice.pdf", 0), point_id("bob.pdf", 0));
    }

    #[test]
    fn test_point_serializes_with_payload() {
        let point = Point {
            id: point_id("cv.pdf", 0),
            vector: vec![0.1, 0.2],
            payload: PointPayload {
                source: "cv.pdf".to_string(),
                text: "chunk text".to_string(),
                ordinal: 0,
            },
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["payload"]["source"], "cv.pdf");
        assert_eq!(value["payload"]["ordinal"], 0);
        assert_eq!(value["vector"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_search_response_parses_hits() {
        let body = r#"{
            "result": [
                { "id": "x", "score": 0.9, "payload": { "source": "cv.pdf", "text": "hit", "ordinal": 3 } }
            ],
            "status": "ok"
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.len(), 1);
        assert_eq!(parsed.result[0].payload.text, "hit");
    }
}
