//! Screening pipeline — sequences one request end to end:
//! index resume → load JD → classify experience → classify skill → route.

pub mod classifiers;
pub mod decision;
pub mod prompts;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::{Config, IndexBackend};
use crate::errors::AppError;
use crate::index::embeddings::{Embedder, HttpEmbedder};
use crate::index::memory::MemoryIndex;
use crate::index::qdrant::QdrantIndex;
use crate::index::SnippetIndex;
use crate::llm_client::{CompletionModel, LlmClient, MODEL};
use crate::loader;

/// Result of one screening request. Built only when every stage has
/// completed; a failed stage aborts the request instead of leaving fields
/// unset. Nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningState {
    pub experience_level: String,
    pub skill_match: String,
    pub response: String,
}

/// Orchestrates the five screening steps against injected collaborators.
pub struct ScreeningPipeline {
    llm: Arc<dyn CompletionModel>,
    index: Arc<dyn SnippetIndex>,
}

impl ScreeningPipeline {
    pub fn new(llm: Arc<dyn CompletionModel>, index: Arc<dyn SnippetIndex>) -> Self {
        Self { llm, index }
    }

    /// Builds the production pipeline: HTTP embedder, configured index
    /// backend, Claude client. Collaborators are constructed once here and
    /// shared across all requests.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(config.embedder_url.clone()));

        let index: Arc<dyn SnippetIndex> = match config.index_backend {
            IndexBackend::Memory => Arc::new(MemoryIndex::new(embedder)),
            IndexBackend::Qdrant => {
                let qdrant = QdrantIndex::new(
                    config.qdrant_url.clone(),
                    config.qdrant_collection.clone(),
                    embedder,
                    config.embedding_dimension,
                );
                qdrant.ensure_collection().await?;
                Arc::new(qdrant)
            }
        };
        info!("Snippet index initialized ({:?} backend)", config.index_backend);

        let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
        info!("LLM client initialized (model: {MODEL})");

        Ok(Self::new(llm, index))
    }

    /// Runs one screening request.
    ///
    /// `document_id` scopes retrieval to this resume; when absent, the resume
    /// file name is used (the uploaded file's original name, for HTTP
    /// callers). Steps run strictly in order; the first failure aborts the
    /// request and no partial state is returned.
    pub async fn run(
        &self,
        resume_path: &Path,
        jd_path: &Path,
        document_id: Option<&str>,
    ) -> Result<ScreeningState, AppError> {
        let document_id = match document_id {
            Some(id) => id.to_string(),
            None => resume_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| resume_path.display().to_string()),
        };

        // (a) load, chunk and index the resume under this request's id
        let chunks = loader::load_resume_chunks(resume_path)?;
        self.index.upsert(&document_id, &chunks).await?;
        info!(%document_id, chunks = chunks.len(), "resume indexed");

        // (b) job-description text
        let jd_text = loader::load_text(jd_path)?;

        // (c) experience level, from resume context only
        let experience =
            classifiers::classify_experience(self.llm.as_ref(), self.index.as_ref(), &document_id)
                .await?;

        // (d) skill match, from resume context plus the JD
        let skill = classifiers::classify_skill(
            self.llm.as_ref(),
            self.index.as_ref(),
            &document_id,
            &jd_text,
        )
        .await?;

        // (e) route, (f) attach the outcome message
        let experience_level = experience.into_text();
        let skill_match = skill.into_text();
        let outcome = decision::route(&experience_level, &skill_match);
        info!(?outcome, %experience_level, %skill_match, "screening routed");

        Ok(ScreeningState {
            experience_level,
            skill_match,
            response: outcome.message().to_string(),
        })
    }
}
