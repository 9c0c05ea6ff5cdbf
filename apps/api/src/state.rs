use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::screening::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum
/// extractors. Holds no per-request mutable state; isolation between
/// concurrent screenings comes from per-request document ids.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScreeningPipeline>,
    /// Client for fetching job-description URLs.
    pub http: HttpClient,
}
