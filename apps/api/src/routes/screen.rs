//! POST /api/screen — multipart entry point for one screening request.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use reqwest::Client as HttpClient;
use tempfile::NamedTempFile;
use tracing::info;

use crate::errors::AppError;
use crate::loader::html;
use crate::screening::ScreeningState;
use crate::state::AppState;

/// Accepts a resume PDF plus either a job-description file (pdf/md/txt) or a
/// `jd_url` field, runs the pipeline, and returns the screening state.
///
/// Uploads and fetched pages live in named temp files that are removed on
/// drop, on every exit path.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningState>, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut jd_file: Option<(String, Bytes)> = None;
    let mut jd_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart request: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("resume") => {
                if field.content_type() != Some("application/pdf") {
                    return Err(AppError::Validation("Resume must be a PDF".to_string()));
                }
                let filename = field
                    .file_name()
                    .unwrap_or("resume.pdf")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                resume = Some((filename, data));
            }
            Some("jd") => {
                let filename = field.file_name().unwrap_or("jd").to_string();
                let suffix = jd_suffix(&filename)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read JD file: {e}")))?;
                jd_file = Some((suffix, data));
            }
            Some("jd_url") => {
                let url = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read jd_url: {e}")))?;
                jd_url = Some(url);
            }
            _ => {} // unknown fields are ignored
        }
    }

    let (resume_name, resume_bytes) =
        resume.ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;
    let resume_tmp = write_temp(&resume_bytes, ".pdf")?;

    // An uploaded JD file wins over a URL when both are present.
    let jd_tmp = match (jd_file, jd_url) {
        (Some((suffix, data)), _) => write_temp(&data, &suffix)?,
        (None, Some(url)) => fetch_jd(&state.http, &url).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "provide either a 'jd' file or a 'jd_url' field".to_string(),
            ))
        }
    };

    info!(resume = %resume_name, "screening request accepted");
    let result = state
        .pipeline
        .run(resume_tmp.path(), jd_tmp.path(), Some(&resume_name))
        .await?;
    Ok(Json(result))
}

/// Validates a JD upload's extension and returns the temp-file suffix for it.
fn jd_suffix(filename: &str) -> Result<String, AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" | "md" | "txt" => Ok(format!(".{ext}")),
        _ => Err(AppError::Validation("JD file must be PDF/MD/TXT".to_string())),
    }
}

fn write_temp(data: &[u8], suffix: &str) -> Result<NamedTempFile, AppError> {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .context("failed to create temp file")?;
    file.write_all(data).context("failed to write temp file")?;
    Ok(file)
}

/// Fetches a job description from a URL. PDF responses are kept as PDF;
/// anything else is treated as HTML and reduced to visible text.
async fn fetch_jd(http: &HttpClient, url: &str) -> Result<NamedTempFile, AppError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::JdFetch(format!("request to {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::JdFetch(format!("{url} returned status {status}")));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::JdFetch(format!("failed to read body from {url}: {e}")))?;

    if content_type.contains("application/pdf") || url.to_lowercase().ends_with(".pdf") {
        return write_temp(&body, ".pdf");
    }

    let text = html::visible_text(&String::from_utf8_lossy(&body));
    if text.trim().is_empty() {
        return Err(AppError::JdFetch(format!(
            "no textual content found at {url}"
        )));
    }
    write_temp(text.as_bytes(), ".txt")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::index::{IndexError, SnippetIndex};
    use crate::llm_client::{CompletionModel, LlmError};
    use crate::loader::TextChunk;
    use crate::routes::build_router;
    use crate::screening::ScreeningPipeline;

    use super::*;

    struct StaticModel;

    #[async_trait]
    impl CompletionModel for StaticModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok("Match".to_string())
        }
    }

    struct NullIndex;

    #[async_trait]
    impl SnippetIndex for NullIndex {
        async fn upsert(&self, _id: &str, _chunks: &[TextChunk]) -> Result<(), IndexError> {
            Ok(())
        }

        async fn retrieve(&self, _id: &str, _q: &str, _k: usize) -> Result<String, IndexError> {
            Ok(String::new())
        }
    }

    fn test_router() -> axum::Router {
        let pipeline = Arc::new(ScreeningPipeline::new(
            Arc::new(StaticModel),
            Arc::new(NullIndex),
        ));
        let state = AppState {
            pipeline,
            http: HttpClient::new(),
        };
        build_router(state)
    }

    const BOUNDARY: &str = "sieve-test-boundary";

    fn file_part(name: &str, filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    async fn post_screen(parts: &[String]) -> (StatusCode, serde_json::Value) {
        let body = format!("{}--{BOUNDARY}--\r\n", parts.concat());
        let request = Request::builder()
            .method("POST")
            .uri("/api/screen")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or_default();
        (status, json)
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let (status, body) = post_screen(&[text_part("jd_url", "http://example.com")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_pdf_resume_is_rejected() {
        let (status, body) = post_screen(&[file_part("resume", "cv.txt", "text/plain", "hi")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Resume must be a PDF");
    }

    #[tokio::test]
    async fn test_missing_jd_is_rejected() {
        let (status, body) =
            post_screen(&[file_part("resume", "cv.pdf", "application/pdf", "%PDF-")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_jd_with_bad_extension_is_rejected() {
        let (status, body) = post_screen(&[
            file_part("resume", "cv.pdf", "application/pdf", "%PDF-"),
            file_part("jd", "jd.docx", "application/octet-stream", "words"),
        ])
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "JD file must be PDF/MD/TXT");
    }

    #[test]
    fn test_jd_suffix_accepts_known_extensions() {
        assert_eq!(jd_suffix("role.pdf").unwrap(), ".pdf");
        assert_eq!(jd_suffix("role.MD").unwrap(), ".md");
        assert_eq!(jd_suffix("role.txt").unwrap(), ".txt");
        assert!(jd_suffix("role.html").is_err());
        assert!(jd_suffix("role").is_err());
    }
}
