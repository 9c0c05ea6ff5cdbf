//! Classifier stages — one retrieval-augmented LLM query per classification
//! task, constrained to a fixed label set.

use tracing::debug;

use crate::errors::AppError;
use crate::index::{SnippetIndex, TOP_K};
use crate::llm_client::CompletionModel;

use super::prompts::{
    EXPERIENCE_PROMPT_TEMPLATE, EXPERIENCE_QUERY, LABEL_ONLY_SYSTEM, SKILL_PROMPT_TEMPLATE,
    SKILL_QUERY,
};

/// Allowed labels for the experience classifier.
pub const EXPERIENCE_LABELS: &[&str] = &["Entry-level", "Mid-level", "Senior-level"];

/// Allowed labels for the skill classifier. "No Match" comes first: extraction
/// is substring-based and "Match" is a substring of "No Match", so the more
/// specific label must win.
pub const SKILL_LABELS: &[&str] = &["No Match", "Match"];

/// What label extraction made of the raw model output.
///
/// `Fallback` carries free text that matched no allowed label. It is not an
/// error: the decision policy routes anything unrecognized to rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLabel {
    Recognized(String),
    Fallback(String),
}

impl ClassifiedLabel {
    /// The label text as reported to callers, canonical casing for
    /// recognized labels and verbatim model text for fallbacks.
    pub fn into_text(self) -> String {
        match self {
            ClassifiedLabel::Recognized(s) | ClassifiedLabel::Fallback(s) => s,
        }
    }
}

/// Finds the first allowed label occurring in the raw response
/// (case-insensitive substring search, allowed-label order). Falls back to
/// the first non-empty line of the response verbatim.
fn extract_label(raw: &str, allowed: &[&str]) -> ClassifiedLabel {
    let lower = raw.to_lowercase();
    for label in allowed {
        if lower.contains(&label.to_lowercase()) {
            return ClassifiedLabel::Recognized((*label).to_string());
        }
    }
    let first_line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string();
    ClassifiedLabel::Fallback(first_line)
}

/// Classifies the candidate's experience level from resume snippets alone.
/// The job description is deliberately not part of this stage's input.
pub async fn classify_experience(
    llm: &dyn CompletionModel,
    index: &dyn SnippetIndex,
    document_id: &str,
) -> Result<ClassifiedLabel, AppError> {
    let context = index.retrieve(document_id, EXPERIENCE_QUERY, TOP_K).await?;
    debug!(
        "experience classifier retrieved {} chars of context",
        context.len()
    );

    let prompt = EXPERIENCE_PROMPT_TEMPLATE.replace("{context}", &context);
    let raw = llm.complete(&prompt, LABEL_ONLY_SYSTEM).await?;
    Ok(extract_label(&raw, EXPERIENCE_LABELS))
}

/// Classifies skill match from resume snippets plus the job description.
pub async fn classify_skill(
    llm: &dyn CompletionModel,
    index: &dyn SnippetIndex,
    document_id: &str,
    jd_text: &str,
) -> Result<ClassifiedLabel, AppError> {
    let context = index.retrieve(document_id, SKILL_QUERY, TOP_K).await?;
    debug!(
        "skill classifier retrieved {} chars of context",
        context.len()
    );

    let prompt = SKILL_PROMPT_TEMPLATE
        .replace("{jd}", jd_text)
        .replace("{context}", &context);
    let raw = llm.complete(&prompt, LABEL_ONLY_SYSTEM).await?;
    Ok(extract_label(&raw, SKILL_LABELS))
}
