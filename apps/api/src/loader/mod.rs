//! Document loading — turns resume and job-description files into plain text
//! and slices resume text into indexable chunks.

pub mod html;

use std::path::Path;

use crate::errors::AppError;

/// Target chunk length in characters.
pub const CHUNK_SIZE: usize = 1000;
/// Overlap carried between consecutive chunks.
pub const CHUNK_OVERLAP: usize = 150;
/// Fragments shorter than this carry no retrieval signal and are dropped.
pub const MIN_CHUNK_LEN: usize = 50;

/// Supported input formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Markdown,
    PlainText,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "txt" => Ok(DocumentFormat::PlainText),
            "" => Err(AppError::UnsupportedFormat(format!(
                "{} has no file extension (expected pdf, md, markdown or txt)",
                path.display()
            ))),
            other => Err(AppError::UnsupportedFormat(format!(
                "unsupported file extension '.{other}' (expected pdf, md, markdown or txt)"
            ))),
        }
    }
}

/// A slice of resume text destined for the snippet index.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Position of this chunk within its document. Together with the document
    /// id this makes chunk identity deterministic, so re-indexing the same
    /// document overwrites instead of duplicating.
    pub ordinal: usize,
    pub text: String,
}

/// Loads a document into one plain-text string.
///
/// PDF goes through `pdf-extract`; Markdown and plain text are read verbatim.
/// A document that yields only whitespace is an `EmptyDocument` error.
pub fn load_text(path: &Path) -> Result<String, AppError> {
    let format = DocumentFormat::from_path(path)?;
    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text(path).map_err(|e| {
            AppError::Validation(format!(
                "failed to extract text from {}: {e}",
                path.display()
            ))
        })?,
        DocumentFormat::Markdown | DocumentFormat::PlainText => std::fs::read_to_string(path)
            .map_err(|e| AppError::Validation(format!("cannot read {}: {e}", path.display())))?,
    };
    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument(format!(
            "no extractable text found in {}",
            path.display()
        )));
    }
    Ok(text)
}

/// Loads a resume and chunks it for indexing.
pub fn load_resume_chunks(path: &Path) -> Result<Vec<TextChunk>, AppError> {
    let text = load_text(path)?;
    let chunks = chunk_text(&text);
    if chunks.is_empty() {
        return Err(AppError::EmptyDocument(format!(
            "resume {} produced no indexable chunks",
            path.display()
        )));
    }
    Ok(chunks)
}

/// Splits text into overlapping chunks of roughly `CHUNK_SIZE` characters.
///
/// Paragraphs (blank-line separated) are packed together until the target
/// size is reached; the tail of each emitted chunk seeds the next one so
/// context spanning a boundary survives retrieval. Oversized single
/// paragraphs are windowed directly.
pub fn chunk_text(text: &str) -> Vec<TextChunk> {
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if paragraph.len() > CHUNK_SIZE {
            flush(&mut pieces, &mut current);
            split_long_paragraph(paragraph, &mut pieces);
            continue;
        }
        if !current.is_empty() && current.len() + paragraph.len() + 2 > CHUNK_SIZE {
            let tail = overlap_tail(&current);
            flush(&mut pieces, &mut current);
            current = tail;
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }
    flush(&mut pieces, &mut current);

    pieces
        .into_iter()
        .filter(|p| p.len() >= MIN_CHUNK_LEN)
        .enumerate()
        .map(|(ordinal, text)| TextChunk { ordinal, text })
        .collect()
}

fn flush(pieces: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
    current.clear();
}

fn split_long_paragraph(paragraph: &str, pieces: &mut Vec<String>) {
    let chars: Vec<char> = paragraph.chars().collect();
    let step = CHUNK_SIZE - CHUNK_OVERLAP;
    let mut start = 0;
    while start < chars.len() {
        let end = (start + CHUNK_SIZE).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
}

/// Last `CHUNK_OVERLAP` characters of a chunk, advanced to the next word
/// boundary so the overlap does not open mid-word.
fn overlap_tail(chunk: &str) -> String {
    if chunk.len() <= CHUNK_OVERLAP {
        return chunk.to_string();
    }
    let mut start = chunk.len() - CHUNK_OVERLAP;
    while !chunk.is_char_boundary(start) {
        start += 1;
    }
    match chunk[start..].find(char::is_whitespace) {
        Some(ws) => chunk[start + ws..].trim_start().to_string(),
        None => chunk[start..].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("jd.md")).unwrap(),
            DocumentFormat::Markdown
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("jd.markdown")).unwrap(),
            DocumentFormat::Markdown
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("jd.TXT")).unwrap(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_format_rejects_unknown_extension() {
        let err = DocumentFormat::from_path(Path::new("cv.docx")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_format_rejects_missing_extension() {
        let err = DocumentFormat::from_path(Path::new("resume")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_text_reads_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Ten years of Rust experience.").unwrap();
        let text = load_text(file.path()).unwrap();
        assert_eq!(text, "Ten years of Rust experience.");
    }

    #[test]
    fn test_load_text_whitespace_only_is_empty_document() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "   \n\n\t  ").unwrap();
        let err = load_text(file.path()).unwrap_err();
        assert!(matches!(err, AppError::EmptyDocument(_)));
    }

    #[test]
    fn test_chunk_text_short_input_single_chunk() {
        let text = "A single paragraph that is comfortably over the minimum chunk length bar.";
        let chunks = chunk_text(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].ordinal, 0);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn test_chunk_text_drops_tiny_fragments() {
        assert!(chunk_text("Too short.").is_empty());
    }

    #[test]
    fn test_chunk_text_packs_paragraphs_until_target() {
        let paragraph = "word ".repeat(60); // ~300 chars
        let text = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}\n\n{paragraph}");
        let chunks = chunk_text(&text);
        assert!(chunks.len() >= 2, "got {} chunks", chunks.len());
        for chunk in &chunks {
            assert!(chunk.text.len() <= CHUNK_SIZE + CHUNK_OVERLAP);
        }
        // Ordinals are dense and ordered.
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.ordinal, i);
        }
    }

    #[test]
    fn test_chunk_text_windows_oversized_paragraph() {
        let long = "abcdefghij ".repeat(200); // ~2200 chars, no blank lines
        let chunks = chunk_text(&long);
        assert!(chunks.len() >= 2);
        // Consecutive windows share overlap content.
        let first = &chunks[0].text;
        let second = &chunks[1].text;
        let skip = first.chars().count().saturating_sub(50);
        let tail: String = first.chars().skip(skip).collect();
        assert!(second.contains(tail.trim()));
    }

    #[test]
    fn test_chunk_text_multibyte_safe() {
        let text = "é".repeat(CHUNK_SIZE * 2);
        // Must not panic on char boundaries.
        let chunks = chunk_text(&text);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_overlap_tail_starts_on_word_boundary() {
        let chunk = "x".repeat(900) + " carried over into the next chunk";
        let tail = overlap_tail(&chunk);
        assert!(tail.len() <= CHUNK_OVERLAP);
        assert!(!tail.starts_with(char::is_whitespace));
        assert!(chunk.ends_with(&tail));
    }
}
