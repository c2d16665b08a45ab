//! Text extraction from resume and job description files

use crate::error::{Result, ResumeAnalyzerError};
use crate::input::file_detector::FileType;
use log::debug;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let label = path.display().to_string();
        PdfExtractor::extract_bytes(bytes, label).await
    }
}

impl PdfExtractor {
    /// Extract page text on the blocking pool; a panicking parser becomes an extraction error
    pub async fn extract_bytes(bytes: Vec<u8>, label: String) -> Result<String> {
        let task_label = label.clone();
        let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .await
            .map_err(|e| ResumeAnalyzerError::PdfExtraction(format!("PDF parser crashed on '{}': {}", task_label, e)))?
            .map_err(|e| ResumeAnalyzerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", label, e)))?;

        debug!("Extracted {} pages from {}", pages.len(), label);
        Ok(join_pages(&pages))
    }
}

/// Join page texts with newlines, silently dropping pages that yielded no text
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render Markdown and strip it back down to plain lines
pub fn markdown_to_text(markdown: &str) -> String {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n");

    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
    let clean_text = tag_regex.replace_all(&text, "");

    let clean_text = clean_text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract text from an in-memory upload whose type is already known
pub async fn extract_from_bytes(file_type: FileType, bytes: Vec<u8>, label: &str) -> Result<String> {
    match file_type {
        FileType::Pdf => PdfExtractor::extract_bytes(bytes, label.to_string()).await,
        FileType::Text => decode_utf8(bytes, label),
        FileType::Markdown => Ok(markdown_to_text(&decode_utf8(bytes, label)?)),
        FileType::Unknown => Err(ResumeAnalyzerError::UnsupportedFormat(format!(
            "Unsupported file type for: {}",
            label
        ))),
    }
}

fn decode_utf8(bytes: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| ResumeAnalyzerError::InvalidInput(format!("'{}' is not valid UTF-8 text", label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_pages_skips_empty_pages() {
        let pages = vec!["Page one", "", "   \n", "Page three"];
        assert_eq!(join_pages(&pages), "Page one\nPage three");
    }

    #[test]
    fn test_join_pages_of_nothing_is_empty() {
        let pages: Vec<String> = Vec::new();
        assert_eq!(join_pages(&pages), "");
    }

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let text = markdown_to_text("# Jane Doe\n\n**Senior** engineer & mentor\n\n- Rust\n- Go");

        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Senior engineer & mentor"));
        assert!(text.contains("Rust"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }

    #[tokio::test]
    async fn test_extract_from_bytes_rejects_unknown_type() {
        let result = extract_from_bytes(FileType::Unknown, b"data".to_vec(), "blob.bin").await;
        assert!(matches!(result, Err(ResumeAnalyzerError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_extract_from_bytes_plain_text() {
        let text = extract_from_bytes(FileType::Text, b"Python developer".to_vec(), "cv.txt")
            .await
            .unwrap();
        assert_eq!(text, "Python developer");
    }
}
