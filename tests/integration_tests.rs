//! Integration tests for text input

use resume_analyzer::input::InputManager;
use resume_analyzer::ResumeAnalyzerError;
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();

    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Markup is gone
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_cache_can_be_disabled() {
    let mut manager = InputManager::new().with_cache(false);
    manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.xyz");
    std::fs::write(&path, "John Doe").unwrap();

    let err = InputManager::new().extract_text(&path).await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let err = InputManager::new()
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InvalidInput(_)));
}

#[tokio::test]
async fn test_job_description_as_text_or_file() {
    let mut manager = InputManager::new();

    let from_file = manager.text_or_file("tests/fixtures/sample_job.txt").await.unwrap();
    assert!(from_file.contains("Kubernetes"));

    let inline = manager.text_or_file("Looking for a Rust engineer").await.unwrap();
    assert_eq!(inline, "Looking for a Rust engineer");
}
