//! Route handlers

use crate::input::file_detector::FileType;
use crate::input::text_extractor::extract_from_bytes;
use crate::output::report::AnalysisReport;
use crate::review::ReviewRequest;
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Resume Analyzer API"
    }))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer",
        "llm_enabled": state.reviewer.has_llm()
    }))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// POST /analyze/text
pub async fn analyze_text_handler(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let report = run_review(&state, &body.resume_text, &body.job_description, "request body".to_string()).await?;
    Ok(Json(report))
}

/// POST /analyze, multipart with a `file` part and a `job_description` field
pub async fn analyze_upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
                upload = Some((file_name, bytes.to_vec()));
            }
            "job_description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read job_description: {}", e)))?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("Missing 'file' part"))?;
    let job_description = job_description.ok_or_else(|| ApiError::bad_request("Missing 'job_description' field"))?;

    let file_type = FileType::from_path(std::path::Path::new(&file_name));
    info!("Received upload '{}' ({} bytes, {:?})", file_name, bytes.len(), file_type);
    let resume_text = extract_from_bytes(file_type, bytes, &file_name).await?;

    let report = run_review(&state, &resume_text, &job_description, file_name).await?;
    Ok(Json(report))
}

async fn run_review(
    state: &AppState,
    resume_text: &str,
    job_description: &str,
    resume_source: String,
) -> Result<AnalysisReport, ApiError> {
    if resume_text.trim().is_empty() {
        return Err(ApiError::bad_request("Resume text is empty"));
    }
    if job_description.trim().is_empty() {
        return Err(ApiError::bad_request("Job description is empty"));
    }

    let report = state
        .reviewer
        .review(ReviewRequest {
            resume_text,
            job_text: Some(job_description),
            resume_source,
            job_source: Some("request".to_string()),
            mode: state.mode,
            skip_llm: false,
        })
        .await;
    Ok(report)
}
