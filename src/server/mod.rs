//! HTTP API over the review pipeline

pub mod error;
pub mod handlers;

use crate::config::PromptMode;
use crate::error::Result;
use crate::review::Reviewer;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state injected into all route handlers
#[derive(Clone)]
pub struct AppState {
    pub reviewer: Arc<Reviewer>,
    pub mode: PromptMode,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/analyze", post(handlers::analyze_upload_handler))
        .route("/analyze/text", post(handlers::analyze_text_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse().map_err(|e| {
        crate::error::ResumeAnalyzerError::Configuration(format!("Invalid listen address {}:{}: {}", host, port, e))
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
