//! LLM integration module

pub mod client;
pub mod prompts;
pub mod feedback;
pub mod analyzer;

pub use analyzer::FeedbackAnalyzer;
pub use client::{CompletionRequest, CompletionService, GeminiClient, LlmError};
pub use feedback::{FeedbackOutcome, LlmFeedback};
