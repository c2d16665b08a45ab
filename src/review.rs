//! End-to-end review: NLP analysis plus optional model feedback

use crate::config::{Config, PromptMode};
use crate::error::Result;
use crate::llm::analyzer::FeedbackAnalyzer;
use crate::llm::client::{CompletionService, GeminiClient};
use crate::llm::feedback::FeedbackOutcome;
use crate::output::report::{AnalysisReport, ReportMetadata};
use crate::processing::analyzer::NlpAnalyzer;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// One resume/job pair to review
#[derive(Debug, Clone)]
pub struct ReviewRequest<'a> {
    pub resume_text: &'a str,
    pub job_text: Option<&'a str>,
    pub resume_source: String,
    pub job_source: Option<String>,
    pub mode: PromptMode,
    /// Skip the model call even when one is configured
    pub skip_llm: bool,
}

pub struct Reviewer {
    nlp: NlpAnalyzer,
    feedback: Option<FeedbackAnalyzer>,
}

impl Reviewer {
    pub fn new(nlp: NlpAnalyzer, feedback: Option<FeedbackAnalyzer>) -> Self {
        Self { nlp, feedback }
    }

    /// Build from configuration; without an API key only NLP analysis runs
    pub fn from_config(config: &Config) -> Result<Self> {
        let nlp = NlpAnalyzer::from_config(&config.analysis)?;

        let feedback = match config.api_key() {
            Some(key) => {
                let client: Arc<dyn CompletionService> = Arc::new(GeminiClient::new(&config.llm, key)?);
                Some(
                    FeedbackAnalyzer::new(client)
                        .with_prompt_keyword_count(config.analysis.prompt_keyword_count),
                )
            }
            None => {
                warn!("GEMINI_API_KEY is not set; LLM feedback is disabled");
                None
            }
        };

        Ok(Self::new(nlp, feedback))
    }

    pub fn has_llm(&self) -> bool {
        self.feedback.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.feedback.as_ref().map(FeedbackAnalyzer::model_name)
    }

    pub fn nlp(&self) -> &NlpAnalyzer {
        &self.nlp
    }

    /// Model failures end up in the report's feedback; NLP results are always kept
    pub async fn review(&self, request: ReviewRequest<'_>) -> AnalysisReport {
        let start = Instant::now();
        let job_text = request.job_text.unwrap_or_default();

        info!("Analyzing resume from {}", request.resume_source);
        let nlp_analysis = self.nlp.analyze(request.resume_text, job_text);
        let mode = FeedbackAnalyzer::effective_mode(request.mode, request.job_text);

        let (feedback, model) = match (&self.feedback, request.skip_llm) {
            (_, true) => (FeedbackOutcome::unavailable("LLM feedback was skipped"), None),
            (None, false) => (FeedbackOutcome::unavailable("GEMINI_API_KEY is not set"), None),
            (Some(analyzer), false) => {
                let outcome = analyzer
                    .review(mode, request.resume_text, request.job_text, &nlp_analysis)
                    .await;
                (outcome, Some(analyzer.model_name().to_string()))
            }
        };

        AnalysisReport {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now(),
                analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                resume_source: request.resume_source,
                job_source: request.job_source,
                model,
                mode,
            },
            nlp_analysis,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn nlp_only() -> Reviewer {
        let config = AnalysisConfig {
            top_keywords: 20,
            include_adjectives: true,
            max_missing_skills: 3,
            prompt_keyword_count: 5,
            skill_catalog: None,
        };
        Reviewer::new(NlpAnalyzer::from_config(&config).unwrap(), None)
    }

    fn request<'a>(resume: &'a str, job: Option<&'a str>, skip_llm: bool) -> ReviewRequest<'a> {
        ReviewRequest {
            resume_text: resume,
            job_text: job,
            resume_source: "resume.txt".to_string(),
            job_source: job.map(|_| "inline".to_string()),
            mode: PromptMode::Detailed,
            skip_llm,
        }
    }

    #[tokio::test]
    async fn test_without_llm_keeps_nlp_results() {
        let reviewer = nlp_only();
        assert!(!reviewer.has_llm());

        let report = reviewer
            .review(request("python, react", Some("python, docker, react"), false))
            .await;

        assert_eq!(report.nlp_analysis.skill_analysis.match_percentage, 66.67);
        assert!(matches!(report.feedback, FeedbackOutcome::Unavailable { ref reason } if reason.contains("GEMINI_API_KEY")));
        assert_eq!(report.metadata.mode, PromptMode::Detailed);
        assert!(report.metadata.model.is_none());
    }

    #[tokio::test]
    async fn test_missing_job_switches_to_general_mode() {
        let report = nlp_only().review(request("python developer", None, true)).await;

        assert_eq!(report.metadata.mode, PromptMode::General);
        assert!(report.nlp_analysis.jd_keywords.is_empty());
        assert!(matches!(report.feedback, FeedbackOutcome::Unavailable { ref reason } if reason.contains("skipped")));
    }

    #[test]
    fn test_from_config_without_key() {
        let mut config = Config::default();
        config.llm.api_key = None;
        let reviewer = Reviewer::from_config(&config).unwrap();
        assert!(!reviewer.has_llm());

        config.llm.api_key = Some("test-key".to_string());
        let reviewer = Reviewer::from_config(&config).unwrap();
        assert_eq!(reviewer.model_name(), Some("gemini-1.5-flash"));
    }
}
