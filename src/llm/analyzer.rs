//! Model-backed review of a resume on top of the NLP analysis

use crate::config::PromptMode;
use crate::llm::client::{CompletionRequest, CompletionService};
use crate::llm::feedback::{parse_feedback, FeedbackOutcome};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::processing::analyzer::NlpAnalysis;
use crate::processing::keywords::KeywordEntry;
use log::{info, warn};
use std::sync::Arc;

pub struct FeedbackAnalyzer {
    service: Arc<dyn CompletionService>,
    templates: PromptTemplates,
    prompt_keyword_count: usize,
}

impl FeedbackAnalyzer {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            templates: PromptTemplates::default(),
            prompt_keyword_count: 5,
        }
    }

    pub fn with_prompt_keyword_count(mut self, count: usize) -> Self {
        self.prompt_keyword_count = count;
        self
    }

    pub fn model_name(&self) -> &str {
        self.service.model_name()
    }

    /// Detailed mode needs a job description and falls back to general without one
    pub fn effective_mode(mode: PromptMode, job: Option<&str>) -> PromptMode {
        match (mode, job.map(str::trim)) {
            (PromptMode::Detailed, Some(job)) if !job.is_empty() => PromptMode::Detailed,
            _ => PromptMode::General,
        }
    }

    /// Never fails: transport and parse errors become `Unavailable`
    pub async fn review(
        &self,
        mode: PromptMode,
        resume: &str,
        job: Option<&str>,
        nlp: &NlpAnalysis,
    ) -> FeedbackOutcome {
        let mode = Self::effective_mode(mode, job);
        info!("Requesting {} review from {}", mode.as_str(), self.service.model_name());

        let request = match mode {
            PromptMode::General => CompletionRequest::text(self.general_prompt(resume, job)),
            PromptMode::Detailed => match self.detailed_prompt(resume, job.unwrap_or_default(), nlp) {
                Ok(prompt) => CompletionRequest::json(prompt),
                Err(e) => return FeedbackOutcome::unavailable(format!("Failed to build prompt: {}", e)),
            },
        };

        let reply = match self.service.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("LLM review failed: {}", e);
                return FeedbackOutcome::unavailable(e.to_string());
            }
        };

        match mode {
            PromptMode::General => FeedbackOutcome::FreeText { text: reply },
            PromptMode::Detailed => match parse_feedback(&reply) {
                Ok(feedback) => FeedbackOutcome::Structured { feedback },
                Err(e) => {
                    warn!("Discarding malformed LLM feedback: {}", e);
                    FeedbackOutcome::unavailable(format!("Malformed LLM response: {}", e))
                }
            },
        }
    }

    pub fn general_prompt(&self, resume: &str, job: Option<&str>) -> String {
        let job_section = job
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .map(|j| format!("JOB DESCRIPTION:\n{}\n\n", j))
            .unwrap_or_default();

        let params = PromptParams::new()
            .set("resume", resume)
            .set("job_section", job_section);
        self.templates.render_general(&params)
    }

    pub fn detailed_prompt(&self, resume: &str, job: &str, nlp: &NlpAnalysis) -> serde_json::Result<String> {
        let skills = &nlp.skill_analysis;
        let missing: Vec<&str> = skills.missing.iter().take(3).map(String::as_str).collect();

        let params = PromptParams::new()
            .set("job_description", job)
            .set("resume", resume)
            .set("resume_keywords", self.keyword_list(&nlp.resume_keywords))
            .set("jd_keywords", self.keyword_list(&nlp.jd_keywords))
            .set("match_percentage", skills.match_percentage.to_string())
            .set("missing_skills", missing.join(", "))
            .set("keyword_match", serde_json::to_string(&nlp.keyword_match)?)
            .set("skill_analysis", serde_json::to_string(skills)?)
            .set("formatting_issues", serde_json::to_string(&nlp.formatting_issues)?)
            .set("recommendations", serde_json::to_string(&nlp.recommendations)?);

        Ok(self.templates.render_detailed(&params))
    }

    fn keyword_list(&self, keywords: &[KeywordEntry]) -> String {
        keywords
            .iter()
            .take(self.prompt_keyword_count)
            .map(|k| k.term.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::LlmError;
    use crate::processing::analyzer::{AnalyzerOptions, NlpAnalyzer};
    use crate::processing::language::RuleBasedTagger;
    use crate::processing::skills::SkillCatalog;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedService {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedService {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(|_| LlmError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn nlp(resume: &str, job: &str) -> NlpAnalysis {
        NlpAnalyzer::new(
            Arc::new(RuleBasedTagger::new()),
            &SkillCatalog::builtin(),
            AnalyzerOptions::default(),
        )
        .unwrap()
        .analyze(resume, job)
    }

    const RESUME: &str = "Python developer building React apps";
    const JOB: &str = "Python engineer with Docker and React";

    #[tokio::test]
    async fn test_detailed_review_parses_json() {
        let service = ScriptedService::replying(r#"```json
{"match_score": 70, "summary": "Good fit", "missing_skills": ["docker"]}
```"#);
        let analyzer = FeedbackAnalyzer::new(service.clone());

        let outcome = analyzer
            .review(PromptMode::Detailed, RESUME, Some(JOB), &nlp(RESUME, JOB))
            .await;

        assert!(matches!(&outcome, FeedbackOutcome::Structured { feedback } if feedback.match_score == 70.0));

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].expect_json);
        assert!(prompts[0].prompt.contains("Skill Match Percentage: 66.67%"));
        assert!(prompts[0].prompt.contains("Missing Skills: docker"));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_unavailable() {
        let analyzer = FeedbackAnalyzer::new(ScriptedService::replying("I cannot help with that."));
        let outcome = analyzer
            .review(PromptMode::Detailed, RESUME, Some(JOB), &nlp(RESUME, JOB))
            .await;

        assert!(matches!(outcome, FeedbackOutcome::Unavailable { reason } if reason.starts_with("Malformed")));
    }

    #[tokio::test]
    async fn test_service_failure_is_unavailable() {
        let analyzer = FeedbackAnalyzer::new(ScriptedService::failing());
        let outcome = analyzer
            .review(PromptMode::General, RESUME, None, &nlp(RESUME, ""))
            .await;

        assert!(!outcome.is_available());
    }

    #[tokio::test]
    async fn test_general_review_without_job() {
        let service = ScriptedService::replying("ATS Compatibility Score: 7/10");
        let analyzer = FeedbackAnalyzer::new(service.clone());

        let outcome = analyzer
            .review(PromptMode::Detailed, RESUME, None, &nlp(RESUME, ""))
            .await;

        assert_eq!(
            outcome,
            FeedbackOutcome::FreeText {
                text: "ATS Compatibility Score: 7/10".to_string()
            }
        );
        let prompts = service.prompts.lock().unwrap();
        assert!(!prompts[0].expect_json);
        assert!(!prompts[0].prompt.contains("JOB DESCRIPTION:"));
    }

    #[test]
    fn test_effective_mode() {
        assert_eq!(FeedbackAnalyzer::effective_mode(PromptMode::Detailed, Some("job")), PromptMode::Detailed);
        assert_eq!(FeedbackAnalyzer::effective_mode(PromptMode::Detailed, Some("  ")), PromptMode::General);
        assert_eq!(FeedbackAnalyzer::effective_mode(PromptMode::General, Some("job")), PromptMode::General);
    }
}
