//! Report structures combining NLP analysis and model feedback

use crate::config::PromptMode;
use crate::llm::feedback::FeedbackOutcome;
use crate::processing::analyzer::NlpAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report metadata and generation info
    pub metadata: ReportMetadata,

    /// Keyword, skill-gap and formatting results
    pub nlp_analysis: NlpAnalysis,

    /// Model review, or the reason there is none
    pub feedback: FeedbackOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub analyzer_version: String,
    pub processing_time_ms: u64,
    pub resume_source: String,
    pub job_source: Option<String>,
    /// Model used for feedback, when one was called
    pub model: Option<String>,
    pub mode: PromptMode,
}

/// Coarse reading of the skill match percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    Strong,
    Moderate,
    Weak,
    /// The job description names no catalog skills
    Unknown,
}

impl MatchLevel {
    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::Strong => "Strong match",
            MatchLevel::Moderate => "Moderate match",
            MatchLevel::Weak => "Weak match",
            MatchLevel::Unknown => "No skills to compare",
        }
    }
}

impl AnalysisReport {
    pub fn match_level(&self) -> MatchLevel {
        let skills = &self.nlp_analysis.skill_analysis;
        if skills.matched.is_empty() && skills.missing.is_empty() {
            return MatchLevel::Unknown;
        }
        match skills.match_percentage {
            p if p >= 75.0 => MatchLevel::Strong,
            p if p >= 50.0 => MatchLevel::Moderate,
            _ => MatchLevel::Weak,
        }
    }

    /// One-line verdict for console and Markdown headers
    pub fn verdict(&self) -> String {
        let skills = &self.nlp_analysis.skill_analysis;
        match self.match_level() {
            MatchLevel::Unknown => MatchLevel::Unknown.label().to_string(),
            level => format!(
                "{} ({} of {} job skills, {:.2}%)",
                level.label(),
                skills.matched.len(),
                skills.matched.len() + skills.missing.len(),
                skills.match_percentage
            ),
        }
    }
}
