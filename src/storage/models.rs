//! Persisted entities

use crate::error::{Result, ResumeAnalyzerError};
use crate::llm::feedback::FeedbackOutcome;
use crate::output::report::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobDescription {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Analysis {
    pub id: i64,
    pub resume_id: i64,
    pub job_description_id: Option<i64>,
    pub score: f64,
    pub feedback: Option<String>,
    pub analysis_type: String,
    pub keywords: Option<String>,
    pub ats_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Analysis row before insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub resume_id: i64,
    pub job_description_id: Option<i64>,
    pub score: f64,
    pub feedback: String,
    pub analysis_type: String,
    pub keywords: String,
    pub ats_score: f64,
}

impl NewAnalysis {
    /// Structured feedback keeps the model score, the JSON reply, the job keywords
    /// and the skill match percentage. Free text is stored with zero scores.
    pub fn from_report(resume_id: i64, job_description_id: Option<i64>, report: &AnalysisReport) -> Result<Self> {
        let analysis_type = report.metadata.mode.as_str().to_string();

        match &report.feedback {
            FeedbackOutcome::Structured { feedback } => Ok(Self {
                resume_id,
                job_description_id,
                score: feedback.match_score,
                feedback: serde_json::to_string(feedback)?,
                analysis_type,
                keywords: report
                    .nlp_analysis
                    .jd_keywords
                    .iter()
                    .map(|k| k.term.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                ats_score: report.nlp_analysis.skill_analysis.match_percentage,
            }),
            FeedbackOutcome::FreeText { text } => Ok(Self {
                resume_id,
                job_description_id,
                score: 0.0,
                feedback: text.clone(),
                analysis_type,
                keywords: String::new(),
                ats_score: 0.0,
            }),
            FeedbackOutcome::Unavailable { reason } => Err(ResumeAnalyzerError::AnalysisFailed(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptMode;
    use crate::llm::feedback::LlmFeedback;
    use crate::output::report::ReportMetadata;
    use crate::processing::analyzer::NlpAnalysis;
    use crate::processing::keywords::KeywordEntry;
    use crate::processing::relevance::TermRelevance;
    use crate::processing::skill_gap::SkillGapResult;
    use std::collections::BTreeSet;

    fn report(feedback: FeedbackOutcome, mode: PromptMode) -> AnalysisReport {
        let matched: BTreeSet<String> = ["python".to_string()].into_iter().collect();
        let jd: BTreeSet<String> = ["python".to_string(), "docker".to_string()].into_iter().collect();

        AnalysisReport {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                analyzer_version: "test".to_string(),
                processing_time_ms: 3,
                resume_source: "resume #1".to_string(),
                job_source: Some("job #2".to_string()),
                model: Some("scripted".to_string()),
                mode,
            },
            nlp_analysis: NlpAnalysis {
                resume_keywords: vec![],
                jd_keywords: vec![
                    KeywordEntry { term: "docker".to_string(), count: 2 },
                    KeywordEntry { term: "python".to_string(), count: 1 },
                ],
                keyword_match: TermRelevance::default(),
                skill_analysis: SkillGapResult::from_skill_sets(&matched, &jd),
                formatting_issues: vec![],
                recommendations: vec![],
            },
            feedback,
        }
    }

    #[test]
    fn test_structured_feedback_keeps_scores_and_keywords() {
        let feedback = LlmFeedback {
            match_score: 61.0,
            key_skills_matched: vec!["python".to_string()],
            missing_skills: vec!["docker".to_string()],
            strengths: vec![],
            improvement_areas: vec![],
            suggestions: vec![],
            summary: "Partial fit".to_string(),
            nlp_analysis: None,
        };
        let row = NewAnalysis::from_report(1, Some(2), &report(FeedbackOutcome::Structured { feedback }, PromptMode::Detailed))
            .unwrap();

        assert_eq!(row.score, 61.0);
        assert_eq!(row.ats_score, 50.0);
        assert_eq!(row.keywords, "docker,python");
        assert_eq!(row.analysis_type, "detailed");
        assert!(row.feedback.contains("\"summary\":\"Partial fit\""));
    }

    #[test]
    fn test_free_text_is_stored_with_zero_scores() {
        let outcome = FeedbackOutcome::FreeText {
            text: "ATS Compatibility Score: 6/10".to_string(),
        };
        let row = NewAnalysis::from_report(1, None, &report(outcome, PromptMode::General)).unwrap();

        assert_eq!(row.score, 0.0);
        assert_eq!(row.ats_score, 0.0);
        assert!(row.keywords.is_empty());
        assert_eq!(row.feedback, "ATS Compatibility Score: 6/10");
        assert_eq!(row.analysis_type, "general");
    }

    #[test]
    fn test_unavailable_feedback_is_not_stored() {
        let err = NewAnalysis::from_report(1, None, &report(FeedbackOutcome::unavailable("timeout"), PromptMode::General))
            .unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::AnalysisFailed(reason) if reason == "timeout"));
    }
}
