//! Parsing and validation of model feedback

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Structured review returned in detailed mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmFeedback {
    #[serde(deserialize_with = "score_from_number_or_string")]
    pub match_score: f64,
    #[serde(default)]
    pub key_skills_matched: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub summary: String,
    /// Echo of the NLP section, kept as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nlp_analysis: Option<serde_json::Value>,
}

#[derive(Debug, Error, PartialEq)]
pub enum FeedbackError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("response does not match the feedback schema: {0}")]
    Schema(String),

    #[error("match_score {0} is outside 0-100")]
    ScoreOutOfRange(f64),

    #[error("summary is empty")]
    EmptySummary,
}

/// What the review step produced; NLP results are reported regardless
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Structured { feedback: LlmFeedback },
    FreeText { text: String },
    Unavailable { reason: String },
}

impl FeedbackOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FeedbackOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, FeedbackOutcome::Unavailable { .. })
    }

    /// Score stored with the analysis: the model's match score, or 0
    pub fn score(&self) -> f64 {
        match self {
            FeedbackOutcome::Structured { feedback } => feedback.match_score,
            _ => 0.0,
        }
    }
}

/// Strip code fences, isolate the outermost object, deserialize and validate
pub fn parse_feedback(raw: &str) -> Result<LlmFeedback, FeedbackError> {
    let text = strip_json_fences(raw);
    let object = outermost_object(text).ok_or(FeedbackError::NoJsonObject)?;

    let feedback: LlmFeedback =
        serde_json::from_str(object).map_err(|e| FeedbackError::Schema(e.to_string()))?;

    if !(0.0..=100.0).contains(&feedback.match_score) {
        return Err(FeedbackError::ScoreOutOfRange(feedback.match_score));
    }
    if feedback.summary.trim().is_empty() {
        return Err(FeedbackError::EmptySummary);
    }
    Ok(feedback)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let stripped = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match stripped {
        Some(inner) => inner
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or(inner.trim_start()),
        None => text,
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Score {
        Number(f64),
        Text(String),
    }

    match Score::deserialize(deserializer)? {
        Score::Number(n) => Ok(n),
        Score::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("match_score '{}' is not a number", s))),
    }
}
