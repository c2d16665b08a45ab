//! Prompt templates for resume review

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// The two review prompts; placeholders are written as `{name}`
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub general: String,
    pub detailed: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            general: GENERAL_REVIEW_TEMPLATE.to_string(),
            detailed: DETAILED_REVIEW_TEMPLATE.to_string(),
        }
    }
}

/// Values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct PromptParams {
    values: HashMap<&'static str, String>,
}

impl PromptParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PromptTemplates {
    pub fn render_general(&self, params: &PromptParams) -> String {
        render(&self.general, params)
    }

    pub fn render_detailed(&self, params: &PromptParams) -> String {
        render(&self.detailed, params)
    }
}

/// Single pass, so braces inside substituted text are never expanded.
/// Unknown placeholders are left as written.
pub fn render(template: &str, params: &PromptParams) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("static placeholder pattern"));

    placeholder
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

const GENERAL_REVIEW_TEMPLATE: &str = r#"Please analyze this resume against the job description and provide a detailed analysis:

1. ATS Compatibility Score (1-10): Rate how well the resume matches the job requirements
2. Missing Keywords: List important keywords from the job description that are missing from the resume
3. Strengths: Highlight areas where the resume aligns well with the job requirements
4. Areas for Improvement: Suggest specific improvements to better match the job description
5. Overall Feedback: Provide a summary of the resume's effectiveness for this specific role

RESUME CONTENT:
{resume}

{job_section}Please provide your analysis in a structured format with clear headings for each section."#;

const DETAILED_REVIEW_TEMPLATE: &str = r#"You are an expert resume reviewer. Analyze the following resume against the provided job description and provide a detailed, structured analysis.

JOB DESCRIPTION:
{job_description}

RESUME:
{resume}

NLP ANALYSIS:
- Resume Keywords: {resume_keywords}
- Job Description Keywords: {jd_keywords}
- Skill Match Percentage: {match_percentage}%
- Missing Skills: {missing_skills}

Provide a detailed analysis in the following JSON format (only output the JSON, no additional text):
{
    "match_score": <integer 0-100, how well the resume matches the job description>,
    "key_skills_matched": ["list", "of", "matching", "skills"],
    "missing_skills": ["list", "of", "missing", "skills"],
    "strengths": ["list", "of", "strengths"],
    "improvement_areas": ["list", "of", "areas", "to", "improve"],
    "suggestions": ["specific", "suggestions", "for", "improvement"],
    "summary": "A brief summary of the overall fit",
    "nlp_analysis": {
        "keyword_match": {keyword_match},
        "skill_analysis": {skill_analysis},
        "formatting_issues": {formatting_issues},
        "recommendations": {recommendations}
    }
}

Be specific and provide concrete examples from the resume and job description.
Focus on matching skills, experience, and qualifications mentioned in the job description.
If the resume is a good match, explain why. If not, provide specific, actionable feedback."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_rendering_with_job() {
        let templates = PromptTemplates::default();
        let params = PromptParams::new()
            .set("resume", "Software Engineer with Python experience at Tech Corp.")
            .set("job_section", "JOB DESCRIPTION:\nSenior engineer role requiring React.\n\n");

        let prompt = templates.render_general(&params);

        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp."));
        assert!(prompt.contains("JOB DESCRIPTION:\nSenior engineer role requiring React."));
        assert!(prompt.contains("1. ATS Compatibility Score (1-10)"));
        assert!(prompt.contains("5. Overall Feedback"));
        assert!(!prompt.contains("{job_section}"));
    }

    #[test]
    fn test_detailed_template_keeps_json_schema() {
        let templates = PromptTemplates::default();
        let params = PromptParams::new()
            .set("job_description", "Go developer")
            .set("resume", "Rust developer")
            .set("keyword_match", r#"{"keywords":["go"],"scores":[0.5]}"#)
            .set("match_percentage", "50");

        let prompt = templates.render_detailed(&params);

        assert!(prompt.contains("\"match_score\""));
        assert!(prompt.contains(r#""keyword_match": {"keywords":["go"],"scores":[0.5]}"#));
        assert!(prompt.contains("Skill Match Percentage: 50%"));
        // Not provided, left untouched
        assert!(prompt.contains("{skill_analysis}"));
    }

    #[test]
    fn test_substituted_values_are_not_expanded() {
        let params = PromptParams::new()
            .set("resume", "literal {job_description} braces")
            .set("job_description", "JOB");

        let rendered = render("{resume} / {job_description}", &params);
        assert_eq!(rendered, "literal {job_description} braces / JOB");
    }
}
