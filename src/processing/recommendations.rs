//! Action items built from the skill gap and formatting audit

use crate::processing::formatting::FormattingIssue;
use crate::processing::skill_gap::SkillGapResult;

pub struct RecommendationComposer {
    max_missing_skills: usize,
}

impl Default for RecommendationComposer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RecommendationComposer {
    pub fn new(max_missing_skills: usize) -> Self {
        Self { max_missing_skills }
    }

    /// Skill advice first, then one item per formatting issue
    pub fn compose(&self, skill_gap: &SkillGapResult, formatting_issues: &[FormattingIssue]) -> Vec<String> {
        let mut recommendations = Vec::with_capacity(formatting_issues.len() + 1);

        if !skill_gap.missing.is_empty() && self.max_missing_skills > 0 {
            let named: Vec<&str> = skill_gap
                .missing
                .iter()
                .take(self.max_missing_skills)
                .map(String::as_str)
                .collect();
            recommendations.push(format!(
                "Add sections highlighting experience with: {}",
                named.join(", ")
            ));
        }

        recommendations.extend(
            formatting_issues
                .iter()
                .map(|issue| format!("Fix formatting: {}", issue)),
        );

        recommendations
    }
}

pub fn generate_recommendations(skill_gap: &SkillGapResult, formatting_issues: &[FormattingIssue]) -> Vec<String> {
    RecommendationComposer::default().compose(skill_gap, formatting_issues)
}
