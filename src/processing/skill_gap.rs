//! Matched and missing skills between a resume and a job description

use crate::processing::skills::SkillMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGapResult {
    /// Job skills absent from the resume
    #[serde(rename = "missing_skills")]
    pub missing: BTreeSet<String>,
    /// Job skills also present in the resume
    #[serde(rename = "matched_skills")]
    pub matched: BTreeSet<String>,
    /// `matched / job skills * 100`, two decimals; 0 when the job names no skills
    pub match_percentage: f64,
}

impl SkillGapResult {
    pub fn from_skill_sets(resume_skills: &BTreeSet<String>, jd_skills: &BTreeSet<String>) -> Self {
        let missing: BTreeSet<String> = jd_skills.difference(resume_skills).cloned().collect();
        let matched: BTreeSet<String> = jd_skills.intersection(resume_skills).cloned().collect();

        let match_percentage = if jd_skills.is_empty() {
            0.0
        } else {
            round_percentage(matched.len() as f64 / jd_skills.len() as f64 * 100.0)
        };

        Self {
            missing,
            matched,
            match_percentage,
        }
    }

    /// Every skill the job description asks for
    pub fn job_skills(&self) -> BTreeSet<String> {
        self.matched.union(&self.missing).cloned().collect()
    }
}

pub fn analyze_skill_gap(matcher: &SkillMatcher, resume_text: &str, jd_text: &str) -> SkillGapResult {
    let resume_skills = matcher.extract_skills(resume_text);
    let jd_skills = matcher.extract_skills(jd_text);
    SkillGapResult::from_skill_sets(&resume_skills, &jd_skills)
}

/// Two decimal places, halves rounded away from zero
fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skills::SkillCatalog;

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(&SkillCatalog::builtin()).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partial_match() {
        let gap = analyze_skill_gap(&matcher(), "python, react", "python, docker, react");

        assert_eq!(gap.matched, set(&["python", "react"]));
        assert_eq!(gap.missing, set(&["docker"]));
        assert_eq!(gap.match_percentage, 66.67);
    }

    #[test]
    fn test_empty_job_description() {
        let gap = analyze_skill_gap(&matcher(), "python, react", "");

        assert!(gap.matched.is_empty());
        assert!(gap.missing.is_empty());
        assert_eq!(gap.match_percentage, 0.0);
    }

    #[test]
    fn test_matched_and_missing_partition_job_skills() {
        let matcher = matcher();
        let jd = "AWS, Kubernetes, Terraform, Python, Git and CI/CD";
        let gap = analyze_skill_gap(&matcher, "Python and git on aws", jd);

        assert_eq!(gap.job_skills(), matcher.extract_skills(jd));
        assert!(gap.matched.is_disjoint(&gap.missing));
        assert_eq!(gap.match_percentage, 50.0);
    }

    #[test]
    fn test_full_match() {
        let gap = SkillGapResult::from_skill_sets(&set(&["go", "redis", "sql"]), &set(&["go", "redis"]));
        assert_eq!(gap.match_percentage, 100.0);
        assert!(gap.missing.is_empty());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_percentage(100.0 / 3.0), 33.33);
        assert_eq!(round_percentage(200.0 / 3.0), 66.67);
        assert_eq!(round_percentage(12.5), 12.5);
    }

    #[test]
    fn test_serializes_with_descriptive_names() {
        let gap = SkillGapResult::from_skill_sets(&set(&["go"]), &set(&["go", "sql"]));
        let json = serde_json::to_value(&gap).unwrap();

        assert_eq!(json["matched_skills"], serde_json::json!(["go"]));
        assert_eq!(json["missing_skills"], serde_json::json!(["sql"]));
        assert_eq!(json["match_percentage"], serde_json::json!(50.0));
    }
}
