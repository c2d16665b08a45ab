//! Skill catalog and pattern matching

use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// A named group of related skill names, matched as one alternation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    pub skills: Vec<String>,
}

/// Ordered list of skill groups. Overlap between groups is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub groups: Vec<SkillGroup>,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillCatalog {
    /// The catalog shipped with the binary
    pub fn builtin() -> Self {
        let group = |name: &str, skills: &[&str]| SkillGroup {
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            groups: vec![
                group(
                    "cloud_devops",
                    &["aws", "azure", "gcp", "kubernetes", "docker", "k8s", "terraform", "ansible", "jenkins"],
                ),
                group(
                    "languages",
                    &["python", "java", "javascript", "go", "golang", "node.js", "typescript"],
                ),
                group("datastores", &["sql", "postgresql", "mysql", "mongodb", "redis"]),
                group("web_frameworks", &["react", "vue", "angular", "node.js", "express", "flask"]),
                group(
                    "infrastructure",
                    &["aws", "azure", "gcp", "terraform", "ansible", "jenkins", "kubernetes", "docker"],
                ),
                group("version_control", &["git", "github", "gitlab", "bitbucket"]),
                group(
                    "ci_cd",
                    &["ci/cd", "cicd", "continuous integration", "continuous deployment"],
                ),
            ],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: SkillCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading skill catalog from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(ResumeAnalyzerError::Configuration(
                "Skill catalog has no groups".to_string(),
            ));
        }
        for group in &self.groups {
            if group.skills.is_empty() {
                return Err(ResumeAnalyzerError::Configuration(format!(
                    "Skill group '{}' has no skills",
                    group.name
                )));
            }
            if group.skills.iter().any(|s| s.trim().is_empty()) {
                return Err(ResumeAnalyzerError::Configuration(format!(
                    "Skill group '{}' contains an empty skill",
                    group.name
                )));
            }
        }
        Ok(())
    }
}

/// Finds catalog skills in free text
pub struct SkillMatcher {
    patterns: Vec<Regex>,
    skill_count: usize,
}

impl SkillMatcher {
    pub fn new(catalog: &SkillCatalog) -> Result<Self> {
        catalog.validate()?;

        let patterns = catalog
            .groups
            .iter()
            .map(|group| {
                Regex::new(&group_pattern(&group.skills)).map_err(|e| {
                    ResumeAnalyzerError::Configuration(format!(
                        "Invalid pattern for skill group '{}': {}",
                        group.name, e
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let skill_count = catalog
            .groups
            .iter()
            .flat_map(|g| g.skills.iter().map(|s| s.trim().to_lowercase()))
            .collect::<BTreeSet<_>>()
            .len();

        Ok(Self {
            patterns,
            skill_count,
        })
    }

    /// Every catalog skill found in `text`, lowercased
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(&lowered))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn group_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of distinct skills across all groups
    pub fn skill_count(&self) -> usize {
        self.skill_count
    }
}

/// One case-insensitive alternation; word boundaries only on word-character edges
fn group_pattern(skills: &[String]) -> String {
    let mut skills: Vec<String> = skills.iter().map(|s| s.trim().to_lowercase()).collect();
    // Longest first so "golang" wins over "go" when boundaries allow both
    skills.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    skills.dedup();

    let alternatives: Vec<String> = skills
        .iter()
        .map(|skill| {
            let starts_word = skill.chars().next().is_some_and(is_word_char);
            let ends_word = skill.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                regex::escape(skill),
                if ends_word { r"\b" } else { "" }
            )
        })
        .collect();

    format!("(?i)(?:{})", alternatives.join("|"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(&SkillCatalog::builtin()).unwrap()
    }

    #[test]
    fn test_builtin_catalog() {
        let matcher = matcher();
        assert_eq!(matcher.group_count(), 7);
        assert!(matcher.skill_count() > 30);
    }

    #[test]
    fn test_extract_skills_is_case_insensitive() {
        let skills = matcher().extract_skills("Built services in Python and Node.js on AWS with Docker");

        let expected: BTreeSet<String> = ["python", "node.js", "aws", "docker"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(skills, expected);
    }

    #[test]
    fn test_word_boundaries() {
        let matcher = matcher();

        // "go" inside other words must not match
        let skills = matcher.extract_skills("Good governance, google docs");
        assert!(skills.is_empty());

        let skills = matcher.extract_skills("golang and go");
        assert!(skills.contains("golang"));
        assert!(skills.contains("go"));
    }

    #[test]
    fn test_multi_word_skills() {
        let skills = matcher().extract_skills("Owned continuous integration and CI/CD pipelines");
        assert!(skills.contains("continuous integration"));
        assert!(skills.contains("ci/cd"));
    }

    #[test]
    fn test_empty_text() {
        assert!(matcher().extract_skills("").is_empty());
    }

    #[test]
    fn test_custom_catalog_with_symbols() {
        let catalog = SkillCatalog::from_toml_str(
            r#"
            [[groups]]
            name = "systems"
            skills = ["C++", "rust", ".net"]
            "#,
        )
        .unwrap();
        let matcher = SkillMatcher::new(&catalog).unwrap();

        let skills = matcher.extract_skills("Wrote C++ and .NET services, some Rust");
        assert!(skills.contains("c++"));
        assert!(skills.contains(".net"));
        assert!(skills.contains("rust"));
        assert!(!matcher.extract_skills("trusted").contains("rust"));
    }

    #[test]
    fn test_invalid_catalogs_are_rejected() {
        assert!(SkillCatalog::from_toml_str("groups = []").is_err());

        let empty_group = r#"
            [[groups]]
            name = "empty"
            skills = []
        "#;
        assert!(matches!(
            SkillCatalog::from_toml_str(empty_group),
            Err(ResumeAnalyzerError::Configuration(_))
        ));
    }

    #[test]
    fn test_shipped_catalog_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/skill_catalog.toml");
        let catalog = SkillCatalog::load(&path).unwrap();
        assert_eq!(catalog, SkillCatalog::builtin());
    }
}
