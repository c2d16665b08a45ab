//! Keyword and skill-gap analysis combining every processing component

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::processing::formatting::{check_formatting_issues, FormattingIssue};
use crate::processing::keywords::{KeywordEntry, KeywordExtractor, PosFilter};
use crate::processing::language::{LanguageModel, RuleBasedTagger};
use crate::processing::recommendations::RecommendationComposer;
use crate::processing::relevance::{RelevanceScorer, TermRelevance};
use crate::processing::skill_gap::{analyze_skill_gap, SkillGapResult};
use crate::processing::skills::{SkillCatalog, SkillMatcher};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything the heuristic pipeline learns about one resume/job pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpAnalysis {
    pub resume_keywords: Vec<KeywordEntry>,
    pub jd_keywords: Vec<KeywordEntry>,
    pub keyword_match: TermRelevance,
    pub skill_analysis: SkillGapResult,
    pub formatting_issues: Vec<FormattingIssue>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub top_keywords: usize,
    pub pos_filter: PosFilter,
    pub max_missing_skills: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            top_keywords: 20,
            pos_filter: PosFilter::default(),
            max_missing_skills: 3,
        }
    }
}

impl From<&AnalysisConfig> for AnalyzerOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            top_keywords: config.top_keywords,
            pos_filter: PosFilter::with_adjectives(config.include_adjectives),
            max_missing_skills: config.max_missing_skills,
        }
    }
}

/// Runs keyword extraction, relevance scoring, skill gap, formatting audit and recommendations
pub struct NlpAnalyzer {
    keywords: KeywordExtractor,
    skills: SkillMatcher,
    relevance: RelevanceScorer,
    composer: RecommendationComposer,
    options: AnalyzerOptions,
}

impl NlpAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>, catalog: &SkillCatalog, options: AnalyzerOptions) -> Result<Self> {
        let skills = SkillMatcher::new(catalog)?;
        debug!(
            "Skill matcher ready: {} groups, {} skills",
            skills.group_count(),
            skills.skill_count()
        );

        Ok(Self {
            keywords: KeywordExtractor::new(model),
            skills,
            relevance: RelevanceScorer::default(),
            composer: RecommendationComposer::new(options.max_missing_skills),
            options,
        })
    }

    /// Rule-based tagger plus the configured (or built-in) skill catalog
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let catalog = match &config.skill_catalog {
            Some(path) => SkillCatalog::load(path)?,
            None => SkillCatalog::builtin(),
        };
        Self::new(Arc::new(RuleBasedTagger::new()), &catalog, AnalyzerOptions::from(config))
    }

    /// An empty job description yields empty job-side results, never an error
    pub fn analyze(&self, resume_text: &str, jd_text: &str) -> NlpAnalysis {
        let top_n = self.options.top_keywords;
        let filter = &self.options.pos_filter;

        let resume_keywords = self.keywords.extract_keywords(resume_text, top_n, filter);
        let jd_keywords = self.keywords.extract_keywords(jd_text, top_n, filter);
        let keyword_match = self.relevance.score_terms(resume_text, jd_text);
        let skill_analysis = analyze_skill_gap(&self.skills, resume_text, jd_text);
        let formatting_issues = check_formatting_issues(resume_text);
        let recommendations = self.composer.compose(&skill_analysis, &formatting_issues);

        debug!(
            "NLP analysis: {} resume keywords, {} job keywords, {:.2}% skill match, {} formatting issues",
            resume_keywords.len(),
            jd_keywords.len(),
            skill_analysis.match_percentage,
            formatting_issues.len()
        );

        NlpAnalysis {
            resume_keywords,
            jd_keywords,
            keyword_match,
            skill_analysis,
            formatting_issues,
            recommendations,
        }
    }
}
