//! Text processing and analysis module

pub mod text_processor;
pub mod language;
pub mod keywords;
pub mod skills;
pub mod relevance;
pub mod skill_gap;
pub mod formatting;
pub mod recommendations;
pub mod analyzer;

pub use analyzer::{AnalyzerOptions, NlpAnalysis, NlpAnalyzer};
pub use formatting::{check_formatting_issues, FormattingIssue};
pub use keywords::{KeywordEntry, KeywordExtractor, PosFilter};
pub use language::{LanguageModel, RuleBasedTagger};
pub use recommendations::generate_recommendations;
pub use relevance::{RelevanceScorer, TermRelevance};
pub use skill_gap::{analyze_skill_gap, SkillGapResult};
pub use skills::{SkillCatalog, SkillMatcher};
