//! Differential TF-IDF between a resume and a job description

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terms and their signed weights, as parallel lists ordered by |score|.
/// Positive scores are emphasized by the job description, negative by the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermRelevance {
    pub keywords: Vec<String>,
    pub scores: Vec<f64>,
}

impl TermRelevance {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.keywords.iter().map(String::as_str).zip(self.scores.iter().copied())
    }
}

pub struct RelevanceScorer {
    token_pattern: Regex,
    top_n: usize,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(20)
    }
}

impl RelevanceScorer {
    pub fn new(top_n: usize) -> Self {
        Self {
            // Two or more word characters
            token_pattern: Regex::new(r"\b\w\w+\b").expect("static token pattern"),
            top_n,
        }
    }

    /// Score every term in the two-document vocabulary as `tfidf(jd) - tfidf(resume)`
    pub fn score_terms(&self, resume_text: &str, jd_text: &str) -> TermRelevance {
        let resume_counts = self.term_counts(resume_text);
        let jd_counts = self.term_counts(jd_text);

        if resume_counts.is_empty() || jd_counts.is_empty() {
            return TermRelevance::default();
        }

        let vocabulary: BTreeMap<&str, f64> = resume_counts
            .keys()
            .chain(jd_counts.keys())
            .map(|term| {
                let df = usize::from(resume_counts.contains_key(term)) + usize::from(jd_counts.contains_key(term));
                (term.as_str(), smoothed_idf(2, df))
            })
            .collect();

        let resume_weights = weights(&resume_counts, &vocabulary);
        let jd_weights = weights(&jd_counts, &vocabulary);

        let mut scored: Vec<(&str, f64)> = vocabulary
            .keys()
            .map(|term| {
                let jd = jd_weights.get(term).copied().unwrap_or(0.0);
                let resume = resume_weights.get(term).copied().unwrap_or(0.0);
                (*term, jd - resume)
            })
            .collect();

        // Stable sort: equal magnitudes stay in alphabetical order
        scored.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        scored.truncate(self.top_n);

        TermRelevance {
            keywords: scored.iter().map(|(term, _)| term.to_string()).collect(),
            scores: scored.iter().map(|(_, score)| *score).collect(),
        }
    }

    fn term_counts(&self, text: &str) -> BTreeMap<String, usize> {
        let lowered = text.to_lowercase();
        let mut counts = BTreeMap::new();
        for m in self.token_pattern.find_iter(&lowered) {
            *counts.entry(m.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

fn smoothed_idf(documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

/// Raw count times idf, L2-normalized per document
fn weights<'a>(counts: &'a BTreeMap<String, usize>, idf: &BTreeMap<&str, f64>) -> BTreeMap<&'a str, f64> {
    let raw: BTreeMap<&str, f64> = counts
        .iter()
        .map(|(term, count)| {
            let idf = idf.get(term.as_str()).copied().unwrap_or(1.0);
            (term.as_str(), *count as f64 * idf)
        })
        .collect();

    let norm = raw.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return raw;
    }
    raw.into_iter().map(|(term, w)| (term, w / norm)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_term_documents() {
        let relevance = RelevanceScorer::default().score_terms("python developer", "python docker");

        assert_eq!(relevance.keywords.len(), 3);
        // developer and docker share a magnitude; alphabetical order breaks the tie
        assert_eq!(relevance.keywords[0], "developer");
        assert_eq!(relevance.keywords[1], "docker");
        assert_eq!(relevance.keywords[2], "python");

        assert!((relevance.scores[0] + 0.8148).abs() < 1e-3);
        assert!((relevance.scores[1] - 0.8148).abs() < 1e-3);
        assert!(relevance.scores[2].abs() < 1e-12);
    }

    #[test]
    fn test_sorted_by_magnitude_and_capped() {
        let resume = "rust rust rust tokio serde axum sqlx tracing clap anyhow thiserror";
        let jd = "go kubernetes docker helm terraform aws gcp azure linux bash python java scala kotlin rust";
        let relevance = RelevanceScorer::new(20).score_terms(resume, jd);

        assert_eq!(relevance.keywords.len(), 20);
        assert_eq!(relevance.keywords.len(), relevance.scores.len());
        assert!(relevance
            .scores
            .windows(2)
            .all(|w| w[0].abs() >= w[1].abs()));
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let relevance = RelevanceScorer::default().score_terms("c r go", "c go");
        assert_eq!(relevance.keywords, vec!["go".to_string()]);
    }

    #[test]
    fn test_empty_document_gives_empty_result() {
        let scorer = RelevanceScorer::default();
        assert!(scorer.score_terms("", "python docker").is_empty());
        assert!(scorer.score_terms("python", "").is_empty());
        assert!(scorer.score_terms("", "").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let scorer = RelevanceScorer::default();
        let a = scorer.score_terms("rust engineer", "senior rust engineer with kafka");
        let b = scorer.score_terms("rust engineer", "senior rust engineer with kafka");
        assert_eq!(a, b);
    }
}
