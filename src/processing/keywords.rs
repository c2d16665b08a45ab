//! Ranked keyword extraction over annotated tokens

use crate::processing::language::{LanguageModel, PartOfSpeech};
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub term: String,
    pub count: usize,
}

/// Which parts of speech count as keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFilter {
    allowed: Vec<PartOfSpeech>,
}

impl PosFilter {
    pub fn nouns() -> Self {
        Self {
            allowed: vec![PartOfSpeech::Noun, PartOfSpeech::ProperNoun],
        }
    }

    pub fn nouns_and_adjectives() -> Self {
        Self {
            allowed: vec![PartOfSpeech::Noun, PartOfSpeech::ProperNoun, PartOfSpeech::Adjective],
        }
    }

    pub fn with_adjectives(include_adjectives: bool) -> Self {
        if include_adjectives {
            Self::nouns_and_adjectives()
        } else {
            Self::nouns()
        }
    }

    pub fn allows(&self, pos: PartOfSpeech) -> bool {
        self.allowed.contains(&pos)
    }
}

impl Default for PosFilter {
    fn default() -> Self {
        Self::nouns_and_adjectives()
    }
}

pub struct KeywordExtractor {
    model: Arc<dyn LanguageModel>,
}

impl KeywordExtractor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Top `top_n` lemmas by count; ties keep first-seen order
    pub fn extract_keywords(&self, text: &str, top_n: usize, filter: &PosFilter) -> Vec<KeywordEntry> {
        let normalized = TextProcessor::normalize(text);

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for token in self.model.annotate(&normalized) {
            if token.is_stop || token.is_punct || !filter.allows(token.pos) {
                continue;
            }
            let count = counts.entry(token.lemma.clone()).or_insert(0);
            if *count == 0 {
                order.push(token.lemma);
            }
            *count += 1;
        }

        let mut entries: Vec<KeywordEntry> = order
            .into_iter()
            .map(|term| {
                let count = counts[&term];
                KeywordEntry { term, count }
            })
            .collect();

        // Stable sort keeps first-seen order among equal counts
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(top_n);
        entries
    }
}
