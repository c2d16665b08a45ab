//! Language model seam: tokenization, part-of-speech tags and lemmas
//!
//! Analysis code depends on the [`LanguageModel`] trait, never on a concrete
//! tagger. [`RuleBasedTagger`] is the shipped English implementation: a
//! lexicon plus suffix rules, tuned for resume and job-posting vocabulary.

use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Adverb,
    Number,
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// Anything that can turn text into annotated tokens
pub trait LanguageModel: Send + Sync {
    fn annotate(&self, text: &str) -> Vec<AnnotatedToken>;
}

pub struct RuleBasedTagger {
    processor: TextProcessor,
    adjectives: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    adverbs: HashSet<&'static str>,
    invariant_nouns: HashSet<&'static str>,
    suffix_exceptions: HashSet<&'static str>,
    irregular_lemmas: HashMap<&'static str, &'static str>,
}

impl Default for RuleBasedTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedTagger {
    pub fn new() -> Self {
        Self {
            processor: TextProcessor::new(),
            adjectives: ADJECTIVES.iter().copied().collect(),
            verbs: VERBS.iter().copied().collect(),
            adverbs: ADVERBS.iter().copied().collect(),
            invariant_nouns: INVARIANT_NOUNS.iter().copied().collect(),
            suffix_exceptions: SUFFIX_EXCEPTIONS.iter().copied().collect(),
            irregular_lemmas: IRREGULAR_LEMMAS.iter().copied().collect(),
        }
    }

    pub fn tag(&self, token: &str) -> PartOfSpeech {
        if TextProcessor::is_punctuation(token) {
            return PartOfSpeech::Punctuation;
        }
        if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == '%') {
            return PartOfSpeech::Number;
        }
        if self.adjectives.contains(token) {
            return PartOfSpeech::Adjective;
        }
        if self.verbs.contains(token) || self.irregular_lemmas.get(token).is_some_and(|l| self.verbs.contains(l)) {
            return PartOfSpeech::Verb;
        }
        if self.adverbs.contains(token) {
            return PartOfSpeech::Adverb;
        }
        if self.invariant_nouns.contains(token) {
            return PartOfSpeech::ProperNoun;
        }
        // Tech tokens such as node.js, c++, k8s or s3
        if !token.chars().all(char::is_alphabetic) {
            return PartOfSpeech::ProperNoun;
        }
        if self.suffix_exceptions.contains(token) {
            return PartOfSpeech::Noun;
        }

        let len = token.chars().count();
        if len > 4 && token.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }
        if len > 5 && token.ends_with("ed") {
            return PartOfSpeech::Verb;
        }
        if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|suffix| token.ends_with(suffix)) {
            return PartOfSpeech::Adjective;
        }
        PartOfSpeech::Noun
    }

    pub fn lemmatize(&self, token: &str, pos: PartOfSpeech) -> String {
        if let Some(lemma) = self.irregular_lemmas.get(token) {
            return (*lemma).to_string();
        }
        match pos {
            PartOfSpeech::Noun => singularize(token),
            PartOfSpeech::Verb => verb_base(token),
            _ => token.to_string(),
        }
    }
}

impl LanguageModel for RuleBasedTagger {
    fn annotate(&self, text: &str) -> Vec<AnnotatedToken> {
        self.processor
            .tokenize(text)
            .into_iter()
            .map(|token| {
                let pos = self.tag(token);
                AnnotatedToken {
                    text: token.to_string(),
                    lemma: self.lemmatize(token, pos),
                    pos,
                    is_stop: self.processor.is_stop_word(token),
                    is_punct: pos == PartOfSpeech::Punctuation,
                }
            })
            .collect()
    }
}

fn singularize(word: &str) -> String {
    let len = word.len();
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("sses") || ["ches", "shes", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
        return word[..len - 2].to_string();
    }
    if len > 3 && word.ends_with('s') && !["ss", "us", "is", "os"].iter().any(|s| word.ends_with(s)) {
        return word[..len - 1].to_string();
    }
    word.to_string()
}

fn verb_base(word: &str) -> String {
    let len = word.len();
    if len > 4 && word.ends_with("ied") {
        return format!("{}y", &word[..len - 3]);
    }
    if len > 4 && word.ends_with("ed") {
        let stem = &word[..len - 2];
        // planned -> plan; only ASCII consonants are undoubled
        let mut tail = stem.chars().rev();
        if let (Some(last), Some(prev)) = (tail.next(), tail.next()) {
            if last == prev && is_doubling_consonant(last) {
                return stem[..stem.len() - last.len_utf8()].to_string();
            }
        }
        // managed -> manage, automated -> automate, reduced -> reduce
        if ["at", "ut", "id", "ur", "iz", "is", "g", "v", "c", "u"].iter().any(|s| stem.ends_with(s)) {
            return format!("{}e", stem);
        }
        return stem.to_string();
    }
    if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..len - 1].to_string();
    }
    word.to_string()
}

fn is_doubling_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'l' | 's' | 'z' | 'f')
}

const ADJECTIVE_SUFFIXES: &[&str] = &["able", "ible", "ful", "ical", "ive", "less", "ous", "ish", "ic", "al"];

const ADJECTIVES: &[&str] = &[
    "able", "advanced", "agile", "analytical", "best", "big", "certified", "clear", "complex",
    "current", "dedicated", "detailed", "distributed", "driven", "dynamic", "early", "effective",
    "excellent", "experienced", "expert", "familiar", "fast", "full", "good", "great", "high",
    "junior", "key", "large",
    "latest", "lead", "legacy", "long", "low", "main", "major", "modern", "motivated", "multiple",
    "new", "open", "passionate", "preferred", "principal", "proficient", "proven", "real",
    "related", "relevant", "remote", "required", "responsive", "robust", "scalable", "secure",
    "senior", "skilled", "small", "solid", "strong", "successful", "technical", "top", "various",
];

const VERBS: &[&str] = &[
    "achieve", "analyze", "apply", "automate", "build", "collaborate", "communicate", "contribute",
    "coordinate", "create", "define", "deliver", "deploy", "develop", "drive", "enable", "ensure",
    "establish", "implement", "improve", "join", "lead", "maintain", "manage", "migrate",
    "participate", "provide", "reduce", "seek", "troubleshoot", "write",
];

const ADVERBS: &[&str] = &["ago", "always", "closely", "currently", "never", "preferably", "soon", "together"];

/// Tool and platform names that must not be singularized or suffix-tagged
const INVARIANT_NOUNS: &[&str] = &[
    "analytics", "ansible", "aws", "bitbucket", "docker", "elasticsearch", "express", "graphql",
    "jenkins", "jira", "kafka", "kubernetes", "mongodb", "mysql", "postgres", "postgresql",
    "redis", "terraform",
];

/// Words whose spelling looks adjectival or adverbial but that are nouns here
const SUFFIX_EXCEPTIONS: &[&str] = &[
    "anomaly", "archive", "assembly", "capital", "clinic", "credential", "executive", "family",
    "graphic", "hospital", "hundred", "incentive", "individual", "initiative", "interval",
    "journal", "logic", "manual", "material", "mechanic", "metric", "music", "narrative",
    "objective", "portal", "proposal", "rental", "representative", "signal",
    "supply", "terminal", "topic", "traffic", "tutorial",
];

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("bought", "buy"),
    ("built", "build"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("drove", "drive"),
    ("grew", "grow"),
    ("led", "lead"),
    ("made", "make"),
    ("men", "man"),
    ("people", "person"),
    ("ran", "run"),
    ("taught", "teach"),
    ("took", "take"),
    ("women", "woman"),
    ("wrote", "write"),
];
