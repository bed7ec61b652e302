//! Word normalization and term-frequency vectors.

use std::collections::BTreeMap;

/// Common English function words, excluded from term vectors when stop-word
/// filtering is enabled.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing",
    "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off",
    "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "would", "you", "your", "yours", "yourself", "yourselves",
    "dont", "im", "youre", "thats", "ive", "id", "well", "yeah", "okay",
    "um", "uh", "like", "gonna", "got", "get", "going", "really", "know", "right",
];

/// Lowercase a word and strip everything but letters and digits.
///
/// Returns `None` when nothing is left (pure punctuation).
pub fn normalize_token(word: &str) -> Option<String> {
    let token: String = word
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect();
    (!token.is_empty()).then_some(token)
}

pub fn is_stop_word(token: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&token)
}

/// Term frequencies of a run of words.
///
/// Terms are kept in a sorted map so every sum over the vector runs in the
/// same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    counts: BTreeMap<String, u32>,
}

impl TermVector {
    /// Build a vector from raw words.
    pub fn from_words<'a, I>(words: I, filter_stop_words: bool) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = BTreeMap::new();
        for token in words.into_iter().filter_map(normalize_token) {
            if filter_stop_words && is_stop_word(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Pool several vectors into one.
    pub fn sum<'a, I>(vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a TermVector>,
    {
        let mut pooled = Self::default();
        for vector in vectors {
            pooled.add(vector);
        }
        pooled
    }

    pub fn add(&mut self, other: &TermVector) {
        for (term, count) in &other.counts {
            *self.counts.entry(term.clone()).or_insert(0) += count;
        }
    }

    /// Number of distinct terms.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    fn squared_norm(&self) -> f64 {
        self.counts
            .values()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum()
    }

    /// Cosine similarity in `[0, 1]`; `0` when either side is empty.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        let dot: f64 = self
            .counts
            .iter()
            .map(|(term, &c)| f64::from(c) * f64::from(other.count(term)))
            .sum();

        (dot / (self.squared_norm() * other.squared_norm()).sqrt()).clamp(0.0, 1.0)
    }

    /// Shared terms over combined terms, in `[0, 1]`; `0` when either side
    /// is empty.
    pub fn jaccard(&self, other: &TermVector) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        let shared = self
            .counts
            .keys()
            .filter(|term| other.counts.contains_key(*term))
            .count();
        let union = self.distinct() + other.distinct() - shared;

        (shared as f64 / union as f64).clamp(0.0, 1.0)
    }
}
