//! Frequency analyzer: counts words or n-gram phrases across a batch of
//! log messages.
//!
//! Every message is normalized, then filtered (minimum length, stop words),
//! and only then windowed into phrases. Filtered words therefore never appear
//! inside a phrase and the words on either side of them may end up adjacent.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::error::ConfigurationError;
use crate::normalizer;
use crate::stopwords::StopWords;

/// Tokens must be strictly longer than this many characters.
pub const MAX_SHORT_WORD_CHARS: usize = 2;

pub const DEFAULT_NGRAM_SIZE: usize = 2;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What the analyzer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Single tokens.
    Words,
    /// Contiguous windows of `ngram_size` tokens joined by a space.
    Phrases { ngram_size: NonZeroUsize },
}

impl AnalysisMode {
    /// Phrase mode, rejecting window sizes below one.
    pub fn phrases(ngram_size: i64) -> Result<Self, ConfigurationError> {
        usize::try_from(ngram_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(|ngram_size| AnalysisMode::Phrases { ngram_size })
            .ok_or(ConfigurationError::NgramSize(ngram_size))
    }

    /// Parse a mode name (`word`/`words` or `phrase`/`phrases`).
    ///
    /// `ngram_size` is only validated in phrase mode.
    pub fn parse(mode: &str, ngram_size: i64) -> Result<Self, ConfigurationError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "word" | "words" => Ok(AnalysisMode::Words),
            "phrase" | "phrases" => Self::phrases(ngram_size),
            other => Err(ConfigurationError::UnsupportedMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMode::Words => write!(f, "word"),
            AnalysisMode::Phrases { ngram_size } => write!(f, "phrase({ngram_size})"),
        }
    }
}

/// Everything the analyzer needs, passed explicitly to [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    pub stop_words: StopWords,
}

impl AnalysisConfig {
    pub fn new(mode: AnalysisMode, stop_words: StopWords) -> Self {
        Self { mode, stop_words }
    }

    /// Word mode with the built-in English stop words.
    pub fn words() -> Self {
        Self::new(AnalysisMode::Words, StopWords::english())
    }

    /// Build from the `[analysis]` config section.
    ///
    /// `stop_words`, when present, replaces the built-in list;
    /// `extra_stop_words` is added on top of whichever list is in effect.
    pub fn from_settings(
        settings: &crate::config::AnalysisSettings,
    ) -> Result<Self, ConfigurationError> {
        let mode = AnalysisMode::parse(&settings.mode, settings.ngram_size)?;
        let mut stop_words = match &settings.stop_words {
            Some(words) => words.iter().cloned().collect(),
            None => StopWords::english(),
        };
        stop_words.extend(settings.extra_stop_words.iter().cloned());
        Ok(Self::new(mode, stop_words))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::words()
    }
}

// ---------------------------------------------------------------------------
// FrequencyTable
// ---------------------------------------------------------------------------

/// Occurrence counts of tokens or phrases, aggregated over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn add(&mut self, key: impl Into<String>, count: u64) {
        *self.counts.entry(key.into()).or_insert(0) += count;
    }

    /// Count for `key`, zero when absent.
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Sum `other` into `self` key by key.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (key, count) in other.iter() {
            self.add(key, count);
        }
    }

    /// All entries, most frequent first; equal counts are ordered by key so
    /// the ranking is deterministic.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
        entries
    }

    /// The `n` highest-ranked entries.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (key, count) in iter {
            table.add(key, count);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Keep words longer than [`MAX_SHORT_WORD_CHARS`] that are not stop words,
/// in their original order.
pub fn filter_tokens(words: Vec<String>, stop_words: &StopWords) -> Vec<String> {
    words
        .into_iter()
        .filter(|w| w.chars().count() > MAX_SHORT_WORD_CHARS && !stop_words.contains(w))
        .collect()
}

/// Normalize and filter one message.
pub fn tokens(message: &str, stop_words: &StopWords) -> Vec<String> {
    filter_tokens(normalizer::normalize(message), stop_words)
}

/// Every contiguous window of `n` tokens, joined by a single space.
///
/// Yields `max(0, len - n + 1)` phrases.
pub fn phrases(tokens: &[String], n: NonZeroUsize) -> impl Iterator<Item = String> + '_ {
    tokens.windows(n.get()).map(|window| window.join(" "))
}

/// Count tokens or phrases across all `messages`.
pub fn analyze<S: AsRef<str>>(messages: &[S], config: &AnalysisConfig) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for message in messages {
        let words = tokens(message.as_ref(), &config.stop_words);
        match config.mode {
            AnalysisMode::Words => {
                for word in words {
                    table.increment(word);
                }
            }
            AnalysisMode::Phrases { ngram_size } => {
                for phrase in phrases(&words, ngram_size) {
                    table.increment(phrase);
                }
            }
        }
    }
    tracing::debug!(
        mode = %config.mode,
        messages = messages.len(),
        distinct = table.len(),
        total = table.total(),
        "frequency analysis complete"
    );
    table
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    fn table(pairs: &[(&str, u64)]) -> FrequencyTable {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    const DISK: &[&str] = &["Error: disk FULL 123", "error disk full"];

    #[test]
    fn word_mode_example() {
        let config = AnalysisConfig::new(AnalysisMode::Words, StopWords::empty());
        assert_eq!(
            analyze(DISK, &config),
            table(&[("error", 2), ("disk", 2), ("full", 2)])
        );
    }

    #[test]
    fn phrase_mode_example() {
        let config = AnalysisConfig::new(AnalysisMode::phrases(2).unwrap(), StopWords::empty());
        assert_eq!(
            analyze(DISK, &config),
            table(&[("error disk", 2), ("disk full", 2)])
        );
    }

    #[test]
    fn repeats_within_a_message_count_separately() {
        let config = AnalysisConfig::new(AnalysisMode::Words, StopWords::empty());
        let t = analyze(&["retry retry retry"], &config);
        assert_eq!(t.get("retry"), 3);
    }

    #[test]
    fn short_words_are_dropped() {
        let config = AnalysisConfig::new(AnalysisMode::Words, StopWords::empty());
        let t = analyze(&["an ox ate hay"], &config);
        assert_eq!(t, table(&[("ate", 1), ("hay", 1)]));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // "éé" is four bytes but two characters.
        assert!(tokens("éé ééé", &StopWords::empty()) == vec!["ééé".to_string()]);
    }

    #[test]
    fn stop_words_are_dropped_and_bridged() {
        let config = AnalysisConfig::new(AnalysisMode::phrases(2).unwrap(), StopWords::english());
        let t = analyze(&["connection to the database was refused"], &config);
        assert_eq!(
            t,
            table(&[("connection database", 1), ("database refused", 1)])
        );
    }

    #[test]
    fn message_shorter_than_window_contributes_nothing() {
        let config = AnalysisConfig::new(AnalysisMode::phrases(3).unwrap(), StopWords::empty());
        assert!(analyze(&["disk full"], &config).is_empty());
    }

    #[test]
    fn phrase_count_matches_window_formula() {
        let words: Vec<String> = ["one", "two", "six", "ten", "red"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for size in 1..=7 {
            let expected = (words.len() + 1).saturating_sub(size);
            assert_eq!(phrases(&words, n(size)).count(), expected, "n = {size}");
        }
    }

    #[test]
    fn phrases_do_not_cross_messages() {
        let config = AnalysisConfig::new(AnalysisMode::phrases(2).unwrap(), StopWords::empty());
        let t = analyze(&["alpha", "beta"], &config);
        assert!(t.is_empty());
    }

    #[test]
    fn zero_or_negative_ngram_size_is_rejected() {
        assert_eq!(AnalysisMode::phrases(0), Err(ConfigurationError::NgramSize(0)));
        assert_eq!(AnalysisMode::phrases(-3), Err(ConfigurationError::NgramSize(-3)));
        assert_eq!(
            AnalysisMode::parse("phrase", 0),
            Err(ConfigurationError::NgramSize(0))
        );
    }

    #[test]
    fn word_mode_ignores_ngram_size() {
        assert_eq!(AnalysisMode::parse("Word", 0), Ok(AnalysisMode::Words));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert_eq!(
            AnalysisMode::parse("sentences", 2),
            Err(ConfigurationError::UnsupportedMode("sentences".into()))
        );
    }

    #[test]
    fn ranked_orders_by_count_then_key() {
        let t = table(&[("beta", 2), ("alpha", 2), ("gamma", 5), ("delta", 1)]);
        assert_eq!(
            t.ranked(),
            vec![("gamma", 5), ("alpha", 2), ("beta", 2), ("delta", 1)]
        );
        assert_eq!(t.top(2), vec![("gamma", 5), ("alpha", 2)]);
        assert_eq!(t.total(), 10);
    }

    #[test]
    fn merge_sums_by_key() {
        let mut a = table(&[("disk", 1), ("full", 2)]);
        a.merge(&table(&[("disk", 3), ("error", 1)]));
        assert_eq!(a, table(&[("disk", 4), ("full", 2), ("error", 1)]));
    }

    #[test]
    fn settings_replace_and_extend_stop_words() {
        let settings = crate::config::AnalysisSettings {
            mode: "phrase".into(),
            ngram_size: 3,
            stop_words: Some(vec!["pod".into()]),
            extra_stop_words: vec!["node".into()],
        };
        let config = AnalysisConfig::from_settings(&settings).unwrap();
        assert_eq!(config.mode, AnalysisMode::phrases(3).unwrap());
        assert!(config.stop_words.contains("pod"));
        assert!(config.stop_words.contains("node"));
        assert!(!config.stop_words.contains("the"));
    }
}
