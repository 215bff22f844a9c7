//! Stop-word sets.
//!
//! [`DEFAULT_STOP_WORDS`] is the generic English list that ships with the
//! Python `wordcloud` package, compiled into a perfect-hash set. Entries keep
//! their apostrophes, so contractions only match if a caller-supplied set
//! spells them without one (normalized tokens never contain punctuation).

use std::collections::HashSet;

pub static DEFAULT_STOP_WORDS: phf::Set<&'static str> = phf::phf_set! {
    "a", "about", "above", "after", "again", "against", "all", "also", "am",
    "an", "and", "any", "are", "aren't", "as", "at", "be", "because", "been",
    "before", "being", "below", "between", "both", "but", "by", "can",
    "can't", "cannot", "com", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "else",
    "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has",
    "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's",
    "hence", "her", "here", "here's", "hers", "herself", "him", "himself",
    "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
    "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my",
    "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over",
    "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's",
    "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "therefore", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've",
    "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll",
    "you're", "you've", "your", "yours", "yourself", "yourselves",
};

/// A set of tokens excluded from frequency analysis.
///
/// Membership is exact and case-sensitive; callers compare already-lowercased
/// tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// A set with no members; every long-enough token survives.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in English list.
    pub fn english() -> Self {
        DEFAULT_STOP_WORDS.iter().copied().collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_subset(&self, other: &StopWords) -> bool {
        self.words.is_subset(&other.words)
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for StopWords {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.words.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_has_common_words() {
        let sw = StopWords::english();
        assert_eq!(sw.len(), DEFAULT_STOP_WORDS.len());
        for w in ["the", "and", "with", "http", "www"] {
            assert!(sw.contains(w), "{w} should be a stop word");
        }
        assert!(!sw.contains("error"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let sw = StopWords::english();
        assert!(!sw.contains("The"));
    }

    #[test]
    fn extend_adds_words() {
        let mut sw = StopWords::empty();
        sw.extend(["pod", "node"]);
        assert!(sw.contains("pod"));
        assert!(StopWords::from_iter(["pod"]).is_subset(&sw));
    }
}
