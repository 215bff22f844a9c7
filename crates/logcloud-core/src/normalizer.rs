//! Text normalizer: cleans one log message into a sequence of candidate words.
//!
//! The steps run in a fixed order: strip punctuation and symbols, lowercase,
//! strip digit runs, split on whitespace. No filtering happens here; that is
//! the analyzer's job, so the same normalized words can serve any filter
//! configuration.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is neither a word character nor whitespace.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Strip punctuation, lowercase, and strip digits, without splitting.
pub fn clean(text: &str) -> String {
    let stripped = NON_WORD.replace_all(text, "");
    let lowered = stripped.to_lowercase();
    DIGITS.replace_all(&lowered, "").into_owned()
}

/// Clean a message and split it into its ordered word sequence.
pub fn normalize(text: &str) -> Vec<String> {
    clean(text).split_whitespace().map(str::to_string).collect()
}
