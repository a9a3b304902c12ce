use crate::text::stopwords;
use regex::Regex;
use std::sync::LazyLock;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]]").expect("invalid punctuation regex"));

static STANDALONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("invalid digit regex"));

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z\s]").expect("invalid non-alpha regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Normalize cleaned transcript text for the analysis stages.
///
/// Passes run in a fixed order: lowercase, strip punctuation, drop
/// standalone digit runs, drop any remaining non-alphabetic characters,
/// collapse whitespace, then drop stopwords and single-character tokens.
/// Negation words are not treated as stopwords here, so "not", "no", and
/// the "nt" contraction family survive for the sentiment stage.
///
/// Digits embedded in words lose only their digit characters ("abc123"
/// becomes "abc"), while standalone runs vanish entirely.
pub fn normalize(text: &str) -> String {
    let text = text.to_lowercase();
    let text = PUNCTUATION.replace_all(&text, "");
    let text = STANDALONE_DIGITS.replace_all(&text, "");
    let text = NON_ALPHA.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");

    let keep = stopwords::sentiment_aware();
    text.trim()
        .split(' ')
        .filter(|t| t.len() > 1 && !keep.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}
