// Document-level sentiment: chunked polarity/subjectivity, aspect scores,
// and optional emotion classification.
pub mod emotion;
pub mod lexicon;

pub use emotion::{EmotionClassifier, HfEmotionClient};
pub use lexicon::{Assessment, LexiconAnalyzer};

use crate::text::chunk;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("invalid sentence regex"));

/// Document-level sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    /// Classify a mean polarity against the neutral band. Comparisons are
    /// strict: a mean exactly at the threshold stays neutral.
    pub fn from_mean(mean: f64, threshold: f64) -> Self {
        if mean > threshold {
            Label::Positive
        } else if mean < -threshold {
            Label::Negative
        } else {
            Label::Neutral
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// Aggregated document sentiment.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub polarity: f64,
    pub subjectivity: f64,
    pub label: Label,
    pub chunk_count: usize,
}

/// Score a document by chunking it and averaging per-chunk assessments.
///
/// Polarity and subjectivity are arithmetic means over all chunks, in
/// chunk order. Empty text produces a neutral result with zero chunks.
pub fn score_document(
    analyzer: &LexiconAnalyzer,
    text: &str,
    chunk_size: usize,
    threshold: f64,
) -> SentimentResult {
    let chunks = chunk(text, chunk_size);
    if chunks.is_empty() {
        return SentimentResult {
            polarity: 0.0,
            subjectivity: 0.0,
            label: Label::Neutral,
            chunk_count: 0,
        };
    }

    let mut polarity_sum = 0.0;
    let mut subjectivity_sum = 0.0;
    for piece in &chunks {
        let assessment = analyzer.assess(piece);
        polarity_sum += assessment.polarity;
        subjectivity_sum += assessment.subjectivity;
    }

    let n = chunks.len() as f64;
    let polarity = polarity_sum / n;
    SentimentResult {
        polarity,
        subjectivity: subjectivity_sum / n,
        label: Label::from_mean(polarity, threshold),
        chunk_count: chunks.len(),
    }
}

/// Per-aspect polarity over the sentences that mention each aspect.
///
/// Sentences are split on runs of `.`, `!`, `?`. Matching is
/// case-insensitive substring containment. Every requested aspect gets an
/// entry; aspects mentioned nowhere score 0.0. Duplicate aspects collapse
/// to a single entry. Empty text yields an empty map, not zero-valued
/// entries.
pub fn aspect_scores(
    analyzer: &LexiconAnalyzer,
    text: &str,
    aspects: &[String],
) -> BTreeMap<String, f64> {
    if text.is_empty() {
        return BTreeMap::new();
    }

    let sentences = split_sentences(text);
    let mut scores = BTreeMap::new();

    for aspect in aspects {
        let needle = aspect.to_lowercase();
        let mut sum = 0.0;
        let mut matched = 0usize;
        for sentence in &sentences {
            if sentence.to_lowercase().contains(&needle) {
                sum += analyzer.assess(sentence).polarity;
                matched += 1;
            }
        }
        let value = if matched == 0 { 0.0 } else { sum / matched as f64 };
        scores.insert(aspect.clone(), value);
    }

    scores
}

/// Parse a comma-separated aspect list as entered on the command line
/// or in the wizard. Entries are trimmed and empties dropped.
pub fn parse_aspects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-label emotion scores averaged across chunks.
///
/// Labels are unioned across chunks; each label's score is the mean over
/// the chunks that reported that label, not over all chunks. A missing
/// classifier yields an empty map; a chunk whose classification call
/// fails is skipped with a warning and the rest still aggregate.
pub async fn emotion_scores(
    classifier: Option<&dyn EmotionClassifier>,
    text: &str,
    chunk_size: usize,
) -> BTreeMap<String, f64> {
    let Some(classifier) = classifier else {
        warn!("Emotion model unavailable; returning no emotion scores");
        return BTreeMap::new();
    };

    let chunks = chunk(text, chunk_size);
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for (i, piece) in chunks.iter().enumerate() {
        match classifier.classify(piece).await {
            Ok(scores) => {
                for (label, score) in scores {
                    let entry = sums.entry(label).or_insert((0.0, 0));
                    entry.0 += score;
                    entry.1 += 1;
                }
            }
            Err(e) => {
                warn!("Emotion classification failed for chunk {}: {}", i + 1, e);
            }
        }
    }

    sums.into_iter()
        .map(|(label, (sum, n))| (label, sum / n as f64))
        .collect()
}

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
