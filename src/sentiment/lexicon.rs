//! Lexicon-based polarity and subjectivity scoring.
//!
//! The analyzer is fully embedded: a word table maps vocabulary to a
//! (polarity, subjectivity) pair, polarity in [-1, 1] and subjectivity in
//! [0, 1]. Scores for a span of text are the arithmetic means over the
//! words that matched the table; text with no matching vocabulary scores
//! (0.0, 0.0). A negation marker directly before a matched word flips and
//! damps its polarity.

use crate::text::stopwords;
use std::collections::HashMap;

/// Polarity multiplier applied to a word preceded by a negation marker.
const NEGATION_DAMP: f64 = -0.5;

/// Word table entries: (word, polarity, subjectivity).
static ENTRIES: &[(&str, f64, f64)] = &[
    // strongly positive
    ("excellent", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("perfect", 1.0, 1.0),
    ("superb", 0.9, 0.9),
    ("brilliant", 0.9, 0.9),
    ("outstanding", 0.9, 0.9),
    ("amazing", 0.8, 0.9),
    ("delightful", 0.8, 0.9),
    ("love", 0.8, 0.7),
    ("loved", 0.8, 0.7),
    ("loves", 0.8, 0.7),
    // positive
    ("great", 0.7, 0.8),
    ("fantastic", 0.7, 0.9),
    ("awesome", 0.7, 0.9),
    ("impressive", 0.6, 0.8),
    ("beautiful", 0.7, 0.8),
    ("happy", 0.6, 0.8),
    ("joy", 0.6, 0.8),
    ("thrilled", 0.7, 0.9),
    ("excited", 0.6, 0.8),
    ("exciting", 0.6, 0.8),
    ("enjoy", 0.5, 0.6),
    ("enjoyed", 0.5, 0.6),
    ("best", 0.6, 0.6),
    ("better", 0.4, 0.5),
    ("good", 0.5, 0.6),
    ("nice", 0.5, 0.7),
    ("pleased", 0.5, 0.7),
    ("glad", 0.5, 0.7),
    ("liked", 0.5, 0.6),
    ("likes", 0.5, 0.6),
    ("helpful", 0.5, 0.5),
    ("useful", 0.4, 0.4),
    ("smooth", 0.4, 0.5),
    ("reliable", 0.4, 0.4),
    ("clear", 0.3, 0.4),
    ("comfortable", 0.4, 0.5),
    ("friendly", 0.4, 0.5),
    ("recommend", 0.4, 0.5),
    ("recommended", 0.4, 0.5),
    ("improved", 0.4, 0.4),
    ("improvement", 0.3, 0.4),
    ("positive", 0.4, 0.5),
    ("win", 0.4, 0.5),
    ("success", 0.5, 0.5),
    ("successful", 0.5, 0.5),
    ("effective", 0.4, 0.4),
    ("satisfied", 0.5, 0.6),
    ("agree", 0.3, 0.5),
    ("thanks", 0.4, 0.5),
    ("thank", 0.4, 0.5),
    ("welcome", 0.3, 0.4),
    // mildly positive
    ("fine", 0.2, 0.4),
    ("okay", 0.2, 0.5),
    ("ok", 0.2, 0.5),
    ("decent", 0.2, 0.4),
    ("fair", 0.2, 0.5),
    ("acceptable", 0.2, 0.4),
    ("interesting", 0.3, 0.5),
    ("solid", 0.3, 0.4),
    ("works", 0.2, 0.3),
    ("worked", 0.2, 0.3),
    // strongly negative
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("disgusting", -0.9, 1.0),
    ("dreadful", -0.9, 1.0),
    ("atrocious", -0.9, 1.0),
    ("worst", -0.9, 0.9),
    ("hate", -0.8, 0.9),
    ("hated", -0.8, 0.9),
    ("hates", -0.8, 0.9),
    ("disaster", -0.8, 0.8),
    ("catastrophic", -0.8, 0.8),
    // negative
    ("bad", -0.7, 0.7),
    ("poor", -0.6, 0.6),
    ("nasty", -0.6, 0.8),
    ("painful", -0.6, 0.7),
    ("angry", -0.6, 0.8),
    ("furious", -0.7, 0.9),
    ("broken", -0.6, 0.5),
    ("useless", -0.6, 0.7),
    ("failure", -0.6, 0.6),
    ("failed", -0.5, 0.5),
    ("fails", -0.5, 0.5),
    ("disappointing", -0.6, 0.8),
    ("disappointed", -0.6, 0.8),
    ("sad", -0.5, 0.8),
    ("unhappy", -0.5, 0.8),
    ("upset", -0.5, 0.8),
    ("annoying", -0.5, 0.7),
    ("annoyed", -0.5, 0.7),
    ("frustrating", -0.5, 0.7),
    ("frustrated", -0.5, 0.7),
    ("confusing", -0.4, 0.6),
    ("confused", -0.4, 0.6),
    ("slow", -0.4, 0.4),
    ("expensive", -0.4, 0.5),
    ("problem", -0.4, 0.3),
    ("problems", -0.4, 0.3),
    ("issue", -0.3, 0.3),
    ("issues", -0.3, 0.3),
    ("bug", -0.4, 0.3),
    ("buggy", -0.5, 0.5),
    ("crash", -0.5, 0.4),
    ("crashes", -0.5, 0.4),
    ("crashed", -0.5, 0.4),
    ("error", -0.4, 0.3),
    ("errors", -0.4, 0.3),
    ("wrong", -0.5, 0.5),
    ("difficult", -0.4, 0.5),
    ("negative", -0.4, 0.5),
    ("worse", -0.5, 0.5),
    ("concern", -0.3, 0.4),
    ("concerned", -0.3, 0.4),
    ("complaint", -0.4, 0.5),
    ("complain", -0.4, 0.5),
    ("disagree", -0.3, 0.5),
    ("sorry", -0.2, 0.4),
    // mildly negative
    ("mediocre", -0.3, 0.6),
    ("dull", -0.3, 0.6),
    ("boring", -0.3, 0.7),
    ("weak", -0.3, 0.5),
    ("minor", -0.2, 0.3),
    ("slight", -0.2, 0.3),
    ("unclear", -0.2, 0.4),
    ("odd", -0.2, 0.5),
    ("strange", -0.2, 0.5),
    ("noisy", -0.3, 0.5),
];

/// Polarity and subjectivity of a span of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub polarity: f64,
    pub subjectivity: f64,
}

impl Assessment {
    pub const NEUTRAL: Assessment = Assessment {
        polarity: 0.0,
        subjectivity: 0.0,
    };
}

/// Lexicon-based sentiment analyzer.
#[derive(Debug)]
pub struct LexiconAnalyzer {
    lexicon: HashMap<&'static str, (f64, f64)>,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: ENTRIES.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
        }
    }

    /// Score one span of text.
    ///
    /// Tokenizes on whitespace and punctuation (apostrophes removed first
    /// so contractions keep their negation form), averages the table
    /// values of matched words, and applies the negation flip when the
    /// preceding token is a negation marker. No matches yields the
    /// neutral assessment.
    pub fn assess(&self, text: &str) -> Assessment {
        let lowered = text.to_lowercase().replace('\'', "");
        let tokens: Vec<&str> = lowered
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .filter(|s| !s.is_empty())
            .collect();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            if let Some(&(polarity, subjectivity)) = self.lexicon.get(token) {
                let negated = i > 0 && stopwords::is_negation(tokens[i - 1]);
                polarity_sum += if negated {
                    polarity * NEGATION_DAMP
                } else {
                    polarity
                };
                subjectivity_sum += subjectivity;
                matched += 1;
            }
        }

        if matched == 0 {
            return Assessment::NEUTRAL;
        }

        Assessment {
            polarity: polarity_sum / matched as f64,
            subjectivity: subjectivity_sum / matched as f64,
        }
    }

    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
