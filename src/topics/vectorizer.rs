use crate::error::{AudiogistError, Result};
use crate::text::stopwords;
use ndarray::Array2;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Tokens are runs of two or more word characters.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("invalid token regex"));

/// TF-IDF document-term matrix with its feature names.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Row-normalized (L2) TF-IDF values, one row per document.
    pub matrix: Array2<f64>,
    /// Feature names in column order (alphabetical).
    pub feature_names: Vec<String>,
}

/// TF-IDF vectorizer over a small in-memory corpus.
///
/// Document frequency pruning follows the usual conventions: `min_df` is
/// an absolute document count, `max_df` a fraction of the corpus (a term
/// is kept when `df <= max_df * n_docs`, unrounded). When the corpus is a
/// single document the default `max_df` of 0.95 prunes every term; the
/// caller treats the resulting error as a recoverable degenerate input.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    min_df: usize,
    max_df: f64,
    max_features: usize,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self {
            min_df: 1,
            max_df: 0.95,
            max_features: 2000,
        }
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Build the TF-IDF matrix for `docs`.
    ///
    /// IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) and each row is
    /// L2-normalized. Errors when no documents are given or when pruning
    /// leaves an empty vocabulary.
    pub fn fit_transform(&self, docs: &[String]) -> Result<TfidfMatrix> {
        let n_docs = docs.len();
        if n_docs == 0 {
            return Err(AudiogistError::TopicExtraction(
                "no documents to vectorize".to_string(),
            ));
        }

        let doc_counts: Vec<HashMap<String, usize>> = docs
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for token in tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut df: HashMap<&str, usize> = HashMap::new();
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, &count) in counts {
                *df.entry(term).or_insert(0) += 1;
                *corpus_freq.entry(term).or_insert(0) += count;
            }
        }

        // Document-frequency pruning.
        let max_doc_count = self.max_df * n_docs as f64;
        let mut kept: Vec<&str> = df
            .iter()
            .filter(|&(_, &d)| d >= self.min_df && d as f64 <= max_doc_count)
            .map(|(&term, _)| term)
            .collect();
        kept.sort_unstable();

        // Frequency cap: keep the most frequent terms, ties alphabetical.
        if kept.len() > self.max_features {
            kept.sort_by(|a, b| corpus_freq[*b].cmp(&corpus_freq[*a]).then(a.cmp(b)));
            kept.truncate(self.max_features);
            kept.sort_unstable();
        }

        if kept.is_empty() {
            return Err(AudiogistError::TopicExtraction(
                "no terms remain after pruning; input is too short or too uniform".to_string(),
            ));
        }

        let vocab: HashMap<&str, usize> = kept
            .iter()
            .enumerate()
            .map(|(j, &term)| (term, j))
            .collect();

        let mut matrix = Array2::zeros((n_docs, kept.len()));
        for (i, counts) in doc_counts.iter().enumerate() {
            for (term, &count) in counts {
                if let Some(&j) = vocab.get(term.as_str()) {
                    matrix[[i, j]] = count as f64;
                }
            }
        }

        for (j, term) in kept.iter().enumerate() {
            let idf = ((1.0 + n_docs as f64) / (1.0 + df[term] as f64)).ln() + 1.0;
            matrix.column_mut(j).mapv_inplace(|v| v * idf);
        }

        for mut row in matrix.rows_mut() {
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        Ok(TfidfMatrix {
            matrix,
            feature_names: kept.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !stopwords::english().contains(t.as_str()))
        .collect()
}
