// Latent semantic analysis over transcript chunks: TF-IDF weighting
// followed by a truncated SVD, with the top terms per component.
pub mod svd;
pub mod vectorizer;

pub use vectorizer::{TfidfMatrix, TfidfVectorizer};

use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Terms reported per topic.
pub const TERMS_PER_TOPIC: usize = 15;

/// One term of a topic with its component weight.
#[derive(Debug, Clone, Serialize)]
pub struct TopicTerm {
    pub term: String,
    pub weight: f64,
}

/// One extracted topic.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub index: usize,
    pub terms: Vec<TopicTerm>,
}

/// Result of a topic decomposition.
///
/// `doc_topic` is each document's projection onto the extracted topics:
/// one row per input document, in input order, one column per effective
/// topic. Entries are signed linear weights, not probabilities.
/// `warning` is set instead of an error for inputs the decomposition
/// cannot work with (no documents, or a vocabulary emptied by pruning);
/// the rest of the pipeline proceeds regardless.
#[derive(Debug, Clone, Serialize)]
pub struct TopicModel {
    pub topics: Vec<Topic>,
    pub doc_topic: Vec<Vec<f64>>,
    pub requested_topics: usize,
    pub effective_topics: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TopicModel {
    fn degenerate(requested_topics: usize, warning: String) -> Self {
        Self {
            topics: Vec::new(),
            doc_topic: Vec::new(),
            requested_topics,
            effective_topics: 0,
            warning: Some(warning),
        }
    }
}

/// Decompose `docs` into at most `n_topics` topics.
///
/// The effective topic count is `min(n_topics, n_docs, n_features)` with
/// a floor of one. Each topic lists its top terms by signed component
/// weight, descending, and the returned model carries the projection of
/// every document onto the extracted components.
pub fn decompose(docs: &[String], n_topics: usize) -> TopicModel {
    if docs.is_empty() || docs.iter().all(|d| d.trim().is_empty()) {
        return TopicModel::degenerate(n_topics, "no documents to analyze".to_string());
    }

    let tfidf = match TfidfVectorizer::new().fit_transform(docs) {
        Ok(tfidf) => tfidf,
        Err(e) => {
            warn!("Topic extraction fell back to empty result: {}", e);
            return TopicModel::degenerate(n_topics, e.to_string());
        }
    };

    let n_features = tfidf.feature_names.len();
    let effective = n_topics.min(docs.len()).min(n_features).max(1);
    debug!(
        "Decomposing {} documents x {} features into {} topics",
        docs.len(),
        n_features,
        effective
    );

    let v = svd::right_singular_vectors(&tfidf.matrix, effective);

    // Projecting the TF-IDF rows onto the component basis gives each
    // document's coordinates in topic space, rows in document order.
    let doc_topic: Vec<Vec<f64>> = tfidf
        .matrix
        .dot(&v)
        .outer_iter()
        .map(|row| row.to_vec())
        .collect();

    let topics = (0..effective)
        .map(|t| {
            let mut weighted: Vec<(usize, f64)> =
                (0..n_features).map(|j| (j, v[[j, t]])).collect();
            weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            let terms = weighted
                .into_iter()
                .take(TERMS_PER_TOPIC)
                .map(|(j, weight)| TopicTerm {
                    term: tfidf.feature_names[j].clone(),
                    weight,
                })
                .collect();
            Topic { index: t, terms }
        })
        .collect();

    TopicModel {
        topics,
        doc_topic,
        requested_topics: n_topics,
        effective_topics: effective,
        warning: None,
    }
}
