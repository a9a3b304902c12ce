//! Reference-based summary scoring: sentence BLEU and ROUGE F1.
//!
//! Both metrics tokenize by casefolded word runs, so scores are
//! comparable between runs of this crate but not with externally
//! tokenized implementations. Degenerate inputs score 0.0 (BLEU) or an
//! empty map (ROUGE) instead of erroring.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("invalid word regex"));

const BLEU_MAX_ORDER: usize = 4;

/// Sentence BLEU of `candidate` against `reference`, uniform weights over
/// 1..=4-gram precisions, with the standard brevity penalty. Returns 0.0
/// whenever either side is empty or some n-gram order has no overlap.
pub fn bleu(reference: &str, candidate: &str) -> f64 {
    let reference = tokenize(reference);
    let candidate = tokenize(candidate);
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let weight = 1.0 / BLEU_MAX_ORDER as f64;
    let mut log_sum = 0.0;
    for n in 1..=BLEU_MAX_ORDER {
        let p = modified_precision(&reference, &candidate, n);
        if p == 0.0 {
            return 0.0;
        }
        log_sum += weight * p.ln();
    }

    let brevity_penalty = if candidate.len() < reference.len() {
        (1.0 - reference.len() as f64 / candidate.len() as f64).exp()
    } else {
        1.0
    };

    (brevity_penalty * log_sum.exp()).clamp(0.0, 1.0)
}

/// ROUGE-1, ROUGE-2, and ROUGE-L F1 scores of `candidate` against
/// `reference`, keyed `rouge1`, `rouge2`, `rougeL`. Returns an empty map
/// when either side tokenizes to nothing.
pub fn rouge_f1(reference: &str, candidate: &str) -> BTreeMap<String, f64> {
    let reference = tokenize(reference);
    let candidate = tokenize(candidate);
    if reference.is_empty() || candidate.is_empty() {
        return BTreeMap::new();
    }

    let mut scores = BTreeMap::new();
    scores.insert("rouge1".to_string(), ngram_f1(&reference, &candidate, 1));
    scores.insert("rouge2".to_string(), ngram_f1(&reference, &candidate, 2));
    scores.insert("rougeL".to_string(), lcs_f1(&reference, &candidate));
    scores
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram precision of the candidate against the reference.
fn modified_precision(reference: &[String], candidate: &[String], n: usize) -> f64 {
    if candidate.len() < n {
        return 0.0;
    }
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);

    let mut matched = 0usize;
    let mut total = 0usize;
    for (gram, &count) in &candidate_counts {
        total += count;
        if let Some(&limit) = reference_counts.get(gram) {
            matched += count.min(limit);
        }
    }

    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

fn ngram_f1(reference: &[String], candidate: &[String], n: usize) -> f64 {
    if reference.len() < n || candidate.len() < n {
        return 0.0;
    }
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);

    let overlap: usize = candidate_counts
        .iter()
        .map(|(gram, &count)| {
            reference_counts
                .get(gram)
                .map_or(0, |&limit| count.min(limit))
        })
        .sum();

    let recall_denom = reference.len() - n + 1;
    let precision_denom = candidate.len() - n + 1;
    f1(
        overlap as f64 / precision_denom as f64,
        overlap as f64 / recall_denom as f64,
    )
}

fn lcs_f1(reference: &[String], candidate: &[String]) -> f64 {
    let lcs = lcs_length(reference, candidate) as f64;
    f1(lcs / candidate.len() as f64, lcs / reference.len() as f64)
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for item_a in a {
        for (j, item_b) in b.iter().enumerate() {
            current[j + 1] = if item_a == item_b {
                prev[j] + 1
            } else {
                prev[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
