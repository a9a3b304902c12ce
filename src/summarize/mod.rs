// Chunked abstractive summarization and reference scoring.
pub mod remote;
pub mod score;

pub use remote::HfSummaryClient;
pub use score::{bleu, rouge_f1};

use crate::error::Result;
use crate::text::chunk;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

/// Ceiling on the characters handed to the model per chunk. Inherited
/// from the summarization backend's input window; truncation at this
/// limit can cut a word short, never a UTF-8 code point.
pub const CHUNK_CHAR_LIMIT: usize = 1024;

/// Trait for summarization backends.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize one chunk of text.
    async fn summarize(&self, text: &str) -> Result<String>;

    /// Human-readable backend name.
    fn name(&self) -> &'static str;
}

/// Outcome of a document summarization.
///
/// An unavailable backend or a failed call yields `Unavailable` with a
/// human-readable reason; the summary text never carries sentinel
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Ready { text: String, chunk_count: usize },
    Unavailable { reason: String },
}

impl SummaryOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, SummaryOutcome::Ready { .. })
    }

    /// Summary text, when one was produced.
    pub fn text(&self) -> Option<&str> {
        match self {
            SummaryOutcome::Ready { text, .. } => Some(text),
            SummaryOutcome::Unavailable { .. } => None,
        }
    }
}

/// Summarize a document chunk by chunk and join the partial summaries.
///
/// The text is chunked by word count, each chunk truncated to
/// [`CHUNK_CHAR_LIMIT`] characters, and the backend is called once per
/// chunk, in order. Sub-summaries are joined with single spaces. Empty
/// text is a `Ready` empty summary; a missing backend or any failed call
/// is `Unavailable`.
pub async fn summarize_document(
    summarizer: Option<&dyn Summarizer>,
    text: &str,
    chunk_size: usize,
) -> SummaryOutcome {
    let Some(summarizer) = summarizer else {
        return SummaryOutcome::Unavailable {
            reason: "summarization model not configured; set an API token to enable summaries"
                .to_string(),
        };
    };

    let chunks = chunk(text, chunk_size);
    if chunks.is_empty() {
        return SummaryOutcome::Ready {
            text: String::new(),
            chunk_count: 0,
        };
    }

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, piece) in chunks.iter().enumerate() {
        let input = truncate_to_limit(piece);
        debug!(
            "Summarizing chunk {}/{} ({} chars)",
            i + 1,
            chunks.len(),
            input.len()
        );
        match summarizer.summarize(input).await {
            Ok(part) => parts.push(part.trim().to_string()),
            Err(e) => {
                warn!("Summarization failed on chunk {}: {}", i + 1, e);
                return SummaryOutcome::Unavailable {
                    reason: format!(
                        "summarization failed on chunk {} of {}: {}",
                        i + 1,
                        chunks.len(),
                        e
                    ),
                };
            }
        }
    }

    SummaryOutcome::Ready {
        text: parts.join(" ").trim().to_string(),
        chunk_count: chunks.len(),
    }
}

fn truncate_to_limit(piece: &str) -> &str {
    if piece.len() <= CHUNK_CHAR_LIMIT {
        return piece;
    }
    let mut end = CHUNK_CHAR_LIMIT;
    while !piece.is_char_boundary(end) {
        end -= 1;
    }
    &piece[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudiogistError;
    use std::sync::Mutex;

    struct MockSummarizer {
        inputs: Mutex<Vec<String>>,
        fail_on_call: Option<usize>,
    }

    impl MockSummarizer {
        fn new() -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn recorded_inputs(&self) -> Vec<String> {
            self.inputs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Summarizer for MockSummarizer {
        async fn summarize(&self, text: &str) -> Result<String> {
            let mut inputs = self.inputs.lock().unwrap();
            let call = inputs.len();
            inputs.push(text.to_string());
            if self.fail_on_call == Some(call) {
                return Err(AudiogistError::Summarization("mock failure".to_string()));
            }
            Ok(format!("S{}", call + 1))
        }

        fn name(&self) -> &'static str {
            "Mock"
        }
    }

    #[tokio::test]
    async fn test_missing_backend_is_unavailable() {
        let outcome = summarize_document(None, "some text to summarize", 200).await;
        match outcome {
            SummaryOutcome::Unavailable { reason } => {
                assert!(reason.contains("not configured"));
            }
            SummaryOutcome::Ready { .. } => panic!("expected unavailable"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_ready_and_empty() {
        let mock = MockSummarizer::new();
        let outcome = summarize_document(Some(&mock), "", 200).await;
        assert_eq!(
            outcome,
            SummaryOutcome::Ready {
                text: String::new(),
                chunk_count: 0
            }
        );
        assert!(mock.recorded_inputs().is_empty());
    }

    #[tokio::test]
    async fn test_sub_summaries_joined_in_order() {
        let mock = MockSummarizer::new();
        let outcome = summarize_document(Some(&mock), "one two three four five six", 2).await;
        assert_eq!(
            outcome,
            SummaryOutcome::Ready {
                text: "S1 S2 S3".to_string(),
                chunk_count: 3
            }
        );
        assert_eq!(
            mock.recorded_inputs(),
            vec!["one two", "three four", "five six"]
        );
    }

    #[tokio::test]
    async fn test_chunk_truncated_to_char_limit() {
        let mock = MockSummarizer::new();
        // A single 2000-character word stays one chunk and gets cut.
        let long_word = "x".repeat(2000);
        let outcome = summarize_document(Some(&mock), &long_word, 512).await;
        assert!(outcome.is_ready());

        let inputs = mock.recorded_inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].len(), CHUNK_CHAR_LIMIT);
    }

    #[tokio::test]
    async fn test_truncation_respects_char_boundaries() {
        let mock = MockSummarizer::new();
        // 'é' is two bytes and straddles the byte limit, so the cut backs
        // off to the previous boundary.
        let word = format!("{}ééé", "a".repeat(CHUNK_CHAR_LIMIT - 1));
        let outcome = summarize_document(Some(&mock), &word, 512).await;
        assert!(outcome.is_ready());

        let inputs = mock.recorded_inputs();
        assert_eq!(inputs[0].len(), CHUNK_CHAR_LIMIT - 1);
    }

    #[tokio::test]
    async fn test_failed_call_is_unavailable_with_context() {
        let mock = MockSummarizer::failing_on(1);
        let outcome = summarize_document(Some(&mock), "a b c d e f", 2).await;
        match outcome {
            SummaryOutcome::Unavailable { reason } => {
                assert!(reason.contains("chunk 2 of 3"));
                assert!(reason.contains("mock failure"));
            }
            SummaryOutcome::Ready { .. } => panic!("expected unavailable"),
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let ready = SummaryOutcome::Ready {
            text: "done".to_string(),
            chunk_count: 1,
        };
        assert!(ready.is_ready());
        assert_eq!(ready.text(), Some("done"));

        let unavailable = SummaryOutcome::Unavailable {
            reason: "why".to_string(),
        };
        assert!(!unavailable.is_ready());
        assert_eq!(unavailable.text(), None);
    }
}
