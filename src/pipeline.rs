use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{ModelKind, ModelRegistry};
use crate::report::{AnalysisReport, AnalysisStats, ReferenceScores, ReportMetadata};
use crate::sentiment::{aspect_scores, emotion_scores, score_document};
use crate::summarize::{bleu, rouge_f1, summarize_document, SummaryOutcome};
use crate::text::{chunk, clean_transcript, normalize};
use crate::topics::decompose;

/// Raw-transcript word count below which a summary is not attempted.
/// This is run policy, not a limit of the summarizer itself.
const MIN_SUMMARY_WORDS: usize = 50;

/// What an analysis run starts from.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// Audio or video to transcribe first.
    Audio(PathBuf),
    /// An existing transcript file to analyze directly.
    Transcript(PathBuf),
}

impl AnalysisInput {
    pub fn path(&self) -> &Path {
        match self {
            AnalysisInput::Audio(p) | AnalysisInput::Transcript(p) => p,
        }
    }
}

/// Per-run options for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Aspect terms to score individually.
    pub aspects: Vec<String>,
    /// Run the per-chunk emotion classifier.
    pub run_emotions: bool,
    /// Reference summary to score the generated summary against.
    pub reference_summary: Option<String>,
    /// Label for the report metadata, usually the input file name.
    pub source_label: Option<String>,
    /// Duration of the source audio, when the input was audio.
    pub audio_duration: Option<Duration>,
    /// Language recorded in the report metadata.
    pub language: Option<String>,
    /// Show progress spinners.
    pub show_progress: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            aspects: Vec::new(),
            run_emotions: false,
            reference_summary: None,
            source_label: None,
            audio_duration: None,
            language: None,
            show_progress: true,
        }
    }
}

fn add_spinner(multi_progress: Option<&MultiProgress>, message: &str) -> Option<ProgressBar> {
    multi_progress.map(|mp| {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

/// Analyze a transcript end to end.
///
/// Stages run sequentially, in chunk order, and independently of each
/// other: a stage that cannot produce a result records that in the
/// report instead of aborting the rest.
pub async fn run_analysis(
    transcript: &str,
    options: &AnalysisOptions,
    config: &Config,
    registry: &ModelRegistry,
) -> AnalysisReport {
    let start_time = Instant::now();

    let multi_progress = if options.show_progress {
        Some(MultiProgress::new())
    } else {
        None
    };

    let mut notes: Vec<String> = Vec::new();

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Transcript Preparation
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 1/4: Cleaning and normalizing transcript");

    let prep_pb = add_spinner(multi_progress.as_ref(), "Preparing transcript...");

    let cleaned = clean_transcript(transcript);
    let normalized = normalize(&cleaned);
    let transcript_words = transcript.split_whitespace().count();

    if cleaned.is_empty() {
        warn!("Transcript is empty after cleaning; stages will return empty results");
    }
    debug!(
        "Cleaned transcript: {} chars, normalized: {} chars",
        cleaned.len(),
        normalized.len()
    );

    if let Some(pb) = prep_pb {
        pb.finish_with_message(format!("✓ Transcript prepared ({} words)", transcript_words));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Sentiment
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 2/4: Scoring sentiment");
    let sentiment_start = Instant::now();

    let sentiment_pb = add_spinner(multi_progress.as_ref(), "Scoring sentiment...");

    let sentiment = score_document(
        registry.analyzer(),
        &normalized,
        config.sentiment_chunk_size,
        config.neutral_threshold,
    );
    info!(
        "Sentiment: {} (polarity {:.3} over {} chunks)",
        sentiment.label, sentiment.polarity, sentiment.chunk_count
    );

    let aspects = if options.aspects.is_empty() {
        None
    } else {
        // Aspect matching needs sentence punctuation, so it reads the
        // cleaned text rather than the normalized one.
        Some(aspect_scores(
            registry.analyzer(),
            &cleaned,
            &options.aspects,
        ))
    };

    let sentiment_time = sentiment_start.elapsed();

    let emotion_start = Instant::now();
    let emotions = if options.run_emotions {
        if !registry.has(ModelKind::Emotion) {
            notes.push("emotion scoring unavailable: HF_API_TOKEN is not set".to_string());
        }
        let classifier = registry.emotion();
        let scores = emotion_scores(
            classifier.as_deref(),
            &normalized,
            config.sentiment_chunk_size,
        )
        .await;
        info!("Emotion scores reported for {} labels", scores.len());
        Some(scores)
    } else {
        None
    };
    let emotion_time = if options.run_emotions {
        emotion_start.elapsed()
    } else {
        Duration::ZERO
    };

    if let Some(pb) = sentiment_pb {
        pb.finish_with_message(format!("✓ Sentiment: {}", sentiment.label));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Topics
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 3/4: Extracting topics");
    let topic_start = Instant::now();

    let topic_pb = add_spinner(multi_progress.as_ref(), "Extracting topics...");

    let topic_docs = chunk(&normalized, config.topic_chunk_size);
    let topics = decompose(&topic_docs, config.n_topics);
    info!(
        "Topics: {} extracted (of {} requested)",
        topics.effective_topics, topics.requested_topics
    );

    if let Some(pb) = topic_pb {
        if topics.warning.is_some() {
            pb.finish_with_message("✗ No topics extracted");
        } else {
            pb.finish_with_message(format!("✓ {} topics extracted", topics.topics.len()));
        }
    }
    let topic_time = topic_start.elapsed();

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 4: Summary
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 4/4: Summarizing");
    let summary_start = Instant::now();

    let summary_pb = add_spinner(multi_progress.as_ref(), "Summarizing transcript...");

    let summary = if transcript_words < MIN_SUMMARY_WORDS {
        let reason = format!(
            "transcript has {} words, below the {} word minimum for summarization",
            transcript_words, MIN_SUMMARY_WORDS
        );
        info!("Skipping summary: {}", reason);
        notes.push(reason.clone());
        SummaryOutcome::Unavailable { reason }
    } else {
        let summarizer = registry.summarizer();
        // Summarization reads the transcript verbatim rather than the
        // cleaned text; the model sees the original sentence structure.
        summarize_document(summarizer.as_deref(), transcript, config.summary_chunk_size).await
    };

    if let Some(pb) = summary_pb {
        match &summary {
            SummaryOutcome::Ready { chunk_count, .. } => {
                pb.finish_with_message(format!("✓ Summary from {} chunks", chunk_count));
            }
            SummaryOutcome::Unavailable { .. } => {
                pb.finish_with_message("✗ Summary unavailable");
            }
        }
    }

    // Reference scoring only applies when a summary was actually produced.
    let reference_scores = match (&options.reference_summary, summary.text()) {
        (Some(reference), Some(candidate)) => Some(ReferenceScores {
            bleu: bleu(reference, candidate),
            rouge: rouge_f1(reference, candidate),
        }),
        _ => None,
    };
    let summary_time = summary_start.elapsed();

    let total_time = start_time.elapsed();
    info!("Analysis complete in {:.2}s", total_time.as_secs_f64());

    let transcription_model = if options.audio_duration.is_some() {
        registry
            .model_name(ModelKind::Transcription)
            .map(str::to_string)
    } else {
        // The transcript was supplied directly, no transcription ran.
        None
    };

    AnalysisReport {
        metadata: ReportMetadata {
            source_file: options.source_label.clone(),
            transcription_model,
            summary_model: registry
                .model_name(ModelKind::Summarization)
                .map(str::to_string),
            emotion_model: if options.run_emotions {
                registry.model_name(ModelKind::Emotion).map(str::to_string)
            } else {
                None
            },
            language: options.language.clone(),
            audio_duration_secs: options.audio_duration.map(|d| d.as_secs_f64()),
            transcript_words,
        },
        sentiment,
        aspects,
        emotions,
        topics,
        summary,
        reference_scores,
        notes,
        stats: AnalysisStats {
            total_time,
            sentiment_time,
            emotion_time,
            topic_time,
            summary_time,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::summarize::Summarizer;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    fn quiet_options() -> AnalysisOptions {
        AnalysisOptions {
            show_progress: false,
            ..AnalysisOptions::default()
        }
    }

    fn offline_registry(config: &Config) -> ModelRegistry {
        ModelRegistry::from_config(config)
    }

    /// Summarizer that records exactly what it was asked to summarize.
    #[derive(Default)]
    struct RecordingSummarizer {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for RecordingSummarizer {
        async fn summarize(&self, text: &str) -> Result<String> {
            self.inputs.lock().unwrap().push(text.to_string());
            Ok("A recap.".to_string())
        }

        fn name(&self) -> &'static str {
            "Recording"
        }
    }

    /// A transcript with two clearly separated vocabularies, long enough
    /// to split into two topic documents at chunk size 300.
    fn two_theme_transcript() -> String {
        let cooking = "The chef simmered the tomato sauce slowly while fresh basil \
                       and garlic filled the kitchen with a wonderful aroma. Everyone \
                       agreed the pasta dinner tasted excellent and the dessert was \
                       delicious beyond words.";
        let football = "The stadium roared as the striker scored a brilliant goal in \
                        the final minute. The coach praised the defenders and the \
                        goalkeeper after the team secured the championship trophy with \
                        a stunning victory.";

        let mut text = String::new();
        for _ in 0..8 {
            text.push_str(cooking);
            text.push(' ');
        }
        for _ in 0..8 {
            text.push_str(football);
            text.push(' ');
        }
        text
    }

    #[test]
    fn test_analysis_options_default() {
        let options = AnalysisOptions::default();
        assert!(options.aspects.is_empty());
        assert!(!options.run_emotions);
        assert!(options.reference_summary.is_none());
        assert!(options.show_progress);
    }

    #[tokio::test]
    async fn test_analysis_without_credentials() {
        let config = Config::default();
        let registry = offline_registry(&config);
        let transcript = two_theme_transcript();

        let report = run_analysis(&transcript, &quiet_options(), &config, &registry).await;

        assert!(report.sentiment.chunk_count >= 1);
        assert_eq!(report.sentiment.label.to_string(), "positive");
        assert!(report.aspects.is_none());
        assert!(report.emotions.is_none());

        // No summarizer resolved, so the outcome is tagged not faked.
        assert!(!report.summary.is_ready());
        match &report.summary {
            SummaryOutcome::Unavailable { reason } => {
                assert!(reason.contains("not configured"));
            }
            other => panic!("Expected unavailable summary, got {:?}", other),
        }
        assert!(report.reference_scores.is_none());
    }

    #[tokio::test]
    async fn test_topics_split_across_two_documents() {
        let config = Config::default();
        let registry = offline_registry(&config);
        let transcript = two_theme_transcript();

        let report = run_analysis(&transcript, &quiet_options(), &config, &registry).await;

        assert!(report.topics.warning.is_none());
        assert_eq!(report.topics.effective_topics, 2);
        assert_eq!(report.topics.topics.len(), 2);
        assert_eq!(report.topics.doc_topic.len(), 2);
        for row in &report.topics.doc_topic {
            assert_eq!(row.len(), 2);
        }

        let all_terms: Vec<&str> = report
            .topics
            .topics
            .iter()
            .flat_map(|t| t.terms.iter().map(|term| term.term.as_str()))
            .collect();
        assert!(all_terms.contains(&"pasta") || all_terms.contains(&"goal"));
    }

    #[tokio::test]
    async fn test_short_transcript_skips_summary() {
        let config = Config::default();
        let registry = offline_registry(&config);

        let report = run_analysis(
            "Just a handful of words here.",
            &quiet_options(),
            &config,
            &registry,
        )
        .await;

        match &report.summary {
            SummaryOutcome::Unavailable { reason } => {
                assert!(reason.contains("below the 50 word minimum"));
            }
            other => panic!("Expected skipped summary, got {:?}", other),
        }
        assert!(report
            .notes
            .iter()
            .any(|n| n.contains("below the 50 word minimum")));
    }

    #[tokio::test]
    async fn test_summary_reads_verbatim_transcript() {
        let config = Config::default();
        let recorder = Arc::new(RecordingSummarizer::default());
        let registry = ModelRegistry::with_handles(
            Some((
                "recording".to_string(),
                Arc::clone(&recorder) as Arc<dyn Summarizer>,
            )),
            None,
        );

        // Three spoken lines of 14 words each (42 after cleaning) padded
        // with timestamp and metadata lines; only the raw count of 66
        // clears the summary floor.
        let mut lines = Vec::new();
        for _ in 0..3 {
            lines.push("The quarterly numbers looked strong and the whole team felt proud of the launch.");
            lines.push("0.00 4.80");
            lines.push("12.50 19.20");
            lines.push("No speech probability: 0.03");
        }
        let transcript = lines.join("\n");

        let report = run_analysis(&transcript, &quiet_options(), &config, &registry).await;

        assert_eq!(report.metadata.transcript_words, 66);
        assert!(report.summary.is_ready());

        // The summarizer sees the transcript as transcribed, artifact
        // lines included; cleaning applies to the other stages only.
        let inputs = recorder.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 1);
        assert!(inputs[0].contains("0.00 4.80"));
        assert!(inputs[0].contains("No speech probability: 0.03"));
    }

    #[tokio::test]
    async fn test_requested_aspects_are_always_keyed() {
        let config = Config::default();
        let registry = offline_registry(&config);
        let mut options = quiet_options();
        options.aspects = vec!["pasta".to_string(), "opera".to_string()];

        let report = run_analysis(&two_theme_transcript(), &options, &config, &registry).await;

        let aspects = report.aspects.expect("aspects were requested");
        assert!(aspects["pasta"] > 0.0);
        assert_eq!(aspects["opera"], 0.0);
    }

    #[tokio::test]
    async fn test_emotions_requested_without_model() {
        let config = Config::default();
        let registry = offline_registry(&config);
        let mut options = quiet_options();
        options.run_emotions = true;

        let report = run_analysis(&two_theme_transcript(), &options, &config, &registry).await;

        let emotions = report.emotions.expect("emotions were requested");
        assert!(emotions.is_empty());
        assert!(report
            .notes
            .iter()
            .any(|n| n.contains("emotion scoring unavailable")));
        assert!(report.metadata.emotion_model.is_none());
    }

    #[tokio::test]
    async fn test_empty_transcript_produces_empty_results() {
        let config = Config::default();
        let registry = offline_registry(&config);

        let report = run_analysis("", &quiet_options(), &config, &registry).await;

        assert_eq!(report.metadata.transcript_words, 0);
        assert_eq!(report.sentiment.chunk_count, 0);
        assert_eq!(report.sentiment.polarity, 0.0);
        assert_eq!(report.sentiment.label.to_string(), "neutral");
        assert!(report.topics.warning.is_some());
        assert!(report.topics.topics.is_empty());
        assert!(!report.summary.is_ready());
    }

    #[tokio::test]
    async fn test_reference_without_summary_is_not_scored() {
        let config = Config::default();
        let registry = offline_registry(&config);
        let mut options = quiet_options();
        options.reference_summary = Some("A reference summary.".to_string());

        let report = run_analysis(&two_theme_transcript(), &options, &config, &registry).await;

        // Summary never materialized, so there is nothing to score.
        assert!(report.reference_scores.is_none());
    }
}
