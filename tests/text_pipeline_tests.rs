//! Integration tests for the text analysis pipeline
//!
//! These tests validate the integration between stages without requiring
//! external API keys.

use audiogist::config::{Config, OutputFormat};
use audiogist::models::ModelRegistry;
use audiogist::pipeline::{run_analysis, AnalysisOptions};
use audiogist::sentiment::{aspect_scores, score_document, Label, LexiconAnalyzer};
use audiogist::text::{chunk, clean_transcript, normalize};
use audiogist::topics::{decompose, TERMS_PER_TOPIC};

// ============================================================================
// Config Integration Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.whisper_model, "whisper-1");
        assert_eq!(config.sentiment_chunk_size, 200);
        assert_eq!(config.neutral_threshold, 0.05);
        assert_eq!(config.topic_chunk_size, 300);
        assert_eq!(config.n_topics, 5);
        assert_eq!(config.summary_model, "google-t5/t5-base");
        assert_eq!(config.summary_chunk_size, 512);
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.sentiment_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.neutral_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.summary_min_length = 200;
        config.summary_max_length = 100;
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_output_format_extensions() {
        assert_eq!(OutputFormat::Text.extension(), "txt");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("srt".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_missing_credentials_pass_validation() {
        let config = Config::default();
        assert!(config.openai_api_key.is_none());
        assert!(config.validate().is_ok());
    }
}

// ============================================================================
// Text Stage Tests
// ============================================================================

mod text_stage_tests {
    use super::*;

    fn raw_engine_output() -> &'static str {
        "The product launch went well.\n\
         0.00 4.80\n\
         No speech probability: 0.03\n\
         \n\
         Customers love the new battery.\n\
         95%\n\
         The battery life is excellent and the screen is wonderful.\n"
    }

    #[test]
    fn test_clean_drops_artifacts_and_keeps_speech() {
        let cleaned = clean_transcript(raw_engine_output());

        assert_eq!(
            cleaned,
            "The product launch went well.\n\
             Customers love the new battery.\n\
             The battery life is excellent and the screen is wonderful."
        );
    }

    #[test]
    fn test_normalize_after_clean() {
        let cleaned = clean_transcript(raw_engine_output());
        let normalized = normalize(&cleaned);

        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        assert!(tokens.contains(&"battery"));
        assert!(tokens.contains(&"excellent"));
        assert!(tokens.contains(&"wonderful"));
        assert!(!tokens.contains(&"the"));
        assert!(!tokens.contains(&"and"));
        assert!(!tokens.contains(&"is"));
    }

    #[test]
    fn test_normalize_keeps_negations() {
        let normalized = normalize("The screen does not work and I never liked it");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        assert!(tokens.contains(&"not"));
        assert!(tokens.contains(&"never"));
        assert!(!tokens.contains(&"does"));
    }

    #[test]
    fn test_chunk_concatenation_invariant() {
        let normalized = normalize(&clean_transcript(raw_engine_output()));
        for size in [1, 3, 10, 500] {
            let rejoined = chunk(&normalized, size).join(" ");
            assert_eq!(rejoined, normalized, "chunk_size {}", size);
        }
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk("", 10).is_empty());
    }

    #[test]
    #[should_panic(expected = "chunk_size must be at least 1")]
    fn test_chunk_zero_size_panics() {
        chunk("some words", 0);
    }
}

// ============================================================================
// Sentiment Integration Tests
// ============================================================================

mod sentiment_tests {
    use super::*;

    #[test]
    fn test_positive_document() {
        let analyzer = LexiconAnalyzer::new();
        let result = score_document(&analyzer, "excellent wonderful brilliant launch", 200, 0.05);

        assert_eq!(result.label, Label::Positive);
        assert!(result.polarity > 0.05);
        assert!(result.subjectivity > 0.0);
        assert_eq!(result.chunk_count, 1);
    }

    #[test]
    fn test_negative_document() {
        let analyzer = LexiconAnalyzer::new();
        let result = score_document(&analyzer, "terrible awful horrible service", 200, 0.05);

        assert_eq!(result.label, Label::Negative);
        assert!(result.polarity < -0.05);
    }

    #[test]
    fn test_empty_document_is_neutral() {
        let analyzer = LexiconAnalyzer::new();
        let result = score_document(&analyzer, "", 200, 0.05);

        assert_eq!(result.label, Label::Neutral);
        assert_eq!(result.polarity, 0.0);
        assert_eq!(result.chunk_count, 0);
    }

    #[test]
    fn test_threshold_comparisons_are_strict() {
        assert_eq!(Label::from_mean(0.05, 0.05), Label::Neutral);
        assert_eq!(Label::from_mean(-0.05, 0.05), Label::Neutral);
        assert_eq!(Label::from_mean(0.051, 0.05), Label::Positive);
        assert_eq!(Label::from_mean(-0.051, 0.05), Label::Negative);
    }

    #[test]
    fn test_aspect_scores_key_every_requested_aspect() {
        let analyzer = LexiconAnalyzer::new();
        let text = "The battery is excellent. The delivery was terrible. Nothing else to say.";
        let aspects = vec!["battery".to_string(), "delivery".to_string(), "opera".to_string()];

        let scores = aspect_scores(&analyzer, text, &aspects);

        assert_eq!(scores.len(), 3);
        assert!(scores["battery"] > 0.0);
        assert!(scores["delivery"] < 0.0);
        assert_eq!(scores["opera"], 0.0);
    }

    #[test]
    fn test_aspect_matching_is_case_insensitive() {
        let analyzer = LexiconAnalyzer::new();
        let text = "The Battery is excellent.";
        let aspects = vec!["battery".to_string()];

        let scores = aspect_scores(&analyzer, text, &aspects);
        assert!(scores["battery"] > 0.0);
    }
}

// ============================================================================
// Topic Extraction Tests
// ============================================================================

mod topic_tests {
    use super::*;

    fn corpus(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_topics_clamped_to_document_count() {
        let docs = corpus(&[
            "pasta sauce recipe cooking kitchen flavor",
            "cooking recipe kitchen pasta sauce dinner",
            "football match stadium goal referee striker",
        ]);

        let model = decompose(&docs, 5);
        assert_eq!(model.requested_topics, 5);
        assert_eq!(model.effective_topics, 3);
        // One projection row per document, one column per kept topic.
        assert_eq!(model.doc_topic.len(), 3);
        for row in &model.doc_topic {
            assert_eq!(row.len(), model.effective_topics);
        }
        assert!(model.warning.is_none());
    }

    #[test]
    fn test_topic_terms_capped_and_sorted() {
        let docs = corpus(&[
            "pasta sauce recipe cooking kitchen flavor",
            "cooking recipe kitchen pasta sauce dinner",
            "football match stadium goal referee striker",
        ]);

        let model = decompose(&docs, 3);
        for topic in &model.topics {
            assert!(!topic.terms.is_empty());
            assert!(topic.terms.len() <= TERMS_PER_TOPIC);
            for pair in topic.terms.windows(2) {
                assert!(pair[0].weight >= pair[1].weight);
            }
        }
    }

    #[test]
    fn test_empty_corpus_warns_instead_of_failing() {
        let model = decompose(&[], 5);
        assert!(model.topics.is_empty());
        assert_eq!(model.effective_topics, 0);
        assert!(model.warning.is_some());
    }
}

// ============================================================================
// End-to-End Analysis Tests
// ============================================================================

mod end_to_end_tests {
    use super::*;

    fn meeting_transcript() -> String {
        let mut lines = Vec::new();
        for _ in 0..6 {
            lines.push("The quarterly review went well and the team was excellent.");
            lines.push("0.00 12.40");
            lines.push("Revenue from the new product line looks wonderful this year.");
            lines.push("No speech probability: 0.02");
        }
        lines.join("\n")
    }

    fn quiet_options() -> AnalysisOptions {
        AnalysisOptions {
            show_progress: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_analysis_without_credentials() {
        let config = Config::default();
        let registry = ModelRegistry::from_config(&config);
        let transcript = meeting_transcript();

        let report = run_analysis(&transcript, &quiet_options(), &config, &registry).await;

        assert_eq!(report.sentiment.label, Label::Positive);
        assert!(report.metadata.transcript_words > 50);
        assert!(report.aspects.is_none());
        assert!(!report.summary.is_ready());
    }

    #[tokio::test]
    async fn test_report_json_shape() {
        let config = Config::default();
        let registry = ModelRegistry::from_config(&config);
        let transcript = meeting_transcript();

        let report = run_analysis(&transcript, &quiet_options(), &config, &registry).await;
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();

        assert_eq!(json["sentiment"]["label"], "positive");
        assert!(json["sentiment"]["polarity"].is_number());
        assert_eq!(json["summary"]["status"], "unavailable");
        assert!(json["topics"]["effective_topics"].is_number());
        assert!(json["topics"]["doc_topic"].is_array());
        assert!(json["metadata"]["transcript_words"].is_number());
        // Sections that did not run are omitted entirely
        assert!(json.get("aspects").is_none());
        assert!(json.get("reference_scores").is_none());
    }

    #[tokio::test]
    async fn test_aspects_flow_through_full_run() {
        let config = Config::default();
        let registry = ModelRegistry::from_config(&config);
        let transcript = meeting_transcript();

        let options = AnalysisOptions {
            aspects: vec!["revenue".to_string(), "weather".to_string()],
            show_progress: false,
            ..Default::default()
        };

        let report = run_analysis(&transcript, &options, &config, &registry).await;
        let aspects = report.aspects.expect("aspects were requested");

        assert!(aspects["revenue"] > 0.0);
        assert_eq!(aspects["weather"], 0.0);
    }

    #[tokio::test]
    async fn test_empty_transcript_yields_empty_results() {
        let config = Config::default();
        let registry = ModelRegistry::from_config(&config);
        let mut options = quiet_options();
        options.aspects = vec!["revenue".to_string()];

        let report = run_analysis("", &options, &config, &registry).await;

        assert_eq!(report.metadata.transcript_words, 0);
        assert_eq!(report.sentiment.chunk_count, 0);
        assert_eq!(report.sentiment.label, Label::Neutral);
        assert!(report.topics.warning.is_some());
        assert!(report.topics.doc_topic.is_empty());

        // With nothing to scan, requested aspects get no entries at all.
        let aspects = report.aspects.expect("aspects were requested");
        assert!(aspects.is_empty());
    }
}
