use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::sentiment::{EmotionClassifier, HfEmotionClient, LexiconAnalyzer};
use crate::summarize::{HfSummaryClient, Summarizer};
use crate::transcribe::{Transcriber, WhisperClient};

/// Capability slots the registry resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Transcription,
    Summarization,
    Emotion,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Transcription => write!(f, "transcription"),
            ModelKind::Summarization => write!(f, "summarization"),
            ModelKind::Emotion => write!(f, "emotion"),
        }
    }
}

/// Long-lived handles to every model the pipeline may call.
///
/// Each handle is constructed at most once per (kind, model name) and
/// shared out as `Arc` clones for the rest of the session. Capabilities
/// whose credential is absent resolve to `None` here, before any stage
/// runs, and each absence is recorded as a note for the final report.
/// A configuration change means building a fresh registry.
pub struct ModelRegistry {
    analyzer: LexiconAnalyzer,
    transcriber: Option<(String, Arc<dyn Transcriber>)>,
    summarizer: Option<(String, Arc<dyn Summarizer>)>,
    emotion: Option<(String, Arc<dyn EmotionClassifier>)>,
    notes: Vec<String>,
}

impl ModelRegistry {
    pub fn from_config(config: &Config) -> Self {
        let mut notes = Vec::new();

        let transcriber = match &config.openai_api_key {
            Some(key) => {
                let mut client =
                    WhisperClient::new(key.clone()).with_model(config.whisper_model.clone());
                if let Some(language) = &config.language {
                    client = client.with_language(language.clone());
                }
                info!(
                    "Resolved {} model: {}",
                    ModelKind::Transcription,
                    config.whisper_model
                );
                Some((
                    config.whisper_model.clone(),
                    Arc::new(client) as Arc<dyn Transcriber>,
                ))
            }
            None => {
                notes.push("transcription unavailable: OPENAI_API_KEY is not set".to_string());
                None
            }
        };

        let (summarizer, emotion) = match &config.hf_api_token {
            Some(token) => {
                let summary_client =
                    HfSummaryClient::new(token.clone(), config.summary_model.clone())
                        .with_length_bounds(config.summary_min_length, config.summary_max_length);
                info!(
                    "Resolved {} model: {}",
                    ModelKind::Summarization,
                    config.summary_model
                );
                let emotion_client =
                    HfEmotionClient::new(token.clone(), config.emotion_model.clone());
                info!(
                    "Resolved {} model: {}",
                    ModelKind::Emotion,
                    config.emotion_model
                );
                (
                    Some((
                        config.summary_model.clone(),
                        Arc::new(summary_client) as Arc<dyn Summarizer>,
                    )),
                    Some((
                        config.emotion_model.clone(),
                        Arc::new(emotion_client) as Arc<dyn EmotionClassifier>,
                    )),
                )
            }
            None => {
                notes.push("summarization unavailable: HF_API_TOKEN is not set".to_string());
                notes.push("emotion scoring unavailable: HF_API_TOKEN is not set".to_string());
                (None, None)
            }
        };

        Self {
            analyzer: LexiconAnalyzer::new(),
            transcriber,
            summarizer,
            emotion,
            notes,
        }
    }

    /// The lexicon analyzer is always available; it ships with the binary.
    pub fn analyzer(&self) -> &LexiconAnalyzer {
        &self.analyzer
    }

    pub fn transcriber(&self) -> Option<Arc<dyn Transcriber>> {
        self.transcriber.as_ref().map(|(_, t)| Arc::clone(t))
    }

    pub fn summarizer(&self) -> Option<Arc<dyn Summarizer>> {
        self.summarizer.as_ref().map(|(_, s)| Arc::clone(s))
    }

    pub fn emotion(&self) -> Option<Arc<dyn EmotionClassifier>> {
        self.emotion.as_ref().map(|(_, e)| Arc::clone(e))
    }

    /// Name of the model backing a capability, if it resolved.
    pub fn model_name(&self, kind: ModelKind) -> Option<&str> {
        match kind {
            ModelKind::Transcription => self.transcriber.as_ref().map(|(m, _)| m.as_str()),
            ModelKind::Summarization => self.summarizer.as_ref().map(|(m, _)| m.as_str()),
            ModelKind::Emotion => self.emotion.as_ref().map(|(m, _)| m.as_str()),
        }
    }

    pub fn has(&self, kind: ModelKind) -> bool {
        self.model_name(kind).is_some()
    }

    /// Notes explaining every capability that failed to resolve.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Registry with handles injected directly, bypassing credential
    /// resolution. Lets pipeline tests observe what each stage is fed.
    #[cfg(test)]
    pub(crate) fn with_handles(
        summarizer: Option<(String, Arc<dyn Summarizer>)>,
        emotion: Option<(String, Arc<dyn EmotionClassifier>)>,
    ) -> Self {
        Self {
            analyzer: LexiconAnalyzer::new(),
            transcriber: None,
            summarizer,
            emotion,
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_resolves_nothing_but_the_lexicon() {
        let mut config = Config::default();
        config.openai_api_key = None;
        config.hf_api_token = None;

        let registry = ModelRegistry::from_config(&config);
        assert!(registry.transcriber().is_none());
        assert!(registry.summarizer().is_none());
        assert!(registry.emotion().is_none());
        assert!(!registry.has(ModelKind::Transcription));
        assert!(registry.analyzer().lexicon_size() > 100);
        assert_eq!(registry.notes().len(), 3);
    }

    #[test]
    fn test_full_credentials_resolve_all_capabilities() {
        let mut config = Config::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.hf_api_token = Some("hf_test".to_string());

        let registry = ModelRegistry::from_config(&config);
        assert!(registry.transcriber().is_some());
        assert!(registry.summarizer().is_some());
        assert!(registry.emotion().is_some());
        assert!(registry.notes().is_empty());
        assert_eq!(
            registry.model_name(ModelKind::Transcription),
            Some("whisper-1")
        );
        assert_eq!(
            registry.model_name(ModelKind::Summarization),
            Some("google-t5/t5-base")
        );
        assert_eq!(
            registry.model_name(ModelKind::Emotion),
            Some("j-hartmann/emotion-english-distilroberta-base")
        );
    }

    #[test]
    fn test_configured_model_names_flow_through() {
        let mut config = Config::default();
        config.hf_api_token = Some("hf_test".to_string());
        config.summary_model = "facebook/bart-large-cnn".to_string();

        let registry = ModelRegistry::from_config(&config);
        assert_eq!(
            registry.model_name(ModelKind::Summarization),
            Some("facebook/bart-large-cnn")
        );
        assert!(!registry.has(ModelKind::Transcription));
    }

    #[test]
    fn test_handles_are_shared_not_rebuilt() {
        let mut config = Config::default();
        config.hf_api_token = Some("hf_test".to_string());

        let registry = ModelRegistry::from_config(&config);
        let first = registry.summarizer().unwrap();
        let second = registry.summarizer().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
