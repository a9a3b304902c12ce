use crate::error::{AudiogistError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub hf_api_token: Option<String>,
    pub whisper_model: String,
    pub language: Option<String>,
    pub sentiment_chunk_size: usize,
    pub neutral_threshold: f64,
    pub topic_chunk_size: usize,
    pub n_topics: usize,
    pub summary_model: String,
    pub summary_chunk_size: usize,
    pub summary_min_length: usize,
    pub summary_max_length: usize,
    pub emotion_model: String,
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            hf_api_token: None,
            whisper_model: "whisper-1".to_string(),
            language: None,
            sentiment_chunk_size: 200,
            neutral_threshold: 0.05,
            topic_chunk_size: 300,
            n_topics: 5,
            summary_model: "google-t5/t5-base".to_string(),
            summary_chunk_size: 512,
            summary_min_length: 50,
            summary_max_length: 150,
            emotion_model: "j-hartmann/emotion-english-distilroberta-base".to_string(),
            default_format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(token) = std::env::var("HF_API_TOKEN") {
            self.hf_api_token = Some(token);
        }
        if let Ok(model) = std::env::var("AUDIOGIST_WHISPER_MODEL") {
            self.whisper_model = model;
        }
        if let Ok(language) = std::env::var("AUDIOGIST_LANGUAGE") {
            self.language = Some(language);
        }
        if let Ok(size) = std::env::var("AUDIOGIST_SENTIMENT_CHUNK_SIZE") {
            if let Ok(s) = size.parse() {
                self.sentiment_chunk_size = s;
            }
        }
        if let Ok(threshold) = std::env::var("AUDIOGIST_NEUTRAL_THRESHOLD") {
            if let Ok(t) = threshold.parse() {
                self.neutral_threshold = t;
            }
        }
        if let Ok(size) = std::env::var("AUDIOGIST_TOPIC_CHUNK_SIZE") {
            if let Ok(s) = size.parse() {
                self.topic_chunk_size = s;
            }
        }
        if let Ok(n) = std::env::var("AUDIOGIST_N_TOPICS") {
            if let Ok(n) = n.parse() {
                self.n_topics = n;
            }
        }
        if let Ok(model) = std::env::var("AUDIOGIST_SUMMARY_MODEL") {
            self.summary_model = model;
        }
        if let Ok(size) = std::env::var("AUDIOGIST_SUMMARY_CHUNK_SIZE") {
            if let Ok(s) = size.parse() {
                self.summary_chunk_size = s;
            }
        }
        if let Ok(len) = std::env::var("AUDIOGIST_SUMMARY_MIN_LENGTH") {
            if let Ok(l) = len.parse() {
                self.summary_min_length = l;
            }
        }
        if let Ok(len) = std::env::var("AUDIOGIST_SUMMARY_MAX_LENGTH") {
            if let Ok(l) = len.parse() {
                self.summary_max_length = l;
            }
        }
        if let Ok(model) = std::env::var("AUDIOGIST_EMOTION_MODEL") {
            self.emotion_model = model;
        }
        if let Ok(format) = std::env::var("AUDIOGIST_DEFAULT_FORMAT") {
            if let Ok(f) = format.parse() {
                self.default_format = f;
            }
        }
    }

    /// Check analysis parameters. Missing credentials are not an error
    /// here; capabilities without a credential resolve to unavailable.
    pub fn validate(&self) -> Result<()> {
        if self.sentiment_chunk_size == 0 {
            return Err(AudiogistError::Config(
                "sentiment_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.topic_chunk_size == 0 {
            return Err(AudiogistError::Config(
                "topic_chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.summary_chunk_size == 0 {
            return Err(AudiogistError::Config(
                "summary_chunk_size must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.neutral_threshold) {
            return Err(AudiogistError::Config(format!(
                "neutral_threshold must be within 0.0..=1.0, got {}",
                self.neutral_threshold
            )));
        }
        if self.n_topics == 0 {
            return Err(AudiogistError::Config(
                "n_topics must be greater than 0".to_string(),
            ));
        }
        if self.summary_min_length >= self.summary_max_length {
            return Err(AudiogistError::Config(format!(
                "summary_min_length ({}) must be below summary_max_length ({})",
                self.summary_min_length, self.summary_max_length
            )));
        }
        Ok(())
    }

    /// Transcribing audio requires the Whisper credential.
    pub fn require_transcription(&self) -> Result<()> {
        if self.openai_api_key.is_none() {
            return Err(AudiogistError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("audiogist").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("srt".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Text.extension(), "txt");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.whisper_model, "whisper-1");
        assert_eq!(config.sentiment_chunk_size, 200);
        assert_eq!(config.neutral_threshold, 0.05);
        assert_eq!(config.topic_chunk_size, 300);
        assert_eq!(config.n_topics, 5);
        assert_eq!(config.summary_model, "google-t5/t5-base");
        assert_eq!(config.summary_chunk_size, 512);
        assert_eq!(config.summary_min_length, 50);
        assert_eq!(config.summary_max_length, 150);
        assert_eq!(
            config.emotion_model,
            "j-hartmann/emotion-english-distilroberta-base"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("sentiment_chunk_size = 50\nn_topics = 2\n").unwrap();
        assert_eq!(parsed.sentiment_chunk_size, 50);
        assert_eq!(parsed.n_topics, 2);
        assert_eq!(parsed.topic_chunk_size, 300);
        assert_eq!(parsed.whisper_model, "whisper-1");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.neutral_threshold = 0.1;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.neutral_threshold, 0.1);
    }

    #[test]
    fn test_validate_rejects_zero_chunk_sizes() {
        let mut config = Config::default();
        config.sentiment_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.topic_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.summary_chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.neutral_threshold = 1.5;
        assert!(config.validate().is_err());

        config.neutral_threshold = -0.1;
        assert!(config.validate().is_err());

        config.neutral_threshold = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_summary_bounds() {
        let mut config = Config::default();
        config.summary_min_length = 150;
        config.summary_max_length = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_topics() {
        let mut config = Config::default();
        config.n_topics = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_credentials_are_not_a_validation_error() {
        let config = Config::default();
        assert!(config.openai_api_key.is_none());
        assert!(config.hf_api_token.is_none());
        assert!(config.validate().is_ok());
        assert!(config.require_transcription().is_err());
    }
}
