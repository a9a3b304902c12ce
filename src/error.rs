use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudiogistError {
    #[error("Audio preparation failed: {0}")]
    AudioPreparation(String),

    #[error("Decoder toolchain missing: {0}")]
    DecoderMissing(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Topic extraction failed: {0}")]
    TopicExtraction(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AudiogistError>;
