// Transcription provider layer
mod whisper;

pub use whisper::{WhisperClient, KNOWN_MODELS};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// A completed transcription.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Raw transcript text as returned by the engine.
    pub text: String,
    /// Detected or requested source language, if reported.
    pub language: Option<String>,
    /// Audio duration, if reported.
    pub duration: Option<Duration>,
}

/// Trait for transcription providers.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a single audio file.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;

    /// Human-readable provider name.
    fn name(&self) -> &'static str;
}
