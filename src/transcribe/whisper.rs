use crate::error::{AudiogistError, Result};
use crate::transcribe::{Transcript, Transcriber};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

/// OpenAI Whisper API endpoint.
const WHISPER_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Maximum file size for the Whisper API (25 MB).
pub const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Maximum retries for API calls.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 1000;

/// Transcription model names accepted by the API, for the wizard menu.
pub const KNOWN_MODELS: &[&str] = &["whisper-1", "gpt-4o-transcribe", "gpt-4o-mini-transcribe"];

/// OpenAI Whisper API client.
pub struct WhisperClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    language: Option<String>,
    prompt: Option<String>,
}

impl WhisperClient {
    /// Create a new Whisper client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: WHISPER_API_URL.to_string(),
            api_key,
            model: "whisper-1".to_string(),
            language: None,
            prompt: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set the source language (ISO 639-1 code).
    pub fn with_language(mut self, language: String) -> Self {
        self.language = Some(language);
        self
    }

    /// Set a prompt for vocabulary hints (max 224 tokens).
    pub fn with_prompt(mut self, prompt: String) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Override the API endpoint. Used by tests to point at a local mock.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    /// Build the multipart form for the API request.
    async fn build_form(&self, audio_path: &Path) -> Result<Form> {
        let file_bytes = fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let mime_type = match audio_path.extension().and_then(|e| e.to_str()) {
            Some("wav") => "audio/wav",
            Some("mp3") => "audio/mpeg",
            Some("m4a") => "audio/mp4",
            Some("flac") => "audio/flac",
            Some("ogg") => "audio/ogg",
            Some("webm") => "audio/webm",
            _ => "application/octet-stream",
        };

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_type)?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        if let Some(ref lang) = self.language {
            form = form.text("language", lang.clone());
        }

        if let Some(ref prompt) = self.prompt {
            form = form.text("prompt", prompt.clone());
        }

        Ok(form)
    }

    /// Make the API request (form is consumed, so no retries at this level).
    async fn call_api(&self, form: Form) -> Result<WhisperResponse> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!("Whisper API response status: {}", status);

        if status.is_success() {
            let body = response.text().await?;
            debug!("Whisper API response: {}", &body[..body.len().min(500)]);
            let parsed: WhisperResponse = serde_json::from_str(&body)?;
            return Ok(parsed);
        }

        // Handle error responses
        let error_body = response.text().await.unwrap_or_default();

        // Try to parse API error
        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
            return Err(AudiogistError::Api(format!(
                "Whisper API error: {} ({})",
                api_error.error.message, api_error.error.r#type
            )));
        }

        Err(AudiogistError::Api(format!(
            "Whisper API error ({}): {}",
            status, error_body
        )))
    }

    /// Transcribe with retry logic - rebuilds the form on each attempt.
    async fn transcribe_with_retry(&self, audio_path: &Path) -> Result<WhisperResponse> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                debug!("Retry attempt {} after {}ms delay", attempt, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let form = self.build_form(audio_path).await?;

            match self.call_api(form).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    // Don't retry on client errors
                    let error_str = e.to_string();
                    if error_str.contains("API error (4") {
                        return Err(e);
                    }
                    warn!("Attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AudiogistError::Api("Unknown error".to_string())))
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        debug!("Transcribing {:?} with Whisper", audio_path);

        // Check file size
        let metadata = fs::metadata(audio_path).await?;
        if metadata.len() as usize > MAX_FILE_SIZE {
            return Err(AudiogistError::Transcription(format!(
                "File too large for Whisper API: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_FILE_SIZE
            )));
        }

        let response = self.transcribe_with_retry(audio_path).await?;

        Ok(Transcript {
            text: response.text.trim().to_string(),
            language: response.language,
            duration: response.duration.map(Duration::from_secs_f64),
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    r#type: String,
    #[allow(dead_code)]
    code: Option<String>,
}
