use crate::error::{AudiogistError, Result};
use crate::summarize::Summarizer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Hugging Face inference endpoint for hosted models.
const HF_API_URL: &str = "https://api-inference.huggingface.co/models";

/// Maximum retries for API calls.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 1000;

/// Summarizer backed by a hosted seq2seq model.
pub struct HfSummaryClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    model: String,
    min_length: usize,
    max_length: usize,
}

impl HfSummaryClient {
    pub fn new(api_token: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: HF_API_URL.to_string(),
            api_token,
            model,
            min_length: 50,
            max_length: 150,
        }
    }

    /// Set the generated-summary length bounds, in tokens.
    pub fn with_length_bounds(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Override the inference endpoint. Used by tests to point at a local mock.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_api(&self, text: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, self.model);
        let request = SummaryRequest {
            inputs: text,
            parameters: SummaryParameters {
                min_length: self.min_length,
                max_length: self.max_length,
                do_sample: false,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Summary API response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AudiogistError::Api(format!(
                "Summary API error ({}): {}",
                status, error_body
            )));
        }

        let items: Vec<SummaryItem> = response.json().await?;
        items
            .into_iter()
            .next()
            .map(|item| item.summary_text)
            .ok_or_else(|| AudiogistError::Api("Summary API returned an empty list".to_string()))
    }

    /// Call with retry logic; client errors are not retried.
    async fn call_with_retry(&self, text: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                debug!("Retry attempt {} after {}ms delay", attempt, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.call_api(text).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
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
impl Summarizer for HfSummaryClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.call_with_retry(text).await
    }

    fn name(&self) -> &'static str {
        "Hugging Face summarization"
    }
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
    parameters: SummaryParameters,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct SummaryParameters {
    min_length: usize,
    max_length: usize,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}
