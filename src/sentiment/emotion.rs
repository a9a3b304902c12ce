use crate::error::{AudiogistError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Hugging Face inference endpoint for hosted models.
const HF_API_URL: &str = "https://api-inference.huggingface.co/models";

/// Maximum retries for API calls.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 1000;

/// Trait for per-chunk emotion classification.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify one chunk of text into label -> score, scores in [0, 1].
    async fn classify(&self, text: &str) -> Result<BTreeMap<String, f64>>;

    /// Human-readable backend name.
    fn name(&self) -> &'static str;
}

/// Emotion classifier backed by a hosted text-classification model.
pub struct HfEmotionClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    model: String,
}

impl HfEmotionClient {
    pub fn new(api_token: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: HF_API_URL.to_string(),
            api_token,
            model,
        }
    }

    /// Override the inference endpoint. Used by tests to point at a local mock.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_api(&self, text: &str) -> Result<BTreeMap<String, f64>> {
        let url = format!("{}/{}", self.base_url, self.model);
        let request = ClassifyRequest {
            inputs: text,
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
        debug!("Emotion API response status: {}", status);

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AudiogistError::Api(format!(
                "Emotion API error ({}): {}",
                status, error_body
            )));
        }

        let parsed: ClassifyResponse = response.json().await?;
        Ok(parsed.into_scores())
    }

    /// Call with retry logic; client errors are not retried.
    async fn call_with_retry(&self, text: &str) -> Result<BTreeMap<String, f64>> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = BASE_DELAY_MS * 2u64.pow(attempt - 1);
                debug!("Retry attempt {} after {}ms delay", attempt, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.call_api(text).await {
                Ok(scores) => return Ok(scores),
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

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

// The hosted API returns a nested list for a single input when all label
// scores are requested; some deployments return a flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_scores(self) -> BTreeMap<String, f64> {
        let entries = match self {
            ClassifyResponse::Nested(mut nested) => {
                if nested.is_empty() {
                    Vec::new()
                } else {
                    nested.remove(0)
                }
            }
            ClassifyResponse::Flat(flat) => flat,
        };
        entries.into_iter().map(|e| (e.label, e.score)).collect()
    }
}

#[async_trait]
impl EmotionClassifier for HfEmotionClient {
    async fn classify(&self, text: &str) -> Result<BTreeMap<String, f64>> {
        self.call_with_retry(text).await
    }

    fn name(&self) -> &'static str {
        "Hugging Face text-classification"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_response_shape() {
        let body = r#"[[{"label": "joy", "score": 0.91}, {"label": "anger", "score": 0.04}]]"#;
        let parsed: ClassifyResponse = serde_json::from_str(body).unwrap();
        let scores = parsed.into_scores();
        assert_eq!(scores.len(), 2);
        assert!((scores["joy"] - 0.91).abs() < 1e-12);
        assert!((scores["anger"] - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_flat_response_shape() {
        let body = r#"[{"label": "sadness", "score": 0.7}]"#;
        let parsed: ClassifyResponse = serde_json::from_str(body).unwrap();
        let scores = parsed.into_scores();
        assert_eq!(scores.len(), 1);
        assert!((scores["sadness"] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_empty_nested_response() {
        let body = r#"[]"#;
        // An empty top-level array matches both shapes; either way the
        // score map must come out empty.
        let parsed: ClassifyResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.into_scores().is_empty());
    }

    #[test]
    fn test_client_builder() {
        let client = HfEmotionClient::new(
            "token".to_string(),
            "j-hartmann/emotion-english-distilroberta-base".to_string(),
        )
        .with_base_url("http://127.0.0.1:9000/models".to_string());
        assert_eq!(client.model(), "j-hartmann/emotion-english-distilroberta-base");
        assert!(client.base_url.starts_with("http://127.0.0.1"));
    }
}
