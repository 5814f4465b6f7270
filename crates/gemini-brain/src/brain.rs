//! GeminiBrain implementation using the Gemini REST API.

use brain_core::{async_trait, BrainError, Generator};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::GeminiBrainConfig;

/// A generator backed by Google's Gemini `generateContent` endpoint.
///
/// The generator is stateless: conversation history and persona framing are
/// assembled by the caller and arrive here as a single prompt.
pub struct GeminiBrain {
    client: Client,
    config: GeminiBrainConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!("GeminiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    ///
    /// See [`GeminiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GeminiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiBrainConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

/// Map a non-success HTTP response to a [`BrainError`].
fn classify_failure(status: StatusCode, body: &str) -> BrainError {
    let api_error = serde_json::from_str::<ApiError>(body).ok();
    let message = api_error
        .as_ref()
        .map(|e| e.error.message.clone())
        .unwrap_or_else(|| body.to_string());
    let exhausted = api_error
        .as_ref()
        .and_then(|e| e.error.status.as_deref())
        .is_some_and(|s| s == "RESOURCE_EXHAUSTED");

    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        return BrainError::RateLimited(format!("{} {}", status.as_u16(), message));
    }

    if status.is_server_error() {
        return BrainError::Unavailable(format!("API error ({}): {}", status.as_u16(), message));
    }

    BrainError::ProcessingFailed(format!("API error ({}): {}", status.as_u16(), message))
}

/// Extract the completion text, treating blocked or empty responses as failures.
fn completion_text(response: &GenerateContentResponse) -> Result<String, BrainError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(BrainError::ProcessingFailed(format!(
            "Prompt blocked: {}",
            reason
        )));
    }

    response
        .first_text()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| BrainError::ProcessingFailed("Empty response from Gemini".to_string()))
}

#[async_trait]
impl Generator for GeminiBrain {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        let url = self.config.generate_url();
        let request = self.build_request(prompt);

        debug!("Sending generateContent request ({} chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify_failure(status, &body);
            warn!("Gemini request failed: {}", error);
            return Err(error);
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = completion.usage_metadata {
            debug!(
                "Gemini usage: prompt={} completion={} total={}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        completion_text(&completion)
    }

    fn name(&self) -> &str {
        "GeminiBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> GeminiBrainConfig {
        GeminiBrainConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:1")
            .request_timeout(Duration::from_secs(2))
            .build()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let config = GeminiBrainConfig::builder().api_key("  ").build();
        assert!(matches!(
            GeminiBrain::new(config),
            Err(BrainError::Configuration(_))
        ));
    }

    #[test]
    fn test_build_request_carries_sampling() {
        let config = GeminiBrainConfig::builder()
            .api_key("k")
            .temperature(0.7)
            .max_output_tokens(128)
            .build();
        let brain = GeminiBrain::new(config).unwrap();

        let request = brain.build_request("hello");
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].text(), "hello");
        assert_eq!(request.generation_config.temperature, Some(0.7));
        assert_eq!(request.generation_config.max_output_tokens, Some(128));
    }

    #[test]
    fn test_classify_429_as_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        let error = classify_failure(StatusCode::TOO_MANY_REQUESTS, body);

        assert!(matches!(error, BrainError::RateLimited(_)));
        assert!(error.is_quota());
    }

    #[test]
    fn test_classify_resource_exhausted_status() {
        let body = r#"{"error":{"code":403,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let error = classify_failure(StatusCode::FORBIDDEN, body);
        assert!(matches!(error, BrainError::RateLimited(_)));
    }

    #[test]
    fn test_classify_other_failures() {
        let error = classify_failure(StatusCode::BAD_REQUEST, r#"{"error":{"code":400,"message":"bad"}}"#);
        match error {
            BrainError::ProcessingFailed(msg) => assert!(msg.contains("bad")),
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }

        let error = classify_failure(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(matches!(error, BrainError::Unavailable(_)));
        assert!(!error.is_quota());
    }

    #[test]
    fn test_completion_text_handles_blocked_and_empty() {
        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(
            completion_text(&blocked),
            Err(BrainError::ProcessingFailed(_))
        ));

        let empty: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert!(completion_text(&empty).is_err());

        let ok: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":" hi \n"}]}}]}"#)
                .unwrap();
        assert_eq!(completion_text(&ok).unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_generate_unreachable_backend_is_network_error() {
        let brain = GeminiBrain::new(test_config()).unwrap();
        let result = brain.generate("hello").await;

        match result {
            Err(BrainError::Network(_)) | Err(BrainError::Timeout) => {}
            other => panic!("Expected network failure, got {:?}", other),
        }
    }
}
