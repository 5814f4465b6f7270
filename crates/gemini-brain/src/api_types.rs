//! Gemini and Cloud TTS request and response types.

use serde::{Deserialize, Serialize};

/// A text part of a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload.
    #[serde(default)]
    pub text: Option<String>,
}

/// A content block (one conversational turn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Role: "user" or "model".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts of the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a single-part user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }

    /// Concatenate all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Sampling configuration.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// `generateContent` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// A candidate completion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt (e.g. blocked by safety filters).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token accounting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// `generateContent` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::text)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// Google API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Cloud TTS `text:synthesize` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelection,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
}

/// Cloud TTS `text:synthesize` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    /// Base64-encoded audio bytes.
    pub audio_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hello")],
            generation_config: GenerationConfig {
                temperature: Some(0.9),
                max_output_tokens: None,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["generationConfig"]["maxOutputTokens"].is_null());
    }

    #[test]
    fn test_first_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hi "}, {"text": "there"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2, "totalTokenCount": 5}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.first_text().as_deref(), Some("hi there"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 5);
    }

    #[test]
    fn test_blocked_response_has_no_text() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();

        assert!(response.first_text().is_none());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }
}
