//! Google Cloud Text-to-Speech synthesizer.

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use brain_core::{async_trait, BrainError, SpeechSynthesizer};
use reqwest::Client;
use tracing::debug;

use crate::api_types::{AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelection};

/// Default Cloud TTS endpoint.
pub const DEFAULT_TTS_URL: &str = "https://texttospeech.googleapis.com";

/// Configuration for [`GoogleSpeech`].
#[derive(Debug, Clone)]
pub struct GoogleSpeechConfig {
    /// API key for the Text-to-Speech API.
    pub api_key: String,
    /// API base URL.
    pub api_url: String,
    /// Directory where synthesized mp3 files are written.
    pub output_dir: PathBuf,
}

impl GoogleSpeechConfig {
    /// Create a config with the default endpoint.
    pub fn new(api_key: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_TTS_URL.to_string(),
            output_dir: output_dir.into(),
        }
    }

    /// Load from `GOOGLE_TTS_API_KEY`. Returns `None` when the key is unset,
    /// which leaves speech synthesis disabled.
    pub fn from_env(output_dir: impl Into<PathBuf>) -> Option<Self> {
        env::var("GOOGLE_TTS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(key.trim(), output_dir))
    }
}

/// Speech synthesizer that renders replies to mp3 files.
pub struct GoogleSpeech {
    client: Client,
    config: GoogleSpeechConfig,
    counter: AtomicU64,
}

impl GoogleSpeech {
    /// Create a new synthesizer.
    pub fn new(config: GoogleSpeechConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            counter: AtomicU64::new(0),
        })
    }

    fn next_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.config.output_dir.join(format!("reply-{}.mp3", n))
    }

    /// Decode the base64 audio payload and write it to a fresh file.
    async fn write_audio(&self, audio_content: &str) -> Result<PathBuf, BrainError> {
        let bytes = STANDARD
            .decode(audio_content)
            .map_err(|e| BrainError::ProcessingFailed(format!("Invalid audio payload: {}", e)))?;

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to create audio dir: {}", e)))?;

        let path = self.next_path();
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to write audio: {}", e)))?;

        debug!("Wrote synthesized audio to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<PathBuf, BrainError> {
        let url = format!(
            "{}/v1/text:synthesize",
            self.config.api_url.trim_end_matches('/')
        );
        let request = SynthesizeRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelection {
                language_code: language_code.to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send TTS request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrainError::ProcessingFailed(format!(
                "TTS error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse TTS response: {}", e)))?;

        self.write_audio(&payload.audio_content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_audio_creates_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let speech = GoogleSpeech::new(GoogleSpeechConfig::new("k", dir.path().join("tts"))).unwrap();

        let encoded = STANDARD.encode(b"ID3fake");
        let first = speech.write_audio(&encoded).await.unwrap();
        let second = speech.write_audio(&encoded).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"ID3fake");
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("mp3"));
    }

    #[tokio::test]
    async fn test_write_audio_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let speech = GoogleSpeech::new(GoogleSpeechConfig::new("k", dir.path())).unwrap();

        let result = speech.write_audio("not base64!!").await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_synthesize_unreachable_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GoogleSpeechConfig::new("k", dir.path());
        config.api_url = "http://127.0.0.1:1".to_string();
        let speech = GoogleSpeech::new(config).unwrap();

        let result = speech.synthesize("hello", "en-US").await;
        assert!(matches!(result, Err(BrainError::Network(_))));
    }
}
