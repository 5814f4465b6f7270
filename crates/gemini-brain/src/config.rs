//! Configuration for GeminiBrain.

use std::env;
use std::time::Duration;

use brain_core::BrainError;

/// Default Gemini REST endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Configuration for GeminiBrain.
#[derive(Debug, Clone)]
pub struct GeminiBrainConfig {
    /// Gemini API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_output_tokens: Option<u32>,

    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for GeminiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl GeminiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key (`GEMINI_API_KEY:` is accepted for old dotenv files)
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-pro)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: backend default)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max output tokens (default: backend default)
    /// - `GEMINI_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 60)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY:"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok());

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok());

        let request_timeout = env::var("GEMINI_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Ok(Self {
            api_url,
            api_key: api_key.trim().to_string(),
            model,
            temperature,
            max_output_tokens,
            request_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiBrainConfigBuilder {
        GeminiBrainConfigBuilder::default()
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Builder for GeminiBrainConfig.
#[derive(Debug, Default)]
pub struct GeminiBrainConfigBuilder {
    config: GeminiBrainConfig,
}

impl GeminiBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the max output tokens.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = Some(tokens);
        self
    }

    /// Set the HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiBrainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiBrainConfig::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!(config.temperature.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_all_options() {
        let config = GeminiBrainConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com/")
            .model("gemini-2.0-flash")
            .temperature(0.5)
            .max_output_tokens(256)
            .request_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_output_tokens, Some(256));
        assert_eq!(
            config.generate_url(),
            "https://custom.api.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_gemini_vars() {
            for key in [
                "GEMINI_API_KEY",
                "GEMINI_API_KEY:",
                "GEMINI_API_URL",
                "GEMINI_MODEL",
                "GEMINI_TEMPERATURE",
                "GEMINI_MAX_OUTPUT_TOKENS",
                "GEMINI_REQUEST_TIMEOUT_SECS",
            ] {
                std::env::remove_var(key);
            }
        }

        // Missing API key should error
        clear_all_gemini_vars();
        match GeminiBrainConfig::from_env() {
            Err(BrainError::Configuration(msg)) => assert!(msg.contains("GEMINI_API_KEY")),
            other => panic!("Expected Configuration error, got {:?}", other.map(|_| ())),
        }

        // Legacy key with trailing colon
        clear_all_gemini_vars();
        std::env::set_var("GEMINI_API_KEY:", " legacy-key ");
        let config = GeminiBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key, "legacy-key");
        assert_eq!(config.model, DEFAULT_MODEL);

        // All vars set
        clear_all_gemini_vars();
        std::env::set_var("GEMINI_API_KEY", "env-key");
        std::env::set_var("GEMINI_MODEL", "gemini-2.0-flash");
        std::env::set_var("GEMINI_TEMPERATURE", "0.9");
        std::env::set_var("GEMINI_MAX_OUTPUT_TOKENS", "512");
        std::env::set_var("GEMINI_REQUEST_TIMEOUT_SECS", "10");
        let config = GeminiBrainConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.max_output_tokens, Some(512));
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        clear_all_gemini_vars();
    }
}
