//! Configuration for the HTTP oracle client.

use std::time::Duration;

/// Default Ollama server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";

/// Connection settings for an Ollama-compatible oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    /// Server base URL, without a trailing path.
    pub base_url: String,
    /// Model to generate with.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound for one request, connect to last byte.
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.4,
            timeout: Duration::from_secs(120),
        }
    }
}

impl OracleConfig {
    /// Set the server base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (clamped to 0.0-2.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// URL of the model listing endpoint.
    pub fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }
}
