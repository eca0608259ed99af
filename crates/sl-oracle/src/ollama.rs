//! Blocking HTTP client for an Ollama server.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::Oracle;
use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<serde_json::Value>,
}

/// An [`Oracle`] backed by Ollama's `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    config: OracleConfig,
}

impl OllamaClient {
    /// Build a client. The configured timeout bounds every request.
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The client's configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn request_body(&self, system_prompt: &str, payload: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.config.model,
            prompt: format!("{system_prompt}\n\nUSER_INPUT:\n{payload}"),
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        }
    }

    /// Check that the server is reachable and report how many models it has.
    pub fn test_connection(&self) -> OracleResult<String> {
        let resp = self.client.get(self.config.tags_url()).send()?;
        if !resp.status().is_success() {
            return Err(OracleError::Status(resp.status().as_u16()));
        }
        let tags: TagsResponse = resp.json()?;
        Ok(format!("Connected ({} models available)", tags.models.len()))
    }
}

impl Oracle for OllamaClient {
    fn generate(&self, system_prompt: &str, payload: &str) -> OracleResult<String> {
        let body = self.request_body(system_prompt, payload);
        tracing::debug!(model = %self.config.model, bytes = body.prompt.len(), "oracle request");

        let resp = self
            .client
            .post(self.config.generate_url())
            .json(&body)
            .send()?;
        if !resp.status().is_success() {
            return Err(OracleError::Status(resp.status().as_u16()));
        }

        let reply: GenerateResponse = resp.json()?;
        Ok(reply.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let client = OllamaClient::new(OracleConfig::default().with_model("mistral")).unwrap();
        let body = client.request_body("You are the guard.", "{\"player_action\": \"wave\"}");
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "mistral");
        assert_eq!(v["stream"], false);
        assert_eq!(
            v["prompt"],
            "You are the guard.\n\nUSER_INPUT:\n{\"player_action\": \"wave\"}"
        );
        assert!(v["options"]["temperature"].as_f64().unwrap() > 0.39);
    }

    #[test]
    fn response_without_text_is_empty() {
        let reply: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(reply.response.is_empty());
    }

    #[test]
    fn unreachable_server_is_transport_error() {
        let config = OracleConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(std::time::Duration::from_millis(500));
        let client = OllamaClient::new(config).unwrap();
        let err = client.generate("sys", "{}").unwrap_err();
        assert!(matches!(err, OracleError::Transport(_)));
    }
}
