use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;

// Constants for the Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma2:2b";
pub const GENERATE_PATH: &str = "/api/generate";

/// The one failure kind a generation request can produce. The caller is
/// expected to surface it to the user, not retry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(StatusCode),

    #[error("response missing completion text")]
    MalformedResponse,
}

/// A backend that turns one prompt into one completion.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<String, TransportError>;

    /// Human-readable backend name, used in the failure notice shown to
    /// the user.
    fn backend_name(&self) -> &str;

    /// Identifier of the model the backend generates with.
    fn model(&self) -> &str;
}

/// Non-streaming client for a local Ollama server. Holds no state across
/// calls beyond its configuration.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn send(&self, prompt: &str) -> Result<String, TransportError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .http
            .post(format!("{}{}", self.base_url, GENERATE_PATH))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let body: Value = response.json().await?;
        let completion = body["response"]
            .as_str()
            .ok_or(TransportError::MalformedResponse)?;

        debug!(
            "{} returned {} chars for model {}",
            self.base_url,
            completion.len(),
            self.model
        );
        Ok(completion.to_string())
    }

    fn backend_name(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn send_extracts_the_completion_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "prompt": "hi",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": DEFAULT_MODEL,
                "response": "hello",
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), DEFAULT_MODEL);
        let completion = client.send("hi").await.unwrap();
        assert_eq!(completion, "hello");
    }

    #[tokio::test]
    async fn send_fails_on_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), DEFAULT_MODEL);
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Status(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }

    #[tokio::test]
    async fn send_fails_on_payload_without_completion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": DEFAULT_MODEL,
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), DEFAULT_MODEL);
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse));
    }

    #[tokio::test]
    async fn send_fails_when_the_backend_is_unreachable() {
        // Nothing listens on the mock server's port once it is dropped.
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        let client = OllamaClient::new(uri, DEFAULT_MODEL);
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
