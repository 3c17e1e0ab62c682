//! OpenRouter chat-completion backend.
//!
//! Posts a [`CompletionRequest`] to an OpenAI-compatible endpoint with bearer
//! authentication. The HTTP client carries the whole-request timeout, so a
//! stalled upstream surfaces as [`CompletionError::Timeout`].

use crate::backend::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::error::CompletionError;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default OpenRouter chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default bound on a single completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// An API key that never appears in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Configuration for the OpenRouter backend.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Chat completions URL.
    pub endpoint: String,
    /// Bearer key.
    pub api_key: ApiKey,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl OpenRouterConfig {
    /// Creates a configuration for the default endpoint and timeout.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
}

/// Completion backend talking to OpenRouter.
#[derive(Debug, Clone)]
pub struct OpenRouterBackend {
    config: OpenRouterConfig,
    client: reqwest::Client,
}

impl OpenRouterBackend {
    /// Creates a backend with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Unexpected`] if the HTTP client cannot be
    /// built.
    pub fn new(config: OpenRouterConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Unexpected {
                reason: format!("HTTP client error: {e}"),
            })?;

        Ok(Self { config, client })
    }
}

fn classify(error: &reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::RequestFailed {
            status: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Extracts the first choice's content from a response body.
fn parse_reply(body: &[u8]) -> Result<String, CompletionError> {
    let response: WireResponse =
        serde_json::from_slice(body).map_err(|e| CompletionError::MalformedResponse {
            reason: e.to_string(),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CompletionError::MalformedResponse {
            reason: "response has no reply content".to_string(),
        })
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    #[instrument(skip_all, fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| classify(&e))?;

        if !status.is_success() {
            return Err(CompletionError::RequestFailed {
                status: Some(status.as_u16()),
                reason: truncate(&String::from_utf8_lossy(&body)),
            });
        }

        let content = parse_reply(&body)?;
        debug!(reply_chars = content.chars().count(), "completion received");

        Ok(CompletionResponse { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatMessage, SamplingConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/api/v1/chat/completions";

    fn backend(server: &MockServer, timeout: Duration) -> OpenRouterBackend {
        let config = OpenRouterConfig::new(ApiKey::new("test-key"))
            .with_endpoint(format!("{}{PATH}", server.uri()))
            .with_timeout(timeout);
        OpenRouterBackend::new(config).expect("client builds")
    }

    fn request() -> CompletionRequest {
        let sampling = SamplingConfig {
            model: "test/model".to_string(),
            ..SamplingConfig::default()
        };
        CompletionRequest::build("persona", vec![ChatMessage::user("Chekhov?")], &sampling)
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = OpenRouterConfig::new(ApiKey::new("sk-secret"));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn parse_reply_rejects_missing_content() {
        assert!(matches!(
            parse_reply(br#"{"choices":[]}"#),
            Err(CompletionError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_reply(br#"{"choices":[{"message":{"content":"  "}}]}"#),
            Err(CompletionError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_reply(b"not json"),
            Err(CompletionError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn successful_completion_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "system": "persona",
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "Chekhov?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "A playwright."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = backend(&server, DEFAULT_TIMEOUT)
            .complete(&request())
            .await
            .expect("completion succeeds");

        assert_eq!(reply.content, "A playwright.");
    }

    #[tokio::test]
    async fn non_success_status_is_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = backend(&server, DEFAULT_TIMEOUT)
            .complete(&request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CompletionError::RequestFailed {
                status: Some(500),
                reason: "upstream exploded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = backend(&server, DEFAULT_TIMEOUT)
            .complete(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = backend(&server, Duration::from_millis(100))
            .complete(&request())
            .await
            .unwrap_err();

        assert_eq!(err, CompletionError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_failure() {
        let config = OpenRouterConfig::new(ApiKey::new("k"))
            .with_endpoint("http://127.0.0.1:9/unreachable")
            .with_timeout(Duration::from_secs(5));
        let backend = OpenRouterBackend::new(config).expect("client builds");

        let err = backend.complete(&request()).await.unwrap_err();

        assert!(matches!(err, CompletionError::RequestFailed { status: None, .. }));
    }
}
