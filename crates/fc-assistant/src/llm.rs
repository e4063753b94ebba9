//! Chat-completion HTTP client.
//!
//! Speaks the OpenAI-style `POST {model, messages, temperature, max_tokens}`
//! protocol with bearer auth and reads `choices[0].message.content`. Every
//! request carries an explicit timeout. A request that fails to connect is
//! retried once after a short backoff; any other failure is returned as is.

use std::time::Duration;

use fc_config::LlmConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LlmError;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Client ─────────────────────────────────────────────────────────

pub struct LlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry_backoff: Duration,
}

impl LlmClient {
    /// Build a client for `config`, or `None` when no credential is set.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        if !config.is_configured() {
            return Ok(None);
        }
        Self::with_timeout(config, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    fn with_timeout(config: &LlmConfig, timeout: Duration) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("flowcaser/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a completion for one system and one user message.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport failure or timeout, a non-success
    /// status, a malformed body, or a blank completion.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        match self.send(system, user).await {
            Err(e) if e.is_connect() => {
                warn!(
                    %e,
                    backoff_ms = self.retry_backoff.as_millis(),
                    "completion request could not connect, retrying once"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.send(system, user).await
            }
            other => other,
        }
    }

    async fn send(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        parse_completion(&resp.text().await?)
    }
}

/// Return the response unchanged on success, [`LlmError::Api`] otherwise.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    if !resp.status().is_success() {
        return Err(LlmError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let data: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;
    let content = data
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".into()))?;
    if content.trim().is_empty() {
        return Err(LlmError::EmptyCompletion);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_key: "test-key".into(),
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            retry_backoff_ms: 10,
            ..Default::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn mock_response(status: u16) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body("upstream down")
                .unwrap(),
        )
    }

    #[test]
    fn no_credential_builds_no_client() {
        assert!(LlmClient::from_config(&LlmConfig::default()).unwrap().is_none());
    }

    #[tokio::test]
    async fn check_response_maps_non_success() {
        let err = check_response(mock_response(503)).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Api error, got: {other:?}"),
        }
        assert!(check_response(mock_response(200)).await.is_ok());
    }

    #[test]
    fn parse_rejects_missing_and_blank_content() {
        assert!(matches!(
            parse_completion(r#"{"choices": []}"#),
            Err(LlmError::Parse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": [{"message": {"content": "  "}}]}"#),
            Err(LlmError::EmptyCompletion)
        ));
        assert!(matches!(parse_completion("<html>"), Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn successful_completion_is_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 500
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("- Punkt 1\n- Punkt 2")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::from_config(&config_for(&server)).unwrap().unwrap();
        let text = client.complete("system", "Hej").await.unwrap();
        assert_eq!(text, "- Punkt 1\n- Punkt 2");
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::from_config(&config_for(&server)).unwrap().unwrap();
        let err = client.complete("system", "Hej").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn timeout_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("for sent"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client =
            LlmClient::with_timeout(&config_for(&server), Duration::from_millis(100)).unwrap();
        let err = client.complete("system", "Hej").await.unwrap_err();
        match err {
            LlmError::Http(e) => assert!(e.is_timeout(), "expected timeout, got: {e}"),
            other => panic!("expected Http error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_retried_then_returned() {
        let config = LlmConfig {
            api_key: "test-key".into(),
            endpoint: "http://127.0.0.1:1/v1/chat/completions".into(),
            retry_backoff_ms: 10,
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap().unwrap();
        let err = client.complete("system", "Hej").await.unwrap_err();
        assert!(err.is_connect(), "expected connect error, got: {err:?}");
    }
}
