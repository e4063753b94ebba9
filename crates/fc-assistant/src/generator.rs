//! Reply generation: remote model first, local templates on any failure.

use std::sync::Arc;

use fc_config::FlowConfig;
use fc_core::enums::Intent;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::ContextBundle;
use crate::error::LlmError;
use crate::llm::LlmClient;
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::templates::{APOLOGY, RandomSource, RngSource, TemplateRenderer};

/// Where a reply's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Completion text from the remote model.
    Remote,
    /// A local template.
    Template,
    /// The fixed apology.
    Apology,
}

impl ReplySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Template => "template",
            Self::Apology => "apology",
        }
    }
}

impl std::fmt::Display for ReplySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated reply. `content` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: String,
    pub source: ReplySource,
}

impl AssistantMessage {
    #[must_use]
    pub fn apology() -> Self {
        Self {
            content: APOLOGY.to_string(),
            source: ReplySource::Apology,
        }
    }
}

/// Produces replies from a context bundle.
///
/// Remote mode is on exactly when an [`LlmClient`] is present. Without one
/// no network call is made.
pub struct ResponseGenerator {
    llm: Option<LlmClient>,
    templates: TemplateRenderer,
}

impl ResponseGenerator {
    #[must_use]
    pub fn new(llm: Option<LlmClient>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            llm,
            templates: TemplateRenderer::new(random),
        }
    }

    /// Generator for `config`: remote mode when `llm.api_key` is set, and
    /// template choice seeded from `assistant.template_seed`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the HTTP client cannot be built.
    pub fn from_config(config: &FlowConfig) -> Result<Self, LlmError> {
        let llm = LlmClient::from_config(&config.llm)?;
        let random = Arc::new(RngSource::from_seed(config.assistant.template_seed));
        Ok(Self::new(llm, random))
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.llm.is_some()
    }

    /// Generate a reply. Never fails and never returns blank text.
    pub async fn generate(
        &self,
        query: &str,
        bundle: &ContextBundle,
        intent: Intent,
    ) -> AssistantMessage {
        if let Some(llm) = &self.llm {
            let user_prompt = build_user_prompt(query, intent, bundle);
            match llm.complete(SYSTEM_PROMPT, &user_prompt).await {
                Ok(content) => {
                    debug!(%intent, model = llm.model(), "remote completion succeeded");
                    return AssistantMessage {
                        content,
                        source: ReplySource::Remote,
                    };
                }
                Err(e) => warn!(%intent, %e, "remote completion failed, using template"),
            }
        }
        self.render_template(query, bundle, intent)
    }

    fn render_template(
        &self,
        query: &str,
        bundle: &ContextBundle,
        intent: Intent,
    ) -> AssistantMessage {
        let content = self.templates.render(query, intent, bundle);
        if content.trim().is_empty() {
            warn!(%intent, "template rendered blank text, using apology");
            return AssistantMessage::apology();
        }
        AssistantMessage {
            content,
            source: ReplySource::Template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::FixedSource;
    use fc_config::LlmConfig;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn local() -> ResponseGenerator {
        ResponseGenerator::new(None, Arc::new(FixedSource(0)))
    }

    fn remote(server: &MockServer) -> ResponseGenerator {
        let config = LlmConfig {
            api_key: "test-key".into(),
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            ..Default::default()
        };
        ResponseGenerator::new(
            LlmClient::from_config(&config).unwrap(),
            Arc::new(FixedSource(0)),
        )
    }

    #[tokio::test]
    async fn local_mode_uses_templates() {
        let generator = local();
        assert!(!generator.is_remote());
        let bundle = ContextBundle::empty(Intent::Bugs);
        let reply = generator.generate("bug", &bundle, Intent::Bugs).await;
        assert_eq!(reply.source, ReplySource::Template);
        assert!(reply.content.contains("bug-rapport"));
    }

    #[tokio::test]
    async fn remote_text_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "- Ingen åbne bugs"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = remote(&server);
        assert!(generator.is_remote());
        let reply = generator
            .generate("bugs", &ContextBundle::empty(Intent::Bugs), Intent::Bugs)
            .await;
        assert_eq!(
            reply,
            AssistantMessage {
                content: "- Ingen åbne bugs".into(),
                source: ReplySource::Remote,
            }
        );
    }

    #[tokio::test]
    async fn malformed_remote_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let reply = remote(&server)
            .generate("guide", &ContextBundle::empty(Intent::Knowledge), Intent::Knowledge)
            .await;
        assert_eq!(reply.source, ReplySource::Template);
        assert!(reply.content.contains("videnscase"));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out_to_template() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "choices": [{"message": {"content": "for sent"}}]
                    }))
                    .set_delay(Duration::from_secs(5)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            api_key: "test-key".into(),
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            timeout_secs: 1,
            ..Default::default()
        };
        let generator = ResponseGenerator::new(
            LlmClient::from_config(&config).unwrap(),
            Arc::new(FixedSource(0)),
        );

        let mut bundle = ContextBundle::empty(Intent::Knowledge);
        bundle.matched = true;
        let reply = generator.generate("guide", &bundle, Intent::Knowledge).await;
        assert_eq!(reply.source, ReplySource::Template);
        assert!(reply.content.contains("videnscase"), "{}", reply.content);
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(serde_json::to_value(ReplySource::Apology).unwrap(), "apology");
        assert_eq!(ReplySource::Remote.to_string(), "remote");
    }
}
