//! The assistant facade: one call from query text to a logged reply.

use std::sync::Arc;

use fc_config::{ContextStrategy, FlowConfig};
use fc_core::entities::{ConversationTurn, NewConversationTurn};
use fc_core::enums::Intent;
use fc_db::store::DataStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::context::ContextAssembler;
use crate::conversation::ConversationLog;
use crate::error::AssistantError;
use crate::generator::{AssistantMessage, ReplySource, ResponseGenerator};
use crate::intent::classify_intent;

/// The outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub content: String,
    pub source: ReplySource,
    /// Records the reply was built from.
    pub context_size: usize,
    /// `false` when the query matched no record and recent ones were used.
    pub matched: bool,
}

pub struct Assistant {
    assembler: Arc<ContextAssembler>,
    generator: Arc<ResponseGenerator>,
    log: ConversationLog,
    history_limit: u32,
}

impl Assistant {
    /// Build an assistant over `store` configured by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Llm`] if the completion client cannot be built.
    pub fn new(store: Arc<dyn DataStore>, config: &FlowConfig) -> Result<Self, AssistantError> {
        let generator = ResponseGenerator::from_config(config)?;
        Ok(Self::from_parts(
            store,
            generator,
            config.assistant.strategy,
            config.assistant.history_limit,
        ))
    }

    #[must_use]
    pub fn from_parts(
        store: Arc<dyn DataStore>,
        generator: ResponseGenerator,
        strategy: ContextStrategy,
        history_limit: u32,
    ) -> Self {
        Self {
            assembler: Arc::new(ContextAssembler::new(Arc::clone(&store), strategy)),
            generator: Arc::new(generator),
            log: ConversationLog::new(store),
            history_limit,
        }
    }

    /// Answer `query` for `user_id` in `team_id` and log both turns.
    ///
    /// The user turn is stored concurrently with building the reply, so a
    /// failure there never loses the user's message. Never fails: store and
    /// model errors degrade to fewer records, a template, or the apology.
    pub async fn ask(&self, team_id: &str, user_id: &str, query: &str) -> AssistantReply {
        let intent = classify_intent(query);
        debug!(team_id, %intent, "classified query");

        let user_turn = NewConversationTurn::user(team_id, user_id, query);
        let (_, reply) = tokio::join!(
            self.log.append(user_turn),
            self.reply(team_id, query, intent)
        );

        self.log
            .append(NewConversationTurn::assistant(team_id, &reply.content))
            .await;

        info!(
            team_id,
            %intent,
            source = %reply.source,
            context_size = reply.context_size,
            "assistant replied"
        );
        reply
    }

    /// Build a reply without touching the conversation log.
    pub async fn respond(&self, team_id: &str, query: &str) -> AssistantReply {
        self.reply(team_id, query, classify_intent(query)).await
    }

    /// The latest turns of `team_id`, oldest first. `None` uses the
    /// configured history limit.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Database`] if the store cannot be read.
    pub async fn history(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ConversationTurn>, AssistantError> {
        self.log
            .history(team_id, limit.unwrap_or(self.history_limit))
            .await
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.generator.is_remote()
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationLog {
        &self.log
    }

    /// Assemble and generate on a separate task so a panic in either step
    /// becomes the apology instead of unwinding into the caller.
    async fn reply(&self, team_id: &str, query: &str, intent: Intent) -> AssistantReply {
        let assembler = Arc::clone(&self.assembler);
        let generator = Arc::clone(&self.generator);
        let team = team_id.to_string();
        let text = query.to_string();

        let task = tokio::spawn(async move {
            let bundle = assembler.assemble(&text, intent, &team).await;
            let message = generator.generate(&text, &bundle, intent).await;
            (message, bundle.len(), bundle.matched)
        });

        match task.await {
            Ok((message, context_size, matched)) => AssistantReply {
                intent,
                content: message.content,
                source: message.source,
                context_size,
                matched,
            },
            Err(e) => {
                warn!(team_id, %intent, %e, "reply task failed, using apology");
                let message = AssistantMessage::apology();
                AssistantReply {
                    intent,
                    content: message.content,
                    source: message.source,
                    context_size: 0,
                    matched: false,
                }
            }
        }
    }
}
