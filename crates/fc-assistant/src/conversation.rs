//! The team's persisted conversation with the assistant.

use std::sync::Arc;

use fc_core::entities::{ConversationTurn, NewConversationTurn};
use fc_db::store::DataStore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AssistantError;

/// Append-only access to the conversation log.
///
/// Appends never fail from the caller's point of view: a store error is
/// logged and the turn is dropped.
#[derive(Clone)]
pub struct ConversationLog {
    store: Arc<dyn DataStore>,
}

impl ConversationLog {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Store one turn. Returns the stored turn, or `None` if the store failed.
    pub async fn append(&self, turn: NewConversationTurn) -> Option<ConversationTurn> {
        match self.store.append_conversation_turn(&turn).await {
            Ok(stored) => {
                debug!(
                    id = %stored.id,
                    team_id = %stored.team_id,
                    role = %stored.role,
                    "appended turn"
                );
                Some(stored)
            }
            Err(e) => {
                warn!(
                    team_id = %turn.team_id,
                    role = %turn.role,
                    %e,
                    "failed to append conversation turn"
                );
                None
            }
        }
    }

    /// Store one turn in the background. The caller may drop the handle.
    pub fn spawn_append(
        &self,
        turn: NewConversationTurn,
    ) -> JoinHandle<Option<ConversationTurn>> {
        let log = self.clone();
        tokio::spawn(async move { log.append(turn).await })
    }

    /// The latest `limit` turns of `team_id`, oldest first.
    ///
    /// Each call reads a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Database`] if the store cannot be read.
    pub async fn history(
        &self,
        team_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, AssistantError> {
        Ok(self.store.load_conversation_history(team_id, limit).await?)
    }
}
