//! The backend seam the assistant depends on.
//!
//! [`DataStore`] is every read and write the assistant needs from the hosted
//! backend: team-scoped collection reads plus the append-only conversation
//! log. The assistant takes it as `Arc<dyn DataStore>` so tests can swap in
//! fakes.

use async_trait::async_trait;

use fc_core::entities::{
    Bug, ConversationTurn, FeatureRequest, KnowledgeCase, NewConversationTurn, TimeLog,
};

use crate::FlowDb;
use crate::error::DatabaseError;

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Bugs of `team_id` in storage order (newest first), at most `limit`.
    async fn list_bugs(&self, team_id: &str, limit: Option<u32>)
    -> Result<Vec<Bug>, DatabaseError>;

    async fn list_features(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError>;

    async fn list_knowledge(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<KnowledgeCase>, DatabaseError>;

    async fn list_time_logs(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<TimeLog>, DatabaseError>;

    /// Persist one turn and return it with its assigned ID.
    async fn append_conversation_turn(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, DatabaseError>;

    /// The latest `limit` turns of `team_id`, oldest first.
    async fn load_conversation_history(
        &self,
        team_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, DatabaseError>;
}

#[async_trait]
impl DataStore for FlowDb {
    async fn list_bugs(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Bug>, DatabaseError> {
        Self::list_bugs(self, team_id, limit).await
    }

    async fn list_features(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError> {
        Self::list_features(self, team_id, limit).await
    }

    async fn list_knowledge(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<KnowledgeCase>, DatabaseError> {
        Self::list_knowledge(self, team_id, limit).await
    }

    async fn list_time_logs(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<TimeLog>, DatabaseError> {
        Self::list_time_logs(self, team_id, limit).await
    }

    async fn append_conversation_turn(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, DatabaseError> {
        self.append_turn(turn).await
    }

    async fn load_conversation_history(
        &self,
        team_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, DatabaseError> {
        self.load_history(team_id, limit).await
    }
}
