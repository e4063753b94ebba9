use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ConversationRole;

/// One persisted message in a team's assistant conversation.
///
/// Turns are immutable once stored and read back oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConversationTurn {
    pub id: String,
    pub content: String,
    pub role: ConversationRole,
    pub team_id: String,
    /// `None` for assistant turns.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A turn that has not been stored yet. The backend assigns the ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewConversationTurn {
    pub content: String,
    pub role: ConversationRole,
    pub team_id: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewConversationTurn {
    /// A message typed by `user_id`, stamped now.
    #[must_use]
    pub fn user(team_id: &str, user_id: &str, content: &str) -> Self {
        Self {
            content: content.to_string(),
            role: ConversationRole::User,
            team_id: team_id.to_string(),
            user_id: Some(user_id.to_string()),
            created_at: Utc::now(),
        }
    }

    /// An assistant reply, stamped now.
    #[must_use]
    pub fn assistant(team_id: &str, content: &str) -> Self {
        Self {
            content: content.to_string(),
            role: ConversationRole::Assistant,
            team_id: team_id.to_string(),
            user_id: None,
            created_at: Utc::now(),
        }
    }
}
