use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A knowledge base article ("case").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct KnowledgeCase {
    pub id: String,
    pub title: String,
    /// Free text, may contain lightweight markup.
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub team_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
