use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{BugPriority, BugStatus};

/// A bug report filed by a team member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Bug {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub assigned_to: Option<String>,
    pub team_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
