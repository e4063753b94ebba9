use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FeaturePriority, FeatureStatus};

/// A feature request the team votes on.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FeatureRequest {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: FeatureStatus,
    pub priority: FeaturePriority,
    /// Only ever incremented by user votes.
    pub votes: u32,
    pub team_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
