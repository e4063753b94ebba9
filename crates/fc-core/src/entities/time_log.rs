use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Hours logged by a team member on a given day.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TimeLog {
    pub id: String,
    pub description: String,
    pub hours: f64,
    pub date: NaiveDate,
    pub project: Option<String>,
    pub team_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeLog {
    /// Reject negative or non-finite hour values before they are stored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `hours` is negative, NaN, or infinite.
    pub fn validate_hours(hours: f64) -> Result<(), CoreError> {
        if hours.is_finite() && hours >= 0.0 {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "hours must be a non-negative number, got {hours}"
            )))
        }
    }
}
