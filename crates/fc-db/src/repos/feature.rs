//! Feature request repository.

use fc_core::entities::FeatureRequest;
use fc_core::enums::{FeaturePriority, FeatureStatus};
use fc_core::ids::PREFIX_FEATURE;

use crate::FlowDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, now_micros, parse_datetime, parse_enum, sql_limit,
};

const SELECT_COLS: &str = "id, title, description, status, priority, votes, team_id, \
     created_by, created_at, updated_at";

/// Fields supplied when proposing a feature. New requests start with zero votes.
#[derive(Debug, Clone)]
pub struct NewFeatureRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: FeatureStatus,
    pub priority: FeaturePriority,
    pub team_id: String,
    pub created_by: String,
}

fn row_to_feature(row: &libsql::Row) -> Result<FeatureRequest, DatabaseError> {
    let votes = row.get::<i64>(5)?;
    Ok(FeatureRequest {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        priority: parse_enum(&row.get::<String>(4)?)?,
        votes: u32::try_from(votes)
            .map_err(|_| DatabaseError::Query(format!("invalid vote count {votes}")))?,
        team_id: row.get(6)?,
        created_by: row.get(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl FlowDb {
    pub async fn create_feature_request(
        &self,
        new: NewFeatureRequest,
    ) -> Result<FeatureRequest, DatabaseError> {
        let now = now_micros();
        let id = self.generate_id(PREFIX_FEATURE).await?;

        self.conn()
            .execute(
                "INSERT INTO feature_requests (id, title, description, status, priority, votes, team_id, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    new.title.as_str(),
                    new.description.as_deref(),
                    new.status.as_str(),
                    new.priority.as_str(),
                    new.team_id.as_str(),
                    new.created_by.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        Ok(FeatureRequest {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            votes: 0,
            team_id: new.team_id,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Feature requests of one team, newest first.
    pub async fn list_features(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM feature_requests WHERE team_id = ?1 \
                     ORDER BY julianday(created_at) DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![team_id, sql_limit(limit)],
            )
            .await?;

        let mut features = Vec::new();
        while let Some(row) = rows.next().await? {
            features.push(row_to_feature(&row)?);
        }
        Ok(features)
    }
}
