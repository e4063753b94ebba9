//! Bug repository.

use fc_core::entities::Bug;
use fc_core::enums::{BugPriority, BugStatus};
use fc_core::ids::PREFIX_BUG;

use crate::FlowDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, now_micros, parse_datetime, parse_enum, sql_limit,
};

const SELECT_COLS: &str = "id, title, description, status, priority, assigned_to, team_id, \
     created_by, created_at, updated_at";

/// Fields supplied when filing a bug.
#[derive(Debug, Clone)]
pub struct NewBug {
    pub title: String,
    pub description: Option<String>,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub assigned_to: Option<String>,
    pub team_id: String,
    pub created_by: String,
}

fn row_to_bug(row: &libsql::Row) -> Result<Bug, DatabaseError> {
    Ok(Bug {
        id: row.get(0)?,
        title: row.get(1)?,
        description: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        priority: parse_enum(&row.get::<String>(4)?)?,
        assigned_to: get_opt_string(row, 5)?,
        team_id: row.get(6)?,
        created_by: row.get(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl FlowDb {
    pub async fn create_bug(&self, new: NewBug) -> Result<Bug, DatabaseError> {
        let now = now_micros();
        let id = self.generate_id(PREFIX_BUG).await?;

        self.conn()
            .execute(
                "INSERT INTO bugs (id, title, description, status, priority, assigned_to, team_id, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    id.as_str(),
                    new.title.as_str(),
                    new.description.as_deref(),
                    new.status.as_str(),
                    new.priority.as_str(),
                    new.assigned_to.as_deref(),
                    new.team_id.as_str(),
                    new.created_by.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        Ok(Bug {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            assigned_to: new.assigned_to,
            team_id: new.team_id,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Bugs of one team, newest first.
    pub async fn list_bugs(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Bug>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM bugs WHERE team_id = ?1 \
                     ORDER BY julianday(created_at) DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![team_id, sql_limit(limit)],
            )
            .await?;

        let mut bugs = Vec::new();
        while let Some(row) = rows.next().await? {
            bugs.push(row_to_bug(&row)?);
        }
        Ok(bugs)
    }
}
