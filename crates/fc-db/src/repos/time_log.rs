//! Time log repository.

use chrono::NaiveDate;

use fc_core::entities::TimeLog;
use fc_core::ids::PREFIX_TIME_LOG;

use crate::FlowDb;
use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, now_micros, parse_date, parse_datetime, sql_limit,
};

const SELECT_COLS: &str =
    "id, description, hours, date, project, team_id, user_id, created_at, updated_at";

/// Fields supplied when logging time.
#[derive(Debug, Clone)]
pub struct NewTimeLog {
    pub description: String,
    pub hours: f64,
    pub date: NaiveDate,
    pub project: Option<String>,
    pub team_id: String,
    pub user_id: String,
}

fn row_to_time_log(row: &libsql::Row) -> Result<TimeLog, DatabaseError> {
    Ok(TimeLog {
        id: row.get(0)?,
        description: row.get(1)?,
        hours: row.get(2)?,
        date: parse_date(&row.get::<String>(3)?)?,
        project: get_opt_string(row, 4)?,
        team_id: row.get(5)?,
        user_id: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl FlowDb {
    /// Log hours. Negative or non-finite hours are rejected before the insert.
    pub async fn create_time_log(&self, new: NewTimeLog) -> Result<TimeLog, DatabaseError> {
        TimeLog::validate_hours(new.hours)?;

        let now = now_micros();
        let id = self.generate_id(PREFIX_TIME_LOG).await?;

        self.conn()
            .execute(
                "INSERT INTO time_logs (id, description, hours, date, project, team_id, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    new.description.as_str(),
                    new.hours,
                    new.date.format("%Y-%m-%d").to_string(),
                    new.project.as_deref(),
                    new.team_id.as_str(),
                    new.user_id.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        Ok(TimeLog {
            id,
            description: new.description,
            hours: new.hours,
            date: new.date,
            project: new.project,
            team_id: new.team_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Time logs of one team, newest first.
    pub async fn list_time_logs(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<TimeLog>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM time_logs WHERE team_id = ?1 \
                     ORDER BY julianday(created_at) DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![team_id, sql_limit(limit)],
            )
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(row_to_time_log(&row)?);
        }
        Ok(logs)
    }
}
