//! Conversation log repository. Turns are append-only.

use chrono::SubsecRound;

use fc_core::entities::{ConversationTurn, NewConversationTurn};
use fc_core::ids::PREFIX_MESSAGE;

use crate::FlowDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum};

const SELECT_COLS: &str = "id, content, role, team_id, user_id, created_at";

fn row_to_turn(row: &libsql::Row) -> Result<ConversationTurn, DatabaseError> {
    Ok(ConversationTurn {
        id: row.get(0)?,
        content: row.get(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        team_id: row.get(3)?,
        user_id: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl FlowDb {
    pub async fn append_turn(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, DatabaseError> {
        let id = self.generate_id(PREFIX_MESSAGE).await?;
        let created_at = turn.created_at.trunc_subsecs(6);

        self.conn()
            .execute(
                "INSERT INTO chat_messages (id, content, role, team_id, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    turn.content.as_str(),
                    turn.role.as_str(),
                    turn.team_id.as_str(),
                    turn.user_id.as_deref(),
                    format_datetime(&created_at)
                ],
            )
            .await?;

        Ok(ConversationTurn {
            id,
            content: turn.content.clone(),
            role: turn.role,
            team_id: turn.team_id.clone(),
            user_id: turn.user_id.clone(),
            created_at,
        })
    }

    /// The latest `limit` turns of a team, returned oldest first.
    pub async fn load_history(
        &self,
        team_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM chat_messages WHERE team_id = ?1 \
                     ORDER BY julianday(created_at) DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![team_id, i64::from(limit)],
            )
            .await?;

        let mut turns = Vec::new();
        while let Some(row) = rows.next().await? {
            turns.push(row_to_turn(&row)?);
        }
        turns.reverse();
        Ok(turns)
    }
}
