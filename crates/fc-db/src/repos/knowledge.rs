//! Knowledge case repository.

use fc_core::entities::KnowledgeCase;
use fc_core::ids::PREFIX_KNOWLEDGE;

use crate::FlowDb;
use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now_micros, parse_datetime, parse_tags, sql_limit};

const SELECT_COLS: &str =
    "id, title, content, category, tags, team_id, created_by, created_at, updated_at";

/// Fields supplied when writing a knowledge case.
#[derive(Debug, Clone)]
pub struct NewKnowledgeCase {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub team_id: String,
    pub created_by: String,
}

fn row_to_knowledge(row: &libsql::Row) -> Result<KnowledgeCase, DatabaseError> {
    Ok(KnowledgeCase {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        tags: parse_tags(&row.get::<String>(4)?)?,
        team_id: row.get(5)?,
        created_by: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl FlowDb {
    pub async fn create_knowledge_case(
        &self,
        new: NewKnowledgeCase,
    ) -> Result<KnowledgeCase, DatabaseError> {
        let now = now_micros();
        let id = self.generate_id(PREFIX_KNOWLEDGE).await?;
        let tags = serde_json::to_string(&new.tags).map_err(|e| DatabaseError::Other(e.into()))?;

        self.conn()
            .execute(
                "INSERT INTO knowledge_cases (id, title, content, category, tags, team_id, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    new.title.as_str(),
                    new.content.as_str(),
                    new.category.as_str(),
                    tags,
                    new.team_id.as_str(),
                    new.created_by.as_str(),
                    format_datetime(&now),
                    format_datetime(&now)
                ],
            )
            .await?;

        Ok(KnowledgeCase {
            id,
            title: new.title,
            content: new.content,
            category: new.category,
            tags: new.tags,
            team_id: new.team_id,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Knowledge cases of one team, newest first.
    pub async fn list_knowledge(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<KnowledgeCase>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM knowledge_cases WHERE team_id = ?1 \
                     ORDER BY julianday(created_at) DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![team_id, sql_limit(limit)],
            )
            .await?;

        let mut cases = Vec::new();
        while let Some(row) = rows.next().await? {
            cases.push(row_to_knowledge(&row)?);
        }
        Ok(cases)
    }
}
