//! # fc-db
//!
//! libSQL data access for FlowCaser.
//!
//! Holds the team records the assistant reads (bugs, feature requests,
//! knowledge cases, time logs) and the conversation log it appends to.
//! The assistant only sees this crate through the [`store::DataStore`] trait;
//! [`FlowDb`] is the libSQL implementation, backed by a local file, an
//! in-memory database, or a hosted remote database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod store;

use error::DatabaseError;
use fc_config::DatabaseConfig;
use libsql::Builder;

/// Central database handle for all FlowCaser state operations.
pub struct FlowDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl FlowDb {
    /// Open the database described by `config`: the hosted database when a
    /// URL and token are set, otherwise the local file (parent dirs are created).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            return Self::open_remote(&config.url, &config.auth_token).await;
        }
        if let Some(parent) = std::path::Path::new(&config.local_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::open_local(&config.local_path).await
    }

    /// Open a local-only database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let flow_db = Self {
            db,
            conn,
            remote: false,
        };
        flow_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(flow_db)
    }

    /// Open a hosted database over the network.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;

        let flow_db = Self {
            db,
            conn,
            remote: true,
        };
        flow_db.run_migrations().await?;
        tracing::debug!(url, "opened remote database");
        Ok(flow_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle talks to a hosted database.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"bug-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
