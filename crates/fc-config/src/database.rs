//! Backend database configuration.

use serde::{Deserialize, Serialize};

fn default_local_path() -> String {
    String::from(".flowcaser/flowcaser.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Hosted database URL (e.g., `libsql://team.turso.io`). Empty = local file.
    #[serde(default)]
    pub url: String,

    /// Auth token for the hosted database.
    #[serde(default)]
    pub auth_token: String,

    /// Path of the local database file, used when `url` is empty.
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: String::new(),
            local_path: default_local_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the hosted backend is configured (URL and token both set).
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}
