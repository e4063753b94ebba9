//! Assistant behavior configuration.

use serde::{Deserialize, Serialize};

/// How the assistant picks records for its context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextStrategy {
    /// Per-intent substring filter with fixed caps.
    #[default]
    Keyword,
    /// Word-length relevance across all collections, top 10 overall.
    Relevance,
}

const fn default_history_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub strategy: ContextStrategy,

    /// Fixed seed for template selection. `None` seeds from the OS.
    #[serde(default)]
    pub template_seed: Option<u64>,

    /// Default number of turns returned by history reads.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            strategy: ContextStrategy::default(),
            template_seed: None,
            history_limit: default_history_limit(),
        }
    }
}
