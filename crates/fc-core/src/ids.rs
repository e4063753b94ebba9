//! ID prefixes for every persisted entity.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by the database.

pub const PREFIX_BUG: &str = "bug";
pub const PREFIX_FEATURE: &str = "fea";
pub const PREFIX_KNOWLEDGE: &str = "kno";
pub const PREFIX_TIME_LOG: &str = "tim";
pub const PREFIX_MESSAGE: &str = "msg";
