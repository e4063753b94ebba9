//! Entity structs for every FlowCaser record the assistant reads or writes.
//!
//! Each entity maps to a table in the backend database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod bug;
mod conversation;
mod feature;
mod knowledge;
mod time_log;

pub use bug::Bug;
pub use conversation::{ConversationTurn, NewConversationTurn};
pub use feature::FeatureRequest;
pub use knowledge::KnowledgeCase;
pub use time_log::TimeLog;
