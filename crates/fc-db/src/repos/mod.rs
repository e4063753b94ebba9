//! Repository modules for every FlowCaser table.
//!
//! Each module adds methods to `FlowDb` via `impl FlowDb` blocks: an insert
//! used for seeding and a team-scoped list read by the assistant.

pub mod bug;
pub mod conversation;
pub mod feature;
pub mod knowledge;
pub mod time_log;
