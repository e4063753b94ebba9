//! # fc-assistant
//!
//! The FlowCaser chat assistant.
//!
//! A query flows through [`intent::classify_intent`], then
//! [`context::ContextAssembler`] reads the matching team records through
//! [`fc_db::store::DataStore`], then [`generator::ResponseGenerator`] asks the
//! remote model or falls back to [`templates`]. [`assistant::Assistant`] ties
//! the steps together and writes both turns to the
//! [`conversation::ConversationLog`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fc_assistant::Assistant;
//! use fc_config::FlowConfig;
//! use fc_db::FlowDb;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FlowConfig::load_with_dotenv()?;
//! let db = FlowDb::open(&config.database).await?;
//! let assistant = Assistant::new(Arc::new(db), &config)?;
//!
//! let reply = assistant.ask("team-a", "user-1", "Hvor mange timer har jeg logget?").await;
//! println!("{} ({})", reply.content, reply.source);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod context;
pub mod conversation;
pub mod error;
pub mod generator;
pub mod intent;
pub mod llm;
pub mod prompt;
pub mod relevance;
pub mod templates;

pub use assistant::{Assistant, AssistantReply};
pub use context::{ContextAssembler, ContextBundle};
pub use error::{AssistantError, LlmError};
pub use generator::{AssistantMessage, ReplySource, ResponseGenerator};
pub use intent::classify_intent;
