//! # fc-core
//!
//! Core types, ID prefixes, and error types for FlowCaser.
//!
//! This crate provides the foundational types shared across all FlowCaser crates:
//! - Entity structs for the team's records (bugs, feature requests, knowledge
//!   cases, time logs) and the assistant's conversation turns
//! - Status, priority, and role enums with their SQL string forms
//! - The assistant's `Intent` categories
//! - ID prefix constants
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
