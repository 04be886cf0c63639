//! Core types and error definitions for Relay.
//!
//! This crate provides the foundational types shared across all Relay crates:
//! the unified error enum, conversation messages, and the tool-call
//! abstractions agents use to reach the artifact subsystem.
//!
//! # Main types
//!
//! - [`RelayError`] — Unified error enum for all Relay subsystems.
//! - [`RelayResult`] — Convenience alias for `Result<T, RelayError>`.
//! - [`Role`] — Message role (user, assistant, system, tool).
//! - [`Message`] — A single message within a conversation.
//! - [`ToolCall`] / [`ToolResult`] — LLM-initiated tool invocation and its result.
//! - [`Skill`] — Trait implemented by every agent-callable tool.

/// Error types.
pub mod error;
/// Conversation message types.
pub mod message;
/// Skill trait and descriptor.
pub mod skill;
/// Tool call and result types.
pub mod tool;

pub use error::{RelayError, RelayResult};
pub use message::{Message, Role};
pub use skill::{Skill, SkillDescriptor};
pub use tool::{ToolCall, ToolResult};
