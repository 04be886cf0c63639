//! Agent-facing wiring for the Relay artifact subsystem.
//!
//! # Main types
//!
//! - [`HandoffTool`] — Delegates a task to a [`HandoffTarget`], revealing artifacts per policy.
//! - [`FinalAnswerExpander`] — Expands references in the final assistant answer.
//! - [`ArtifactLookupSkill`] — Read-only `artifact_lookup` tool for agents.

/// Final-answer expansion.
pub mod final_answer;
/// Task delegation with artifact handoff.
pub mod handoff_tool;
/// Artifact lookup skill.
pub mod lookup_skill;

pub use final_answer::FinalAnswerExpander;
pub use handoff_tool::{HandoffTarget, HandoffTool};
pub use lookup_skill::ArtifactLookupSkill;
