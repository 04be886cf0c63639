use crate::error::RelayResult;
use crate::tool::{ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata describing a skill's interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDescriptor {
    /// Tool name the LLM calls.
    pub name: String,
    /// Human-readable description shown to the LLM.
    pub description: String,
    /// JSON schema of the call arguments.
    pub parameters_schema: serde_json::Value,
}

/// Trait that every agent-callable tool implements.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Returns the descriptor advertised to the LLM.
    fn descriptor(&self) -> &SkillDescriptor;

    /// Executes one tool call.
    async fn execute(&self, call: ToolCall) -> RelayResult<ToolResult>;
}
