use async_trait::async_trait;
use relay_artifacts::{ArtifactSession, RevealPolicy};
use relay_core::{Message, RelayError, RelayResult, Role, SkillDescriptor, ToolCall, ToolResult};
use std::sync::Arc;
use tracing::info;

/// An agent that can receive a delegated task.
#[async_trait]
pub trait HandoffTarget: Send + Sync {
    /// Agent name, used as the tool name and as the artifact producer.
    fn name(&self) -> &str;

    /// What the agent is good at, shown to the delegating LLM.
    fn description(&self) -> &str {
        ""
    }

    /// Runs the agent on `messages` and returns its final text.
    async fn run(&self, messages: Vec<Message>) -> RelayResult<String>;
}

/// Delegates a task to a target agent with artifact handling on both sides.
///
/// The target sees the caller's history through `reveal_policy`. Whatever the
/// target returns goes back through a handoff with [`RevealPolicy::Summary`],
/// so the caller's history keeps a short reference instead of the full body.
pub struct HandoffTool {
    target: Arc<dyn HandoffTarget>,
    session: Arc<ArtifactSession>,
    descriptor: SkillDescriptor,
    reveal_policy: RevealPolicy,
    propagate_inputs: bool,
}

impl HandoffTool {
    pub fn new(target: Arc<dyn HandoffTarget>, session: Arc<ArtifactSession>) -> Self {
        let descriptor = SkillDescriptor {
            name: target.name().to_string(),
            description: target.description().to_string(),
            parameters_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "task": {
                        "type": "string",
                        "description": "Clearly defined task for the agent to work on based on its abilities."
                    }
                },
                "required": ["task"]
            }),
        };
        Self {
            target,
            session,
            descriptor,
            reveal_policy: RevealPolicy::Summary,
            propagate_inputs: true,
        }
    }

    /// Overrides the tool name (defaults to the target's name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }

    /// How much of each artifact the target sees in the passed history.
    pub fn with_reveal_policy(mut self, policy: RevealPolicy) -> Self {
        self.reveal_policy = policy;
        self
    }

    /// Whether the task is appended to the target's input as a user message.
    pub fn with_propagate_inputs(mut self, propagate: bool) -> Self {
        self.propagate_inputs = propagate;
        self
    }

    pub fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    pub fn reveal_policy(&self) -> RevealPolicy {
        self.reveal_policy
    }

    /// The slice of `history` the target receives, rewritten for `reveal_policy`.
    ///
    /// System messages are dropped, and the history is cut after the last
    /// message that is not an assistant turn still waiting on tool output.
    pub fn messages_for_target(&self, history: &[Message]) -> Vec<Message> {
        let non_system: Vec<&Message> = history
            .iter()
            .filter(|msg| msg.role != Role::System)
            .collect();
        let keep = non_system
            .iter()
            .rposition(|msg| !msg.has_pending_tool_calls())
            .map_or(0, |idx| idx + 1);

        non_system[..keep]
            .iter()
            .map(|msg| {
                let mut msg = (*msg).clone();
                msg.content = self.session.expand(&msg.content, self.reveal_policy);
                msg
            })
            .collect()
    }

    /// Runs the target on `task` and returns the reply as the caller should see it.
    pub async fn delegate(&self, history: &[Message], task: &str) -> RelayResult<String> {
        let mut messages = self.messages_for_target(history);
        if self.propagate_inputs {
            messages.push(Message::user(task, self.session.id()));
        }

        info!(
            agent = %self.descriptor.name,
            messages = messages.len(),
            policy = %self.reveal_policy,
            "Handing off task"
        );
        let reply = self.target.run(messages).await?;

        let out = self
            .session
            .handoff(&reply, RevealPolicy::Summary, Some(&self.descriptor.name));
        if let Some(artifact) = &out.artifact {
            info!(agent = %self.descriptor.name, id = %artifact.id(), "Target returned an artifact");
        }
        Ok(out.text)
    }

    /// Tool-call entry point: reads `task` from the call arguments.
    pub async fn execute(&self, call: ToolCall, history: &[Message]) -> RelayResult<ToolResult> {
        let Some(task) = call.arguments["task"].as_str().filter(|t| !t.is_empty()) else {
            return Ok(ToolResult::error(&call.id, "Task is required"));
        };
        match self.delegate(history, task).await {
            Ok(text) => Ok(ToolResult::success(&call.id, text)),
            Err(RelayError::Agent(reason)) => Ok(ToolResult::error(
                &call.id,
                format!("Agent '{}' failed: {reason}", self.descriptor.name),
            )),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    struct EchoTarget {
        reply: String,
        seen: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl HandoffTarget for EchoTarget {
        fn name(&self) -> &str {
            "writer"
        }

        async fn run(&self, messages: Vec<Message>) -> RelayResult<String> {
            *self.seen.lock().await = messages;
            Ok(self.reply.clone())
        }
    }

    fn target(reply: &str) -> Arc<EchoTarget> {
        Arc::new(EchoTarget {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn pending_call() -> ToolCall {
        ToolCall {
            id: "c1".to_string(),
            name: "writer".to_string(),
            arguments: serde_json::json!({"task": "draft"}),
        }
    }

    #[test]
    fn test_history_drops_system_and_pending_tool_turns() {
        let session = Arc::new(ArtifactSession::new());
        let tool = HandoffTool::new(target("ok"), session);
        let sid = Uuid::new_v4();
        let history = vec![
            Message::system("You are the manager", sid),
            Message::user("Create an issue", sid),
            Message::assistant("Let me ask the writer", sid),
            Message::assistant("", sid).with_tool_calls(vec![pending_call()]),
        ];
        let passed = tool.messages_for_target(&history);
        assert_eq!(passed.len(), 2);
        assert_eq!(passed[0].content, "Create an issue");
        assert_eq!(passed[1].content, "Let me ask the writer");
    }

    #[test]
    fn test_history_with_only_pending_turns_is_empty() {
        let session = Arc::new(ArtifactSession::new());
        let tool = HandoffTool::new(target("ok"), session);
        let sid = Uuid::new_v4();
        let history = vec![Message::assistant("", sid).with_tool_calls(vec![pending_call()])];
        assert!(tool.messages_for_target(&history).is_empty());
    }

    #[test]
    fn test_full_policy_reveals_content_to_target() {
        let session = Arc::new(ArtifactSession::new());
        let artifact = session.store().put("Spec", "the full spec", None).unwrap();
        let tool = HandoffTool::new(target("ok"), Arc::clone(&session))
            .with_reveal_policy(RevealPolicy::Full);
        let sid = Uuid::new_v4();
        let history = vec![Message::assistant(
            format!("Analyst said <artifact id=\"{}\" summary=\"Spec\" />", artifact.id()),
            sid,
        )];
        let passed = tool.messages_for_target(&history);
        assert_eq!(passed[0].content, "Analyst said the full spec");
        // the caller's history is untouched
        assert!(history[0].content.contains("<artifact"));
    }

    #[tokio::test]
    async fn test_delegate_stores_reply_artifact() {
        let session = Arc::new(ArtifactSession::new());
        let writer = target("ARTIFACT\nSUMMARY: Issue draft\n\n~~~\n## Bug\n~~~");
        let tool = HandoffTool::new(writer.clone(), Arc::clone(&session));

        let reply = tool.delegate(&[], "Write the issue").await.unwrap();
        let listing = session.store().list();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].created_by.as_deref(), Some("writer"));
        assert_eq!(
            reply,
            format!("<artifact id=\"{}\" summary=\"Issue draft\" />", listing[0].id)
        );

        let seen = writer.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].content, "Write the issue");
    }

    #[tokio::test]
    async fn test_execute_requires_task() {
        let session = Arc::new(ArtifactSession::new());
        let tool = HandoffTool::new(target("ok"), session);
        let call = ToolCall {
            id: "c9".to_string(),
            name: "writer".to_string(),
            arguments: serde_json::json!({}),
        };
        let result = tool.execute(call, &[]).await.unwrap();
        assert!(result.is_error);
    }
}
