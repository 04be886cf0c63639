use relay_artifacts::ExpansionPass;
use relay_core::{Message, Role};

/// Expands artifact references in the answer an end user will read.
///
/// Run it on the final assistant message after the workflow decides it is
/// done; intermediate turns keep their references.
#[derive(Clone)]
pub struct FinalAnswerExpander {
    pass: ExpansionPass,
}

impl FinalAnswerExpander {
    pub fn new(pass: ExpansionPass) -> Self {
        Self { pass }
    }

    /// Expands `message` if it is an assistant answer. Returns whether it changed.
    pub fn expand_answer(&self, message: &mut Message) -> bool {
        if message.role != Role::Assistant || message.has_pending_tool_calls() {
            return false;
        }
        self.pass.apply(message)
    }

    /// Expands the last completed assistant message of a transcript.
    pub fn expand_transcript(&self, messages: &mut [Message]) -> bool {
        messages
            .iter_mut()
            .rev()
            .find(|msg| msg.role == Role::Assistant && !msg.has_pending_tool_calls())
            .is_some_and(|msg| self.pass.apply(msg))
    }
}
