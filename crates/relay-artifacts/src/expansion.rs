use crate::codec;
use crate::policy::RevealPolicy;
use crate::store::ArtifactStore;
use relay_core::Message;
use std::sync::Arc;
use tracing::debug;

/// Terminal expansion run right before text reaches an end consumer.
///
/// Every known reference becomes live content; unknown references stay as
/// they are. Running it again on its own output changes nothing.
#[derive(Clone)]
pub struct ExpansionPass {
    store: Arc<ArtifactStore>,
}

impl ExpansionPass {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    /// Expands all references in `text` to full content.
    pub fn run(&self, text: &str) -> String {
        codec::expand(text, &self.store, RevealPolicy::Full)
    }

    /// Expands a message in place. Returns `true` when the content changed.
    pub fn apply(&self, message: &mut Message) -> bool {
        let expanded = self.run(&message.content);
        if expanded == message.content {
            return false;
        }
        debug!(message_id = %message.id, "Expanded artifact references in message");
        message.content = expanded;
        true
    }
}
