use crate::codec;
use crate::config::ArtifactConfig;
use crate::expansion::ExpansionPass;
use crate::handoff::{HandoffOperation, HandoffOutput};
use crate::parser::ArtifactParser;
use crate::policy::RevealPolicy;
use crate::store::ArtifactStore;
use relay_core::RelayResult;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// The artifact subsystem as seen by one orchestration session.
///
/// Owns the session's store; created when the session starts and dropped
/// with it. Share it between agents as `Arc<ArtifactSession>`.
pub struct ArtifactSession {
    id: Uuid,
    store: Arc<ArtifactStore>,
    handoff: HandoffOperation,
    final_pass: ExpansionPass,
    default_policy: RevealPolicy,
}

impl ArtifactSession {
    /// Session with default settings.
    pub fn new() -> Self {
        Self::build(&ArtifactConfig::default())
    }

    /// Session from validated configuration.
    pub fn from_config(config: &ArtifactConfig) -> RelayResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ArtifactConfig) -> Self {
        let store = Arc::new(ArtifactStore::with_config(config));
        let parser = ArtifactParser::with_format(config.format());
        let session = Self {
            id: Uuid::new_v4(),
            handoff: HandoffOperation::new(Arc::clone(&store), parser),
            final_pass: ExpansionPass::new(Arc::clone(&store)),
            store,
            default_policy: config.default_policy,
        };
        info!(session_id = %session.id, prefix = %config.id_prefix, "Artifact session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    pub fn default_policy(&self) -> RevealPolicy {
        self.default_policy
    }

    /// The expansion to run before text reaches an end consumer.
    pub fn final_pass(&self) -> &ExpansionPass {
        &self.final_pass
    }

    /// Attempts a handoff rewrite of `text` for a receiver with `policy`.
    pub fn handoff(
        &self,
        text: &str,
        policy: RevealPolicy,
        created_by: Option<&str>,
    ) -> HandoffOutput {
        self.handoff.run(text, policy, created_by)
    }

    /// Rewrites all references in `text` for `policy`.
    pub fn expand(&self, text: &str, policy: RevealPolicy) -> String {
        codec::expand(text, &self.store, policy)
    }

    /// Raw content of an artifact.
    pub fn lookup(&self, id: &str) -> Option<String> {
        self.store.get(id).map(|artifact| artifact.content().to_string())
    }
}

impl Default for ArtifactSession {
    fn default() -> Self {
        Self::new()
    }
}
