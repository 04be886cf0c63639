use relay_core::RelayError;
use thiserror::Error;

/// Convenience alias for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Failures inside the artifact subsystem.
///
/// None of these are fatal to a conversation: parse mismatches fall back to
/// passthrough, unknown references stay unexpanded, and only an exhausted id
/// allocation is surfaced to the caller of [`ArtifactStore::put`](crate::ArtifactStore::put).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// The text is not an artifact block.
    #[error("not an artifact block: {0}")]
    ParseMismatch(String),

    /// A reference points at an id the store does not hold.
    #[error("unknown artifact reference: {0}")]
    UnknownReference(String),

    /// Every generated id collided with an existing one.
    #[error("could not allocate a unique artifact id after {attempts} attempts")]
    IdCollision {
        /// How many ids were tried.
        attempts: u32,
    },

    /// Artifacts need a non-empty summary.
    #[error("artifact summary must not be empty")]
    InvalidSummary,

    /// A reveal policy name that is not `none`, `summary` or `full`.
    #[error("unknown reveal policy '{0}' (expected none, summary or full)")]
    UnknownPolicy(String),
}

impl From<ArtifactError> for RelayError {
    fn from(err: ArtifactError) -> Self {
        RelayError::Artifact(err.to_string())
    }
}
