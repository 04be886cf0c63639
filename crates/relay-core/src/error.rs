use thiserror::Error;

/// A convenience `Result` alias using [`RelayError`].
pub type RelayResult<T> = Result<T, RelayError>;

/// Top-level error type for Relay.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Error, Debug)]
pub enum RelayError {
    /// An error originating from a target agent run.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error from the artifact subsystem that the caller chose to surface.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error raised by a skill during invocation.
    #[error("Skill error: {0}")]
    Skill(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
