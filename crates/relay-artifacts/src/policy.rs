use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much of an artifact a reference reveals to the receiving party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPolicy {
    /// Only the id.
    None,
    /// Id plus the short summary.
    #[default]
    Summary,
    /// The complete content, inline.
    Full,
}

impl std::fmt::Display for RevealPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealPolicy::None => write!(f, "none"),
            RevealPolicy::Summary => write!(f, "summary"),
            RevealPolicy::Full => write!(f, "full"),
        }
    }
}

impl FromStr for RevealPolicy {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(RevealPolicy::None),
            "summary" => Ok(RevealPolicy::Summary),
            "full" => Ok(RevealPolicy::Full),
            other => Err(ArtifactError::UnknownPolicy(other.to_string())),
        }
    }
}
