use crate::parser::{ArtifactFormat, DEFAULT_MARKER, DEFAULT_SUMMARY_LABEL};
use crate::policy::RevealPolicy;
use relay_core::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};

/// Settings for one artifact session, read from the `[artifacts]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_id_suffix_len")]
    pub id_suffix_len: usize,
    /// Upper bound on id regeneration when a generated id is already taken.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_summary_label")]
    pub summary_label: String,
    /// Policy used when a caller does not name one.
    #[serde(default)]
    pub default_policy: RevealPolicy,
}

fn default_id_prefix() -> String {
    "draft".to_string()
}

fn default_id_suffix_len() -> usize {
    10
}

fn default_max_id_attempts() -> u32 {
    8
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_summary_label() -> String {
    DEFAULT_SUMMARY_LABEL.to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            id_suffix_len: default_id_suffix_len(),
            max_id_attempts: default_max_id_attempts(),
            marker: default_marker(),
            summary_label: default_summary_label(),
            default_policy: RevealPolicy::default(),
        }
    }
}

impl ArtifactConfig {
    /// Rejects settings that would make ids guessable or blocks unparseable.
    pub fn validate(&self) -> RelayResult<()> {
        if self.id_prefix.trim().is_empty() {
            return Err(RelayError::Config("id_prefix must not be empty".to_string()));
        }
        if !(4..=32).contains(&self.id_suffix_len) {
            return Err(RelayError::Config(format!(
                "id_suffix_len must be between 4 and 32, got {}",
                self.id_suffix_len
            )));
        }
        if self.max_id_attempts == 0 {
            return Err(RelayError::Config(
                "max_id_attempts must be at least 1".to_string(),
            ));
        }
        if self.marker.trim().is_empty() || self.summary_label.trim().is_empty() {
            return Err(RelayError::Config(
                "marker and summary_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Block tokens for the parser.
    pub fn format(&self) -> ArtifactFormat {
        ArtifactFormat {
            marker: self.marker.clone(),
            summary_label: self.summary_label.clone(),
        }
    }
}
