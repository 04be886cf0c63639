//! `relay.toml` loading.

use relay_artifacts::ArtifactConfig;
use relay_core::{RelayError, RelayResult};
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            artifacts: ArtifactConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RelayConfig {
    /// Reads and validates `path`. A missing file yields the defaults.
    pub async fn load(path: &Path) -> RelayResult<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }
        let raw = tokio::fs::read_to_string(path).await?;
        let config: RelayConfig = toml::from_str(&raw).map_err(|e| {
            RelayError::Config(format!("Failed to parse '{}': {e}", path.display()))
        })?;
        config.artifacts.validate()?;
        Ok(config)
    }

    /// `RUST_LOG` wins over the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use relay_artifacts::RevealPolicy;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig::load(&dir.path().join("relay.toml")).await.unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.artifacts, ArtifactConfig::default());
    }

    #[tokio::test]
    async fn test_load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        tokio::fs::write(
            &path,
            r#"
log_level = "debug"
log_format = "pretty"

[artifacts]
id_prefix = "issue"
max_id_attempts = 3
default_policy = "none"
"#,
        )
        .await
        .unwrap();

        let config = RelayConfig::load(&path).await.unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.artifacts.id_prefix, "issue");
        assert_eq!(config.artifacts.max_id_attempts, 3);
        assert_eq!(config.artifacts.id_suffix_len, 10);
        assert_eq!(config.artifacts.default_policy, RevealPolicy::None);
    }

    #[tokio::test]
    async fn test_invalid_artifact_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        tokio::fs::write(&path, "[artifacts]\nid_suffix_len = 1\n").await.unwrap();
        let err = RelayConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_toml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.toml");
        tokio::fs::write(&path, "log_format = [").await.unwrap();
        assert!(matches!(
            RelayConfig::load(&path).await,
            Err(RelayError::Config(_))
        ));
    }
}
