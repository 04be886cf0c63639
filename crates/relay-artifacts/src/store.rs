use crate::config::ArtifactConfig;
use crate::error::{ArtifactError, ArtifactResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const ID_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// An immutable unit of generated content plus its summary.
///
/// Fields are private: once the store hands out an `Arc<Artifact>` nothing can
/// change it. "Replacing" an artifact means storing a new one under a new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    id: String,
    summary: String,
    content: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl Artifact {
    /// Store-assigned identifier, e.g. `draft_k3x9q0m2za`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Short human-readable description.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Full body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the producing party, when known.
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// When the store accepted the artifact.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Listing entry returned by [`ArtifactStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub summary: String,
    pub created_by: Option<String>,
    pub size: usize,
}

/// Source of the random part of artifact ids.
pub trait IdSource: Send + Sync {
    /// Returns `len` characters to append after the id prefix.
    fn next_suffix(&self, len: usize) -> String;
}

/// Draws suffix characters from `[a-z0-9]` using v4 UUID randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_suffix(&self, len: usize) -> String {
        let mut suffix = String::with_capacity(len);
        while suffix.len() < len {
            let uuid = Uuid::new_v4();
            // bytes 6 and 8 carry the version and variant bits
            for (i, byte) in uuid.as_bytes().iter().enumerate() {
                if i == 6 || i == 8 || *byte >= 252 {
                    continue;
                }
                suffix.push(char::from(ID_ALPHABET[usize::from(*byte) % ID_ALPHABET.len()]));
                if suffix.len() == len {
                    break;
                }
            }
        }
        suffix
    }
}

#[derive(Default)]
struct Entries {
    by_id: HashMap<String, Arc<Artifact>>,
    order: Vec<String>,
}

/// Session-scoped, thread-safe collection of artifacts.
///
/// There is no update or delete: `put` allocates a fresh id for every record.
pub struct ArtifactStore {
    entries: RwLock<Entries>,
    ids: Box<dyn IdSource>,
    id_prefix: String,
    id_suffix_len: usize,
    max_id_attempts: u32,
}

impl ArtifactStore {
    /// Store with the default id scheme.
    pub fn new() -> Self {
        Self::with_config(&ArtifactConfig::default())
    }

    /// Store using the id settings of `config`.
    pub fn with_config(config: &ArtifactConfig) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            ids: Box::new(RandomIdSource),
            id_prefix: config.id_prefix.clone(),
            id_suffix_len: config.id_suffix_len,
            max_id_attempts: config.max_id_attempts,
        }
    }

    /// Replaces the id source.
    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Stores a new artifact and returns it.
    ///
    /// Fails with [`ArtifactError::IdCollision`] only after `max_id_attempts`
    /// generated ids were all taken; an existing record is never overwritten.
    pub fn put(
        &self,
        summary: impl Into<String>,
        content: impl Into<String>,
        created_by: Option<&str>,
    ) -> ArtifactResult<Arc<Artifact>> {
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err(ArtifactError::InvalidSummary);
        }
        let content = content.into();

        for attempt in 1..=self.max_id_attempts {
            let id = format!(
                "{}_{}",
                self.id_prefix,
                self.ids.next_suffix(self.id_suffix_len)
            );
            let mut entries = self.entries.write();
            if entries.by_id.contains_key(&id) {
                debug!(id = %id, attempt, "Artifact id collision, regenerating");
                continue;
            }
            let artifact = Arc::new(Artifact {
                id: id.clone(),
                summary,
                content,
                created_by: created_by.map(str::to_string),
                created_at: Utc::now(),
            });
            entries.order.push(id.clone());
            entries.by_id.insert(id, Arc::clone(&artifact));
            return Ok(artifact);
        }

        warn!(
            attempts = self.max_id_attempts,
            "Giving up on artifact id allocation"
        );
        Err(ArtifactError::IdCollision {
            attempts: self.max_id_attempts,
        })
    }

    /// Looks up an artifact. Absence is a normal outcome.
    pub fn get(&self, id: &str) -> Option<Arc<Artifact>> {
        self.entries.read().by_id.get(id).cloned()
    }

    /// Like [`get`](Self::get), but reports absence as [`ArtifactError::UnknownReference`].
    pub fn resolve(&self, id: &str) -> ArtifactResult<Arc<Artifact>> {
        self.get(id)
            .ok_or_else(|| ArtifactError::UnknownReference(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All artifacts in creation order, without their content.
    pub fn list(&self) -> Vec<ArtifactSummary> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id))
            .map(|artifact| ArtifactSummary {
                id: artifact.id.clone(),
                summary: artifact.summary.clone(),
                created_by: artifact.created_by.clone(),
                size: artifact.content.len(),
            })
            .collect()
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}
