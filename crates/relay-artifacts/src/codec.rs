//! Reference tags: `<artifact id="draft_k3x9q0m2za" summary="Add dark mode" />`.
//!
//! A tag is a single self-closing element carrying an `id` and an optional
//! `summary`, attributes in any order. Attribute values are escaped so a tag
//! can be found again with one pattern.

use crate::policy::RevealPolicy;
use crate::store::{Artifact, ArtifactStore};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<artifact((?:\s+[a-z_]+="[^"]*")*)\s*/>"#).expect("tag pattern is valid")
});

#[allow(clippy::expect_used)]
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-z_]+)="([^"]*)""#).expect("attribute pattern is valid"));

/// A reference as it appears in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// Store id the tag points at.
    pub id: String,
    /// Copy of the summary taken when the tag was written.
    pub summary: Option<String>,
}

impl ArtifactRef {
    /// Bare reference carrying only the id.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: None,
        }
    }
}

impl From<&Artifact> for ArtifactRef {
    fn from(artifact: &Artifact) -> Self {
        Self {
            id: artifact.id().to_string(),
            summary: Some(artifact.summary().to_string()),
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Renders a reference as a tag.
pub fn render_ref(reference: &ArtifactRef) -> String {
    match &reference.summary {
        Some(summary) => format!(
            r#"<artifact id="{}" summary="{}" />"#,
            escape(&reference.id),
            escape(summary)
        ),
        None => format!(r#"<artifact id="{}" />"#, escape(&reference.id)),
    }
}

/// Renders `artifact` for a receiver with the given policy.
///
/// `Full` is not a tag at all: it is the content itself.
pub fn render(artifact: &Artifact, policy: RevealPolicy) -> String {
    match policy {
        RevealPolicy::None => render_ref(&ArtifactRef::bare(artifact.id())),
        RevealPolicy::Summary => render_ref(&ArtifactRef::from(artifact)),
        RevealPolicy::Full => artifact.content().to_string(),
    }
}

/// Reads the attribute list of a matched tag. Tags without an `id` are not references.
fn parse_attributes(attributes: &str) -> Option<ArtifactRef> {
    let mut id = None;
    let mut summary = None;
    for caps in ATTR_RE.captures_iter(attributes) {
        match &caps[1] {
            "id" => id = Some(unescape(&caps[2])),
            "summary" => summary = Some(unescape(&caps[2])),
            _ => {}
        }
    }
    id.filter(|id| !id.is_empty())
        .map(|id| ArtifactRef { id, summary })
}

/// Parses a single tag. Returns `None` unless `tag` is exactly one reference.
pub fn parse_tag(tag: &str) -> Option<ArtifactRef> {
    let caps = TAG_RE.captures(tag)?;
    if caps.get(0)?.as_str().len() != tag.len() {
        return None;
    }
    parse_attributes(caps.get(1)?.as_str())
}

/// Every reference in `text`, in order of appearance.
pub fn find_refs(text: &str) -> Vec<ArtifactRef> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| parse_attributes(caps.get(1)?.as_str()))
        .collect()
}

/// Rewrites every reference in `text` for a receiver with `policy`.
///
/// One left-to-right pass: content substituted for a tag is never scanned
/// again, and tags naming unknown ids are kept byte-for-byte.
pub fn expand(text: &str, store: &ArtifactStore, policy: RevealPolicy) -> String {
    if policy == RevealPolicy::None {
        return text.to_string();
    }

    TAG_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let original = &caps[0];
            let Some(reference) = parse_attributes(&caps[1]) else {
                return original.to_string();
            };
            match policy {
                RevealPolicy::None => original.to_string(),
                RevealPolicy::Summary if reference.summary.is_some() => original.to_string(),
                RevealPolicy::Summary => match store.get(&reference.id) {
                    Some(artifact) => render_ref(&ArtifactRef::from(artifact.as_ref())),
                    None => original.to_string(),
                },
                RevealPolicy::Full => match store.resolve(&reference.id) {
                    Ok(artifact) => artifact.content().to_string(),
                    Err(err) => {
                        debug!(error = %err, "Leaving reference unexpanded");
                        original.to_string()
                    }
                },
            }
        })
        .into_owned()
}
