use crate::codec;
use crate::parser::{ArtifactParser, ParsedArtifact};
use crate::policy::RevealPolicy;
use crate::store::{Artifact, ArtifactStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one handoff rewrite.
#[derive(Debug, Clone)]
pub struct HandoffOutput {
    /// Text for the receiving party.
    pub text: String,
    /// The artifact extracted and stored during this handoff, if any.
    pub artifact: Option<Arc<Artifact>>,
}

impl HandoffOutput {
    fn passthrough(text: &str) -> Self {
        Self {
            text: text.to_string(),
            artifact: None,
        }
    }
}

/// Rewrites generator output so that artifact blocks travel as references.
///
/// Stateless apart from the shared store; safe to call from many threads.
#[derive(Clone)]
pub struct HandoffOperation {
    store: Arc<ArtifactStore>,
    parser: ArtifactParser,
}

impl HandoffOperation {
    pub fn new(store: Arc<ArtifactStore>, parser: ArtifactParser) -> Self {
        Self { store, parser }
    }

    /// Hands `text` to a receiver that sees artifacts through `policy`.
    ///
    /// An artifact block is stored and replaced by its rendering, with the
    /// text around the block kept verbatim. Text without a block has its
    /// existing references rewritten for `policy` instead, so references from
    /// earlier hops carry through. This never fails: if the artifact cannot be
    /// stored, the original text is passed on unchanged.
    pub fn run(&self, text: &str, policy: RevealPolicy, created_by: Option<&str>) -> HandoffOutput {
        let ParsedArtifact {
            summary,
            content,
            span,
        } = match self.parser.parse(text) {
            Ok(parsed) => parsed,
            Err(reason) => {
                debug!(reason = %reason, policy = %policy, "No artifact block, rewriting references");
                return HandoffOutput {
                    text: codec::expand(text, &self.store, policy),
                    artifact: None,
                };
            }
        };

        let artifact = match self.store.put(summary, content, created_by) {
            Ok(artifact) => artifact,
            Err(err) => {
                warn!(error = %err, "Artifact could not be stored, passing text through");
                return HandoffOutput::passthrough(text);
            }
        };

        info!(
            id = %artifact.id(),
            created_by = ?created_by,
            size = artifact.content().len(),
            policy = %policy,
            "Stored artifact"
        );

        let rendered = codec::render(&artifact, policy);
        let mut rewritten =
            String::with_capacity(text.len() - span.len() + rendered.len());
        rewritten.push_str(&text[..span.start]);
        rewritten.push_str(&rendered);
        rewritten.push_str(&text[span.end..]);

        HandoffOutput {
            text: rewritten,
            artifact: Some(artifact),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::IdSource;

    fn operation() -> (Arc<ArtifactStore>, HandoffOperation) {
        let store = Arc::new(ArtifactStore::new());
        let op = HandoffOperation::new(Arc::clone(&store), ArtifactParser::new());
        (store, op)
    }

    #[test]
    fn test_block_becomes_summary_reference() {
        let (store, op) = operation();
        let out = op.run(
            "ARTIFACT\nSUMMARY: Add dark mode\n\n~~~markdown\n# Dark Mode\n~~~",
            RevealPolicy::Summary,
            Some("writer"),
        );
        let artifact = out.artifact.unwrap();
        assert_eq!(
            out.text,
            format!(r#"<artifact id="{}" summary="Add dark mode" />"#, artifact.id())
        );
        assert_eq!(store.get(artifact.id()).unwrap().created_by(), Some("writer"));
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let (_store, op) = operation();
        let text = "Draft ready.\nARTIFACT\nSUMMARY: Issue\n\n~~~\nbody\n~~~\nThanks!";
        let out = op.run(text, RevealPolicy::None, None);
        let id = out.artifact.unwrap().id().to_string();
        assert_eq!(out.text, format!("Draft ready.\n<artifact id=\"{id}\" />\nThanks!"));
    }

    #[test]
    fn test_full_policy_inlines_content() {
        let (store, op) = operation();
        let out = op.run("ARTIFACT\nSUMMARY: s\n\n~~~\nfull body\n~~~", RevealPolicy::Full, None);
        assert_eq!(out.text, "full body\n");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let (store, op) = operation();
        let text = "ARTIFACT\nno label here";
        let out = op.run(text, RevealPolicy::Summary, None);
        assert_eq!(out.text, text);
        assert!(out.artifact.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_forwarded_reference_is_rewritten() {
        let (store, op) = operation();
        let first = op.run("ARTIFACT\nSUMMARY: Analysis\n\nfindings", RevealPolicy::None, Some("analyst"));
        let forwarded = format!("Please review: {}", first.text);

        let out = op.run(&forwarded, RevealPolicy::Full, Some("manager"));
        assert_eq!(out.text, "Please review: findings");
        assert!(out.artifact.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_failure_degrades_to_passthrough() {
        struct Constant;
        impl IdSource for Constant {
            fn next_suffix(&self, len: usize) -> String {
                "0".repeat(len)
            }
        }
        let store = Arc::new(ArtifactStore::new().with_id_source(Box::new(Constant)));
        let op = HandoffOperation::new(Arc::clone(&store), ArtifactParser::new());
        op.run("ARTIFACT\nSUMMARY: one\n\nfirst", RevealPolicy::Summary, None);

        let text = "ARTIFACT\nSUMMARY: two\n\nsecond";
        let out = op.run(text, RevealPolicy::Summary, None);
        assert_eq!(out.text, text);
        assert!(out.artifact.is_none());
        assert_eq!(store.len(), 1);
    }
}
