//! Out-of-band artifact store and reference rewriting for agent handoffs.
//!
//! Agents emit large content as artifact blocks. A handoff stores the block
//! and passes a short reference tag along instead; each receiver sees the
//! artifact through its own [`RevealPolicy`], and a final expansion pass turns
//! references back into content before it reaches an end consumer.
//!
//! # Main types
//!
//! - [`ArtifactSession`] — Collaborator-facing facade: handoff, expand, lookup.
//! - [`ArtifactParser`] — Extracts `ARTIFACT` / `SUMMARY:` blocks from text.
//! - [`ArtifactStore`] — Thread-safe, append-only artifact collection.
//! - [`HandoffOperation`] — Stores a block and rewrites the text to carry a reference.
//! - [`ExpansionPass`] — Idempotent full expansion before the final answer.
//! - [`codec`] — Rendering, finding and expanding reference tags.

/// Reference tag rendering and expansion.
pub mod codec;
/// Session configuration.
pub mod config;
/// Error types.
pub mod error;
/// Terminal expansion pass.
pub mod expansion;
/// Handoff rewriting.
pub mod handoff;
/// Artifact block parser.
pub mod parser;
/// Reveal policy.
pub mod policy;
/// Session facade.
pub mod session;
/// Artifact store.
pub mod store;

pub use codec::ArtifactRef;
pub use config::ArtifactConfig;
pub use error::{ArtifactError, ArtifactResult};
pub use expansion::ExpansionPass;
pub use handoff::{HandoffOperation, HandoffOutput};
pub use parser::{ArtifactFormat, ArtifactParser, ParsedArtifact};
pub use policy::RevealPolicy;
pub use session::ArtifactSession;
pub use store::{Artifact, ArtifactStore, ArtifactSummary, IdSource, RandomIdSource};
