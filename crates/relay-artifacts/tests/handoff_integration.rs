//! Multi-hop and concurrent handoff scenarios against one shared session.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use relay_artifacts::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const DARK_MODE: &str = "ARTIFACT\nSUMMARY: Add dark mode\n\n~~~markdown\n# Dark Mode\n~~~";

// ---------------------------------------------------------------------------
// 1. Dark-mode block: parse, store, render per policy
// ---------------------------------------------------------------------------

#[test]
fn dark_mode_block_renders_per_policy() {
    let parsed = ArtifactParser::new().parse(DARK_MODE).unwrap();
    assert_eq!(parsed.summary, "Add dark mode");
    assert_eq!(parsed.content, "# Dark Mode\n");

    let store = ArtifactStore::new();
    let artifact = store.put(parsed.summary, parsed.content, Some("writer")).unwrap();

    let summary_tag = codec::render(&artifact, RevealPolicy::Summary);
    assert!(summary_tag.contains(artifact.id()));
    assert!(summary_tag.contains("Add dark mode"));

    let full = codec::render(&artifact, RevealPolicy::Full);
    assert_eq!(full, "# Dark Mode\n");
    assert!(!full.contains("<artifact"));
}

// ---------------------------------------------------------------------------
// 2. Unknown reference against an empty store
// ---------------------------------------------------------------------------

#[test]
fn unknown_reference_is_left_byte_for_byte() {
    let store = ArtifactStore::new();
    let text = "Intro\n<artifact id=\"draft_q8w7e6r5t4\" summary=\"Old draft\" />\nOutro";
    assert_eq!(codec::expand(text, &store, RevealPolicy::Full), text);
    assert_eq!(ExpansionPass::new(Arc::new(store)).run(text), text);
}

// ---------------------------------------------------------------------------
// 3. Analyst -> manager -> writer chain
// ---------------------------------------------------------------------------

#[test]
fn references_compose_across_hops() {
    let session = ArtifactSession::new();

    // analyst output reaches the manager as a summary reference
    let analyst = session.handoff(
        "Analysis done.\nARTIFACT\nSUMMARY: Duplicate search\n\n~~~\nNo duplicates found.\n~~~",
        RevealPolicy::Summary,
        Some("analyst"),
    );
    let artifact = analyst.artifact.clone().unwrap();
    assert_eq!(
        analyst.text,
        format!(
            "Analysis done.\n<artifact id=\"{}\" summary=\"Duplicate search\" />",
            artifact.id()
        )
    );

    // manager forwards the reference; the writer sees full content
    let forwarded = format!("Write the issue using {}", analyst.text);
    let to_writer = session.handoff(&forwarded, RevealPolicy::Full, Some("manager"));
    assert!(to_writer.artifact.is_none());
    assert_eq!(
        to_writer.text,
        "Write the issue using Analysis done.\nNo duplicates found.\n"
    );

    // the final answer quoting the reference is expanded once, and stays expanded
    let answer = format!("Result:\n{}", codec::render(&artifact, RevealPolicy::None));
    let expanded = session.final_pass().run(&answer);
    assert_eq!(expanded, "Result:\nNo duplicates found.\n");
    assert_eq!(session.final_pass().run(&expanded), expanded);
    assert_eq!(session.store().len(), 1);
}

#[test]
fn none_policy_hides_summary_from_receiver() {
    let session = ArtifactSession::new();
    let out = session.handoff(DARK_MODE, RevealPolicy::None, None);
    assert!(!out.text.contains("dark mode"));
    assert_eq!(codec::find_refs(&out.text).len(), 1);
    assert!(codec::find_refs(&out.text)[0].summary.is_none());
}

// ---------------------------------------------------------------------------
// 4. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_identical_puts_get_distinct_ids() {
    let store = Arc::new(ArtifactStore::new());
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.put("Same summary", "same content", None).unwrap())
        })
        .collect();
    let artifacts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_ne!(artifacts[0].id(), artifacts[1].id());
    for artifact in &artifacts {
        let fetched = store.get(artifact.id()).unwrap();
        assert_eq!(fetched.content(), "same content");
    }
}

#[test]
fn ten_thousand_puts_never_repeat_an_id() {
    let store = ArtifactStore::new();
    let mut seen = HashSet::new();
    for i in 0..10_000 {
        let artifact = store.put("s", format!("c{i}"), None).unwrap();
        assert!(seen.insert(artifact.id().to_string()));
    }
    assert_eq!(store.len(), 10_000);
}

#[test]
fn concurrent_handoffs_keep_every_artifact() {
    let session = Arc::new(ArtifactSession::new());
    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let mut ids = Vec::with_capacity(per_thread);
                for i in 0..per_thread {
                    let text = format!("ARTIFACT\nSUMMARY: t{t} #{i}\n\n~~~\nbody {t}-{i}\n~~~");
                    let out = session.handoff(&text, RevealPolicy::Summary, Some("worker"));
                    let artifact = out.artifact.unwrap();
                    // readers on other threads only ever see complete records
                    assert_eq!(
                        session.lookup(artifact.id()).unwrap(),
                        format!("body {t}-{i}\n")
                    );
                    ids.push(artifact.id().to_string());
                }
                ids
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id));
        }
    }
    assert_eq!(all.len(), threads * per_thread);
    assert_eq!(session.store().list().len(), threads * per_thread);
}
