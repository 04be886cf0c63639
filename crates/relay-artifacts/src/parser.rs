use crate::error::{ArtifactError, ArtifactResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Marker line that opens an artifact block.
pub const DEFAULT_MARKER: &str = "ARTIFACT";
/// Label of the summary line that follows the marker.
pub const DEFAULT_SUMMARY_LABEL: &str = "SUMMARY";

const FENCE: &str = "~~~";

/// The literal tokens that make up an artifact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFormat {
    /// Case-sensitive marker line, `ARTIFACT` by default.
    pub marker: String,
    /// Label before the colon on the summary line, `SUMMARY` by default.
    pub summary_label: String,
}

impl Default for ArtifactFormat {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
        }
    }
}

/// An artifact block found inside a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    /// Trimmed summary text.
    pub summary: String,
    /// Body, with the fence lines stripped when the body was fenced.
    pub content: String,
    /// Byte range of the block in the input, from the marker line through the
    /// body; the line ending after a closing fence is left outside.
    pub span: Range<usize>,
}

/// One line of input. `text` excludes the line ending, which starts at
/// `start + text.len()`; `end` is past the line ending.
struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl Line<'_> {
    fn text_end(&self) -> usize {
        self.start + self.text.len()
    }
}

fn split_lines(input: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    while start < input.len() {
        let (text_end, end) = match input[start..].find('\n') {
            Some(offset) => (start + offset, start + offset + 1),
            None => (input.len(), input.len()),
        };
        let raw = &input[start..text_end];
        lines.push(Line {
            start,
            end,
            text: raw.strip_suffix('\r').unwrap_or(raw),
        });
        start = end;
    }
    lines
}

fn mismatch(reason: &str) -> ArtifactError {
    ArtifactError::ParseMismatch(reason.to_string())
}

/// Extracts artifact blocks from generated text.
///
/// Grammar, line by line:
///
/// ```text
/// ARTIFACT
/// SUMMARY: <summary>
/// <blank>
/// <body>
/// ```
///
/// The body is either fenced with `~~~` lines (an info string after the
/// opening fence is allowed) or runs verbatim to the end of the text. Text
/// before the marker line, and after a closing fence, is not part of the block.
#[derive(Debug, Clone, Default)]
pub struct ArtifactParser {
    format: ArtifactFormat,
}

impl ArtifactParser {
    /// Parser for the default `ARTIFACT` / `SUMMARY:` format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser for a custom marker and label.
    pub fn with_format(format: ArtifactFormat) -> Self {
        Self { format }
    }

    /// The tokens this parser recognizes.
    pub fn format(&self) -> &ArtifactFormat {
        &self.format
    }

    /// Finds the artifact block in `text`.
    ///
    /// Returns [`ArtifactError::ParseMismatch`] when the text is plain content;
    /// callers pass such text through unchanged.
    pub fn parse(&self, text: &str) -> ArtifactResult<ParsedArtifact> {
        let lines = split_lines(text);

        let marker_idx = lines
            .iter()
            .position(|line| line.text.trim() == self.format.marker)
            .ok_or_else(|| mismatch("no marker line"))?;
        let block_start = lines[marker_idx].start;

        let label_line = lines
            .get(marker_idx + 1)
            .ok_or_else(|| mismatch("marker is not followed by a summary line"))?;
        let summary = label_line
            .text
            .trim_start()
            .strip_prefix(self.format.summary_label.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .map(str::trim)
            .ok_or_else(|| mismatch("summary line has no label"))?;
        if summary.is_empty() {
            return Err(mismatch("summary is empty"));
        }

        let separator_idx = marker_idx + 2;
        let Some(separator) = lines.get(separator_idx) else {
            return Ok(ParsedArtifact {
                summary: summary.to_string(),
                content: String::new(),
                span: block_start..label_line.text_end(),
            });
        };
        if !separator.text.trim().is_empty() {
            return Err(mismatch("summary line is not followed by a blank line"));
        }

        let body_idx = separator_idx + 1;
        if let Some(open) = lines.get(body_idx) {
            if open.text.trim_start().starts_with(FENCE) {
                let close = lines[body_idx + 1..]
                    .iter()
                    .find(|line| line.text.trim() == FENCE);
                if let Some(close) = close {
                    return Ok(ParsedArtifact {
                        summary: summary.to_string(),
                        content: text[open.end..close.start].to_string(),
                        span: block_start..close.text_end(),
                    });
                }
            }
        }

        Ok(ParsedArtifact {
            summary: summary.to_string(),
            content: text[separator.end..].to_string(),
            span: block_start..text.len(),
        })
    }

    /// Writes `summary` and `content` as a block this parser reads back.
    ///
    /// The body is fenced when the content is empty or ends with a newline and
    /// contains no line that would close the fence; otherwise it is written
    /// verbatim. Content that opens a fence on its first line and also contains
    /// a closing fence line has no faithful block form.
    pub fn render_block(&self, summary: &str, content: &str) -> String {
        let ArtifactFormat {
            marker,
            summary_label,
        } = &self.format;
        let fence_safe = (content.is_empty() || content.ends_with('\n'))
            && !content.split('\n').any(|line| line.trim() == FENCE);
        if fence_safe {
            format!("{marker}\n{summary_label}: {summary}\n\n{FENCE}\n{content}{FENCE}")
        } else {
            format!("{marker}\n{summary_label}: {summary}\n\n{content}")
        }
    }
}
