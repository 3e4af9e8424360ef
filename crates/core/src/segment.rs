//! Speaker segmentation of note text.
//!
//! A line that starts with `《name》` hands the floor to `name`; every other
//! line continues whoever spoke last. Consecutive turns of the same speaker
//! are merged into one segment.

use crate::types::Segment;
use regex::Regex;
use std::sync::LazyLock;

/// Speaker marker at the start of a trimmed line. The name is non-empty and
/// the closing bracket must be on the same line.
static SPEAKER_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^《(.+?)》").expect("speaker marker regex is valid"));

/// Characters that end a line, matching what presentation notes may contain.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Accumulates lines for the active speaker until the next marker.
#[derive(Debug, Default)]
struct TurnBuffer {
    speaker: Option<String>,
    parts: Vec<String>,
}

impl TurnBuffer {
    /// Emit the buffered text as a segment if it is non-empty after trimming.
    fn flush_into(&mut self, segments: &mut Vec<Segment>) {
        if self.parts.is_empty() {
            return;
        }
        let joined = self.parts.concat();
        self.parts.clear();

        let text = joined.trim();
        if !text.is_empty() {
            segments.push(Segment {
                speaker: self.speaker.clone(),
                text: text.to_string(),
            });
        }
    }
}

/// Split one note into speaker segments, merging adjacent same-speaker turns.
pub fn segment_note(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buffer = TurnBuffer::default();

    for line in text.split(is_line_break).map(str::trim) {
        if line.is_empty() {
            continue;
        }

        match SPEAKER_MARKER_REGEX.captures(line) {
            Some(caps) => {
                buffer.flush_into(&mut segments);
                buffer.speaker = Some(caps[1].to_string());

                let marker_end = caps.get(0).map_or(0, |m| m.end());
                let rest = &line[marker_end..];
                if !rest.is_empty() {
                    buffer.parts.push(rest.to_string());
                }
            }
            None => buffer.parts.push(line.to_string()),
        }
    }
    buffer.flush_into(&mut segments);

    merge_adjacent(segments)
}

/// Concatenate runs of adjacent segments that share a speaker.
fn merge_adjacent(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        match merged.last_mut() {
            Some(prev) if prev.speaker == segment.speaker => prev.text.push_str(&segment.text),
            _ => merged.push(segment),
        }
    }

    log::debug!("Segmented note into {} speaker segments", merged.len());
    merged
}
