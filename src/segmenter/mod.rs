//! Layout-sensitive lexical segmentation.
//!
//! [`segment`] scans raw source text and splits it into position-tagged
//! chunks according to the off-side rule: every chunk begins at a control
//! point, a newline immediately followed by a non-space character. Statement
//! text is delimited but not interpreted here; the grammar parser re-lexes
//! each [`Chunk::WordStart`] on its own.
//!
//! Malformed input never aborts a call. Stray characters at indentation zero
//! and unterminated block comments are recorded as [`SegmenterError`] values
//! and the scan resumes at the next control point, so callers always receive
//! a best-effort chunk stream alongside the diagnostics.

pub mod chunk;
pub mod cursor;
pub mod matchers;

pub use chunk::{
    render_chunks, Chunk, ChunkVisitor, CommentPart, NonLineBreakString, SegmenterError,
    SegmenterErrorVisitor,
};

use serde::Serialize;

use crate::segmenter::cursor::Cursor;
use crate::segmenter::matchers::BlockCommentOutcome;

/// The immutable result of one segmentation call.
///
/// Concatenating the verbatim `Range` substrings of `chunks`, in order,
/// reconstructs the input text exactly; rendering the chunks instead
/// reconstructs it modulo collapsed trailing spaces before newlines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Segmentation {
    pub chunks: Vec<Chunk>,
    pub errors: Vec<SegmenterError>,
}

/// Splits `text` into top-level chunks plus recoverable diagnostics.
///
/// Pure and single-threaded: all mutable state lives in one [`Cursor`]
/// scoped to this call, so independent texts may be segmented concurrently.
pub fn segment(text: &str) -> Segmentation {
    let mut out = Segmentation::default();
    if text.is_empty() {
        return out;
    }

    let mut cursor = Cursor::new(text);
    // The first chunk has no preceding newline, so no anchored matcher can
    // apply; bootstrap with the inner matchers.
    if !text.starts_with('\n') {
        bootstrap(&mut cursor, &mut out);
    }
    while !cursor.is_at_end() {
        step(&mut cursor, &mut out);
    }
    out
}

fn bootstrap(cursor: &mut Cursor, out: &mut Segmentation) {
    if let Some(chunk) =
        matchers::match_line_comment_inner(cursor).or_else(|| matchers::match_word_inner(cursor))
    {
        out.chunks.push(chunk);
        return;
    }
    match matchers::match_multi_line_comment_inner(cursor) {
        Some(BlockCommentOutcome::Complete(chunk)) => {
            out.chunks.push(chunk);
            return;
        }
        Some(BlockCommentOutcome::Unterminated(error)) => {
            out.errors.push(error);
            cursor.advance_to_next_control_point();
            return;
        }
        None => {}
    }
    if let Some(chunk) = matchers::match_line_break(cursor) {
        out.chunks.push(chunk);
        return;
    }
    record_unexpected_character(cursor, out);
}

/// One main-loop iteration: the anchored matchers in fixed priority order,
/// then the line-break matcher, then error recovery.
///
/// Each anchored match consumed one newline through `start_match` that
/// belongs to no returned chunk; the driver re-materialises it as an explicit
/// `LineBreak` carrying that newline's own range, which keeps both the
/// reconstruction round-trip and position monotonicity intact.
fn step(cursor: &mut Cursor, out: &mut Segmentation) {
    if let Some((lead, chunk)) =
        matchers::match_line_comment(cursor).or_else(|| matchers::match_word(cursor))
    {
        out.chunks.push(Chunk::LineBreak { range: lead });
        out.chunks.push(chunk);
        return;
    }
    match matchers::match_multi_line_comment(cursor) {
        Some((lead, BlockCommentOutcome::Complete(chunk))) => {
            out.chunks.push(Chunk::LineBreak { range: lead });
            out.chunks.push(chunk);
            return;
        }
        Some((lead, BlockCommentOutcome::Unterminated(error))) => {
            out.chunks.push(Chunk::LineBreak { range: lead });
            out.errors.push(error);
            cursor.advance_to_next_control_point();
            return;
        }
        None => {}
    }
    if let Some(chunk) = matchers::match_line_break(cursor) {
        out.chunks.push(chunk);
        return;
    }
    record_unexpected_character(cursor, out);
}

fn record_unexpected_character(cursor: &mut Cursor, out: &mut Segmentation) {
    if let Some(character) = cursor.peek() {
        out.errors
            .push(SegmenterError::UnexpectedCharacterAtIndentationZero {
                character,
                line: cursor.line(),
            });
    }
    cursor.advance_to_next_control_point();
}
