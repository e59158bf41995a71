//! The fixed set of chunk recognisers.
//!
//! Each matcher comes in two call conventions. The `*_inner` form assumes its
//! lead-in token sits exactly under the cursor; the driver uses it only at
//! the very start of input, where no newline precedes the first chunk. The
//! anchored form first confirms through [`Cursor::start_match`] that a
//! newline immediately precedes the lead-in token, consumes that newline, and
//! delegates to the inner form. A matcher that does not apply returns `None`
//! and leaves the cursor untouched, so the driver can try the next one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::segmenter::chunk::{Chunk, CommentPart, NonLineBreakString, SegmenterError};
use crate::segmenter::cursor::Cursor;
use crate::source::Range;

lazy_static! {
    static ref LINE_COMMENT_INNER: Regex = Regex::new(r"\A--[^\n]*").unwrap();
    static ref LINE_COMMENT_LEAD: Regex = Regex::new(r"\A--").unwrap();
    // Exactly the is_word_char class; \w would also admit marks and
    // connector punctuation the inner scanner rejects.
    static ref WORD_LEAD: Regex = Regex::new(r"\A[\p{Alphabetic}\p{N}_]").unwrap();
    static ref BLOCK_COMMENT_OPEN: Regex = Regex::new(r"\A\{-+").unwrap();
    static ref BLOCK_COMMENT_LEAD: Regex = Regex::new(r"\A\{-").unwrap();
    static ref LINE_BREAK: Regex = Regex::new(r"\A *\n").unwrap();
}

/// Result of a block-comment attempt that did apply: either a complete chunk
/// or a diagnostic for an unterminated comment. The driver must treat the
/// latter as "record and recover", not as "try the next matcher".
#[derive(Debug)]
pub enum BlockCommentOutcome {
    Complete(Chunk),
    Unterminated(SegmenterError),
}

/// Recognises `--` through end of line, marker stripped, newline untouched.
pub fn match_line_comment_inner(cursor: &mut Cursor) -> Option<Chunk> {
    let (matched, range) = cursor.match_regex(&LINE_COMMENT_INNER)?;
    // The pattern excludes newlines, so the validated constructor accepts.
    let text = NonLineBreakString::new(&matched[2..])?;
    Some(Chunk::LineComment { range, text })
}

/// Anchored form of [`match_line_comment_inner`].
pub fn match_line_comment(cursor: &mut Cursor) -> Option<(Range, Chunk)> {
    let lead = cursor.start_match(&LINE_COMMENT_LEAD)?;
    // The anchor guarantees the marker is present.
    let chunk = match_line_comment_inner(cursor)?;
    Some((lead, chunk))
}

// Must agree with WORD_LEAD: the anchored matcher consumes its newline
// before the inner scanner runs, so a lead the scanner then rejects would
// leave that newline owned by no chunk.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `line` opens a new top-level region: the next word, a comment,
/// or a parenthesised form at indentation zero.
fn begins_statement(line: &str) -> bool {
    line.starts_with("--")
        || line.starts_with('(')
        || line.starts_with("{-")
        || line.chars().next().is_some_and(is_word_char)
}

/// Recognises the longest run of statement text: starts at a word character
/// and continues across newlines until just before the next indentation-zero
/// boundary or end of input.
///
/// This is the highest-volume matcher, so it is a hand-written scanner
/// rather than a regex: it walks the newlines of the remainder and inspects
/// the first character of each following line.
pub fn match_word_inner(cursor: &mut Cursor) -> Option<Chunk> {
    let rest = cursor.rest();
    if !rest.chars().next().is_some_and(is_word_char) {
        return None;
    }

    let mut end = rest.len();
    let mut from = 0;
    while let Some(offset) = rest[from..].find('\n') {
        let newline = from + offset;
        if begins_statement(&rest[newline + 1..]) {
            end = newline;
            break;
        }
        from = newline + 1;
    }

    let (text, range) = cursor.advance(end);
    Some(Chunk::WordStart {
        range,
        text: text.to_string(),
    })
}

/// Anchored form of [`match_word_inner`].
pub fn match_word(cursor: &mut Cursor) -> Option<(Range, Chunk)> {
    let lead = cursor.start_match(&WORD_LEAD)?;
    let chunk = match_word_inner(cursor)?;
    Some((lead, chunk))
}

/// Splits a block-comment body at its internal newlines. Non-blank lines keep
/// their interior whitespace; blank and space-only lines become [`CommentPart::Break`].
fn split_comment_body(body: &str) -> Vec<CommentPart> {
    body.split('\n')
        .map(|item| match NonLineBreakString::new(item) {
            Some(line) if !item.trim_start().is_empty() => CommentPart::Line(line),
            _ => CommentPart::Break,
        })
        .collect()
}

/// Recognises a `{-` … `-}` block comment. The opening run of hyphens fixes
/// the hyphen count the close must repeat, and the close must sit at the
/// start of a line. When the open matches but no close follows, the outcome
/// is [`BlockCommentOutcome::Unterminated`] and the cursor stays put.
pub fn match_multi_line_comment_inner(cursor: &mut Cursor) -> Option<BlockCommentOutcome> {
    let rest = cursor.rest();
    let open = BLOCK_COMMENT_OPEN.find(rest)?;
    let number_of_hyphens = open.end() - 1;

    let close = format!("\n{}}}", "-".repeat(number_of_hyphens));
    let Some(body_end) = rest[open.end()..].find(&close).map(|at| at + open.end()) else {
        return Some(BlockCommentOutcome::Unterminated(
            SegmenterError::MissedBlockCommentClose {
                line: cursor.line(),
                column: cursor.column(),
                position: cursor.position(),
            },
        ));
    };

    let body = split_comment_body(&rest[open.end()..body_end]);
    let (_, range) = cursor.advance(body_end + close.len());
    Some(BlockCommentOutcome::Complete(Chunk::MultiLineComment {
        range,
        body,
        number_of_hyphens,
    }))
}

/// Anchored form of [`match_multi_line_comment_inner`].
pub fn match_multi_line_comment(cursor: &mut Cursor) -> Option<(Range, BlockCommentOutcome)> {
    let lead = cursor.start_match(&BLOCK_COMMENT_LEAD)?;
    let outcome = match_multi_line_comment_inner(cursor)?;
    Some((lead, outcome))
}

/// Recognises one newline, optionally preceded by a run of spaces.
pub fn match_line_break(cursor: &mut Cursor) -> Option<Chunk> {
    let (_, range) = cursor.match_regex(&LINE_BREAK)?;
    Some(Chunk::LineBreak { range })
}
