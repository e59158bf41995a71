//! The scan cursor: the only mutable state of a segmentation call.
//!
//! A [`Cursor`] owns nothing but a borrow of the source text and the current
//! scan position in all three coordinate systems. Matchers move it forward
//! through [`Cursor::match_regex`] and [`Cursor::start_match`]; the driver
//! skips over malformed regions with
//! [`Cursor::advance_to_next_control_point`]. Every operation that consumes
//! text returns the [`Range`] it traversed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::source::Range;

lazy_static! {
    // A control point is a newline followed by a non-space, non-newline
    // character: the only positions where a new top-level chunk may begin.
    static ref CONTROL_POINT: Regex = Regex::new(r"\n[^ \n]").unwrap();
}

#[derive(Debug)]
pub struct Cursor<'src> {
    text: &'src str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            position: 0,
            line: 0,
            column: 0,
        }
    }

    /// The unconsumed remainder of the source text.
    pub fn rest(&self) -> &'src str {
        &self.text[self.position..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// The character under the cursor, if any.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Consumes the next `len` bytes, updating line and column, and returns
    /// the consumed text together with the traversed range.
    ///
    /// `len` must lie on a character boundary of the remaining text.
    pub fn advance(&mut self, len: usize) -> (&'src str, Range) {
        let consumed = &self.text[self.position..self.position + len];
        let line_start = self.line;
        let column_start = self.column;
        let position_start = self.position;

        self.line += consumed.bytes().filter(|&b| b == b'\n').count();
        self.column = match consumed.rfind('\n') {
            Some(last) => consumed[last + 1..].chars().count(),
            None => self.column + consumed.chars().count(),
        };
        self.position += len;

        let range = Range {
            line_start,
            line_end: self.line,
            column_start,
            column_end: self.column,
            position_start,
            position_end: self.position,
        };
        (consumed, range)
    }

    /// Attempts `pattern` at the cursor; on success consumes the match and
    /// returns the matched text with its range.
    ///
    /// Patterns must be anchored with `\A` so that a match can only occur at
    /// the cursor itself.
    pub fn match_regex(&mut self, pattern: &Regex) -> Option<(&'src str, Range)> {
        let found = pattern.find(self.rest())?;
        debug_assert_eq!(found.start(), 0, "matcher pattern is not \\A-anchored");
        Some(self.advance(found.end()))
    }

    /// Zero-width lookahead for an indentation-zero boundary: succeeds when a
    /// newline sits under the cursor and `anchor` matches at the start of the
    /// next line. Consumes only the newline and returns its range; the anchor
    /// text is left for the next matcher.
    ///
    /// `anchor` must be `\A`-anchored and must not match a newline itself;
    /// that is a contract on the caller, not a runtime-checked condition.
    pub fn start_match(&mut self, anchor: &Regex) -> Option<Range> {
        let next_line = self.rest().strip_prefix('\n')?;
        if !anchor.is_match(next_line) {
            return None;
        }
        let (_, range) = self.advance(1);
        Some(range)
    }

    /// Recovery primitive: skips forward to the next control point, or to end
    /// of input when none remains, and returns the skipped range.
    ///
    /// The cursor ends up just before the control point's newline, which is
    /// exactly where the anchored matchers expect to resume. The character
    /// under the cursor is always skipped, so the cursor strictly advances on
    /// every non-empty remainder; the driver's termination depends on this.
    pub fn advance_to_next_control_point(&mut self) -> Range {
        let skip = self.peek().map_or(0, char::len_utf8);
        let len = match CONTROL_POINT.find(&self.rest()[skip..]) {
            Some(found) => skip + found.start(),
            None => self.rest().len(),
        };
        self.advance(len).1
    }
}
