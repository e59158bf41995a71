//! Output model of the segmenter: chunks, segmenter errors, and the visitor
//! contract over both.
//!
//! The original front end modelled these families as open class hierarchies
//! with one `visit_*` method per subtype. Here each family is a closed sum
//! type with exhaustive matching, and the double-dispatch surface survives as
//! the [`ChunkVisitor`] and [`SegmenterErrorVisitor`] traits: adding a
//! variant breaks every handler at compile time, which is the point.

use std::fmt;

use serde::Serialize;

use crate::source::Range;

/// A string guaranteed to contain no newline.
///
/// Only constructible through the validating [`NonLineBreakString::new`];
/// used for line-comment bodies and the lines of a block-comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonLineBreakString(String);

impl NonLineBreakString {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.contains('\n') {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonLineBreakString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a block-comment body: a line of text or a blank line.
/// The newline separators between entries are implicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommentPart {
    Line(NonLineBreakString),
    Break,
}

/// One classified, position-tagged span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Chunk {
    /// A single newline boundary, possibly preceded by trailing spaces.
    LineBreak { range: Range },
    /// A `--` comment through end of line, marker stripped.
    LineComment {
        range: Range,
        text: NonLineBreakString,
    },
    /// A `{-` … `-}` comment. `number_of_hyphens` records how many hyphens
    /// opened the block; the close must carry the same count.
    MultiLineComment {
        range: Range,
        body: Vec<CommentPart>,
        number_of_hyphens: usize,
    },
    /// Raw statement text starting at column zero, handed verbatim to the
    /// grammar parser. May span several lines.
    WordStart { range: Range, text: String },
}

impl Chunk {
    pub fn range(&self) -> Range {
        match self {
            Chunk::LineBreak { range }
            | Chunk::LineComment { range, .. }
            | Chunk::MultiLineComment { range, .. }
            | Chunk::WordStart { range, .. } => *range,
        }
    }

    /// Double-dispatch traversal over an externally supplied handler.
    pub fn visit<V: ChunkVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Chunk::LineBreak { range } => visitor.visit_line_break(*range),
            Chunk::LineComment { range, text } => visitor.visit_line_comment(*range, text),
            Chunk::MultiLineComment {
                range,
                body,
                number_of_hyphens,
            } => visitor.visit_multi_line_comment(*range, body, *number_of_hyphens),
            Chunk::WordStart { range, text } => visitor.visit_word_start(*range, text),
        }
    }

    /// Renders the chunk back to source text.
    pub fn render(&self) -> String {
        self.visit(&mut ChunkRenderer)
    }
}

/// Exhaustive handler over chunk variants.
pub trait ChunkVisitor {
    type Output;

    fn visit_line_break(&mut self, range: Range) -> Self::Output;
    fn visit_line_comment(&mut self, range: Range, text: &NonLineBreakString) -> Self::Output;
    fn visit_multi_line_comment(
        &mut self,
        range: Range,
        body: &[CommentPart],
        number_of_hyphens: usize,
    ) -> Self::Output;
    fn visit_word_start(&mut self, range: Range, text: &str) -> Self::Output;
}

/// The trivial pretty-printer: the segmenter's reconstruction round-trip is
/// defined in terms of this rendering.
struct ChunkRenderer;

impl ChunkVisitor for ChunkRenderer {
    type Output = String;

    fn visit_line_break(&mut self, _range: Range) -> String {
        "\n".to_string()
    }

    fn visit_line_comment(&mut self, _range: Range, text: &NonLineBreakString) -> String {
        format!("--{text}")
    }

    fn visit_multi_line_comment(
        &mut self,
        _range: Range,
        body: &[CommentPart],
        number_of_hyphens: usize,
    ) -> String {
        let hyphens = "-".repeat(number_of_hyphens);
        let body = body
            .iter()
            .map(|part| match part {
                CommentPart::Line(line) => line.as_str(),
                CommentPart::Break => "",
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{{{hyphens}{body}\n{hyphens}}}")
    }

    fn visit_word_start(&mut self, _range: Range, text: &str) -> String {
        text.to_string()
    }
}

/// Renders a whole chunk stream back to source text.
pub fn render_chunks(chunks: &[Chunk]) -> String {
    chunks.iter().map(Chunk::render).collect()
}

/// A recoverable segmentation diagnostic. The segmenter never aborts; these
/// accumulate next to the chunk stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SegmenterError {
    /// The cursor sat at column zero but no matcher recognised the content.
    UnexpectedCharacterAtIndentationZero { character: char, line: usize },
    /// A block comment was opened but no close with the same hyphen count
    /// was found before end of input. Positions point at the opening `{-`.
    MissedBlockCommentClose {
        line: usize,
        column: usize,
        position: usize,
    },
}

impl SegmenterError {
    /// Double-dispatch traversal over an externally supplied handler.
    pub fn visit<V: SegmenterErrorVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            SegmenterError::UnexpectedCharacterAtIndentationZero { character, line } => {
                visitor.visit_unexpected_character(*character, *line)
            }
            SegmenterError::MissedBlockCommentClose {
                line,
                column,
                position,
            } => visitor.visit_missed_block_comment_close(*line, *column, *position),
        }
    }
}

/// Exhaustive handler over segmenter error variants.
pub trait SegmenterErrorVisitor {
    type Output;

    fn visit_unexpected_character(&mut self, character: char, line: usize) -> Self::Output;
    fn visit_missed_block_comment_close(
        &mut self,
        line: usize,
        column: usize,
        position: usize,
    ) -> Self::Output;
}
