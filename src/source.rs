//! Source position tracking for the Tanka front end.
//!
//! A [`Range`] describes a half-open span of source text in three coordinate
//! systems at once: zero-based lines, character columns, and byte offsets.
//! Every chunk the segmenter emits and every diagnostic it records owns
//! exactly one `Range`; downstream consumers slice the original buffer with
//! the byte coordinates and render positions with the line/column pair.

use serde::Serialize;

/// A half-open span of source text.
///
/// Invariant: every `*_start` field is `<=` its `*_end` counterpart.
/// `position_*` are byte offsets into the source buffer; `column_*` count
/// characters since the last newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Range {
    pub line_start: usize,
    pub line_end: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub position_start: usize,
    pub position_end: usize,
}

impl Range {
    /// Width of the span in bytes.
    pub fn width(&self) -> usize {
        self.position_end - self.position_start
    }

    /// Smallest range covering both `self` and `other`.
    pub fn merge(self, other: Range) -> Range {
        let (first, last) = if self.position_start <= other.position_start {
            (self, other)
        } else {
            (other, self)
        };
        Range {
            line_start: first.line_start,
            line_end: first.line_end.max(last.line_end),
            column_start: first.column_start,
            column_end: if first.line_end >= last.line_end {
                first.column_end.max(last.column_end)
            } else {
                last.column_end
            },
            position_start: first.position_start,
            position_end: first.position_end.max(last.position_end),
        }
    }

    /// The verbatim text this range covers in `source`.
    pub fn slice<'src>(&self, source: &'src str) -> &'src str {
        &source[self.position_start..self.position_end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(lines: (usize, usize), columns: (usize, usize), positions: (usize, usize)) -> Range {
        Range {
            line_start: lines.0,
            line_end: lines.1,
            column_start: columns.0,
            column_end: columns.1,
            position_start: positions.0,
            position_end: positions.1,
        }
    }

    #[test]
    fn merge_is_order_independent() {
        let a = range((0, 0), (0, 4), (0, 4));
        let b = range((2, 3), (0, 2), (10, 17));
        let merged = range((0, 3), (0, 2), (0, 17));
        assert_eq!(a.merge(b), merged);
        assert_eq!(b.merge(a), merged);
    }

    #[test]
    fn merge_on_one_line_keeps_the_wider_column() {
        let a = range((1, 1), (0, 4), (5, 9));
        let b = range((1, 1), (6, 8), (11, 13));
        assert_eq!(a.merge(b), range((1, 1), (0, 8), (5, 13)));
    }

    #[test]
    fn slice_uses_byte_coordinates() {
        let source = "ab\ncd";
        let r = range((0, 1), (0, 2), (0, 5));
        assert_eq!(r.slice(source), "ab\ncd");
        assert_eq!(r.width(), 5);
    }
}
