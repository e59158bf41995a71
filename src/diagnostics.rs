//! Unified diagnostics for the Tanka front end.
//!
//! The segmenter and the statement parser report failure as data; this
//! module turns that data into `miette` reports a caller can render against
//! the original source. Every diagnostic is a [`FrontError`]: a kind, the
//! source it points into, and presentation extras. Errors are created
//! through a [`PhaseContext`] so the diagnostic code always records which
//! pipeline phase produced it.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::segmenter::SegmenterError;

/// Source text plus the name diagnostics render it under.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to a `NamedSource` for attachment to a miette report.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Byte span of a whole (zero-based) line, newline excluded. Used for
    /// diagnostics that only know a line number.
    pub fn line_span(&self, line: usize) -> SourceSpan {
        let mut start = 0;
        for (index, text) in self.content.split('\n').enumerate() {
            if index == line {
                return (start..start + text.len()).into();
            }
            start += text.len() + 1;
        }
        unspanned()
    }
}

/// What went wrong, with the data each failure mode needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unexpected character '{character}' at indentation zero")]
    UnexpectedCharacter { character: char },
    #[error("block comment is never closed")]
    UnterminatedBlockComment,
    #[error("syntax error in statement: {message}")]
    MalformedStatement { message: String },
    #[error("invalid {literal_type} literal '{value}'")]
    InvalidLiteral {
        literal_type: &'static str,
        value: String,
    },
    #[error("'{identifier}' is not a valid identifier")]
    InvalidIdentifier { identifier: String },
}

impl ErrorKind {
    /// Diagnostic code suffix for this kind.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "unexpected_character",
            Self::UnterminatedBlockComment => "unterminated_block_comment",
            Self::MalformedStatement { .. } => "malformed_statement",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::InvalidIdentifier { .. } => "invalid_identifier",
        }
    }

    fn primary_label(&self) -> String {
        match self {
            Self::UnexpectedCharacter { .. } => "no statement or comment starts here".into(),
            Self::UnterminatedBlockComment => "opened here, never closed".into(),
            Self::MalformedStatement { .. } => "within this statement".into(),
            Self::InvalidLiteral { .. } => "invalid literal".into(),
            Self::InvalidIdentifier { .. } => "invalid identifier".into(),
        }
    }
}

/// Where an error points.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Presentation extras.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// A fully contextualised front-end diagnostic.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct FrontError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
}

impl Diagnostic for FrontError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

/// A pipeline phase that knows how to contextualise its errors.
#[derive(Debug, Clone)]
pub struct PhaseContext {
    pub source: SourceContext,
    pub phase: String,
}

impl PhaseContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }

    pub fn report(&self, kind: ErrorKind, span: SourceSpan) -> FrontError {
        let error_code = format!("tanka::{}::{}", self.phase, kind.code_suffix());
        FrontError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Placeholder span for errors without a usable source position.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Lifts a positional segmenter diagnostic into a renderable report.
///
/// `UnexpectedCharacterAtIndentationZero` only records a line, so its label
/// covers that whole line; `MissedBlockCommentClose` points at the two bytes
/// of the opening delimiter.
pub fn report_segmenter_error(ctx: &PhaseContext, error: &SegmenterError) -> FrontError {
    match error {
        SegmenterError::UnexpectedCharacterAtIndentationZero { character, line } => ctx.report(
            ErrorKind::UnexpectedCharacter {
                character: *character,
            },
            ctx.source.line_span(*line),
        ),
        SegmenterError::MissedBlockCommentClose { position, .. } => ctx.report(
            ErrorKind::UnterminatedBlockComment,
            SourceSpan::from(*position..position + 2),
        ),
    }
}

/// Prints a front-end error with full miette formatting. For user-facing
/// display; tests and tools should consume the error values directly.
pub fn print_error(error: FrontError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn context() -> PhaseContext {
        PhaseContext::new(
            SourceContext::from_file("demo.tanka", "#bad\n{-open\nrest"),
            "segment",
        )
    }

    #[test]
    fn line_span_covers_the_requested_line() {
        let ctx = context();
        assert_eq!(ctx.source.line_span(0), SourceSpan::from(0..4));
        assert_eq!(ctx.source.line_span(1), SourceSpan::from(5..11));
        assert_eq!(ctx.source.line_span(99), unspanned());
    }

    #[test]
    fn segmenter_errors_become_labelled_reports() {
        let ctx = context();
        let error = report_segmenter_error(
            &ctx,
            &SegmenterError::UnexpectedCharacterAtIndentationZero {
                character: '#',
                line: 0,
            },
        );
        assert_eq!(
            error.diagnostic_info.error_code,
            "tanka::segment::unexpected_character"
        );
        let output = format!("{:?}", Report::new(error));
        assert!(output.contains("unexpected character '#'"));
    }

    #[test]
    fn unterminated_block_comment_points_at_the_opening() {
        let ctx = context();
        let error = report_segmenter_error(
            &ctx,
            &SegmenterError::MissedBlockCommentClose {
                line: 1,
                column: 0,
                position: 5,
            },
        );
        assert_eq!(error.source_info.primary_span, SourceSpan::from(5..7));
        let output = format!("{:?}", Report::new(error));
        assert!(output.contains("never closed"));
    }
}
