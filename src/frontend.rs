//! The front-end pipeline: segment, parse, collect.
//!
//! [`parse_module`] never aborts on malformed input. Segmenter diagnostics
//! and statement parse failures land in the same error list while every
//! well-formed statement still yields a declaration, so tooling always gets
//! as much structure as the source supports.

use crate::core::{self, lower};
use crate::diagnostics::{report_segmenter_error, FrontError, PhaseContext, SourceContext};
use crate::segmenter::{segment, Chunk, Segmentation};
use crate::syntax::parser::parse_statement;
use crate::syntax::{Decl, Span, Spanned};

/// Everything the front end extracts from one source buffer.
///
/// The full chunk stream is kept alongside the parsed declarations so
/// formatters and highlighters can see comments and line breaks the parser
/// ignores.
#[derive(Debug)]
pub struct ModuleSource {
    pub segmentation: Segmentation,
    pub declarations: Vec<Spanned<Decl>>,
    pub errors: Vec<FrontError>,
}

impl ModuleSource {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Lowers the parsed declarations into a core module.
    pub fn lower(&self) -> core::Module<Span> {
        lower::lower_module(&self.declarations)
    }
}

/// Runs the whole front end over one source buffer.
pub fn parse_module(source: &SourceContext) -> ModuleSource {
    let segmentation = segment(&source.content);

    let segment_ctx = PhaseContext::new(source.clone(), "segment");
    let mut errors: Vec<FrontError> = segmentation
        .errors
        .iter()
        .map(|error| report_segmenter_error(&segment_ctx, error))
        .collect();

    let parse_ctx = PhaseContext::new(source.clone(), "parse");
    let mut declarations = Vec::new();
    for chunk in &segmentation.chunks {
        if let Chunk::WordStart { range, text } = chunk {
            match parse_statement(text, range.position_start, &parse_ctx) {
                Ok(declaration) => declarations.push(declaration),
                Err(error) => errors.push(error),
            }
        }
    }

    ModuleSource {
        segmentation,
        declarations,
        errors,
    }
}
