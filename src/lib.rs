//! Front end of the Tanka compiler.
//!
//! Tanka is a small dependently-typed functional language with a
//! layout-sensitive surface syntax: statements begin at indentation zero and
//! continue over indented lines. The pipeline runs in three phases, each of
//! which reports failure as data rather than aborting:
//!
//! 1. [`segmenter`] splits raw text into position-tagged chunks (statements,
//!    comments, line breaks) by the off-side rule.
//! 2. [`syntax`] re-lexes each statement chunk against the surface grammar
//!    into a sugared syntax tree.
//! 3. [`core`] lowers the syntax tree into the core calculus with de Bruijn
//!    indices.
//!
//! [`frontend::parse_module`] drives all three; [`diagnostics`] renders the
//! collected errors against the original source.

pub mod core;
pub mod diagnostics;
pub mod frontend;
pub mod segmenter;
pub mod source;
pub mod syntax;

pub use diagnostics::{ErrorKind, FrontError, PhaseContext, SourceContext};
pub use frontend::{parse_module, ModuleSource};
pub use segmenter::{segment, Segmentation};
pub use source::Range;
