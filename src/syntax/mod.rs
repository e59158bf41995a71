//! Surface syntax of Tanka: the sugared syntax tree built from one
//! `WordStart` chunk, with byte-span tracking into the whole source buffer.

pub mod parser;

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Byte span into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Moves the span by `offset` bytes; used to lift chunk-relative spans
    /// into whole-buffer coordinates.
    pub fn shift(self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Wrapper carrying a span with any syntax value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

lazy_static! {
    // One letter, or a letter/underscore followed by at least one more
    // identifier character. A lone underscore is not an identifier.
    static ref SINGLE_IDENTIFIER: Regex =
        Regex::new(r"\A(?:[a-zA-Z]|[a-zA-Z_][a-zA-Z0-9_']+)\z").unwrap();
}

/// An identifier segment with no dots. Only constructible through the
/// validating [`SingleIdentifier::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleIdentifier(String);

impl SingleIdentifier {
    pub fn new(candidate: &str) -> Option<Self> {
        if SINGLE_IDENTIFIER.is_match(candidate) {
            Some(Self(candidate.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SingleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty dotted identifier: `A.B.c` is prefix `[A, B]` with suffix
/// `c`. Position information lives at the whole-identifier level; splitting
/// it per segment would not help any consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub prefix: Vec<SingleIdentifier>,
    pub suffix: SingleIdentifier,
}

impl Identifier {
    /// Parses a dotted identifier, validating every segment.
    pub fn parse(dotted: &str) -> Option<Self> {
        let mut segments = dotted
            .split('.')
            .map(SingleIdentifier::new)
            .collect::<Option<Vec<_>>>()?;
        let suffix = segments.pop()?;
        Some(Self {
            prefix: segments,
            suffix,
        })
    }

    pub fn is_single(&self) -> bool {
        self.prefix.is_empty()
    }

    pub fn to_dotted(&self) -> String {
        let mut out = String::new();
        for segment in &self.prefix {
            out.push_str(segment.as_str());
            out.push('.');
        }
        out.push_str(self.suffix.as_str());
        out
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

/// A surface term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term {
    Var(Identifier),
    Int(i64),
    /// `Type0`, `Type1`, …
    Universe(u32),
    /// `?name`
    Hole(SingleIdentifier),
    Apply(Box<Spanned<Term>>, Box<Spanned<Term>>),
    Arrow(Box<Spanned<Term>>, Box<Spanned<Term>>),
    Lambda(Vec<Spanned<SingleIdentifier>>, Box<Spanned<Term>>),
    Let {
        name: Spanned<SingleIdentifier>,
        bound: Box<Spanned<Term>>,
        body: Box<Spanned<Term>>,
    },
    /// `(e : t)`
    Annotation(Box<Spanned<Term>>, Box<Spanned<Term>>),
}

impl Term {
    /// Pretty-prints the term, fully parenthesised.
    pub fn pretty(&self) -> String {
        match self {
            Term::Var(identifier) => identifier.to_dotted(),
            Term::Int(value) => value.to_string(),
            Term::Universe(level) => format!("Type{level}"),
            Term::Hole(name) => format!("?{name}"),
            Term::Apply(left, right) => {
                format!("({} {})", left.value.pretty(), right.value.pretty())
            }
            Term::Arrow(domain, codomain) => {
                format!("({} -> {})", domain.value.pretty(), codomain.value.pretty())
            }
            Term::Lambda(binders, body) => {
                let binders = binders
                    .iter()
                    .map(|b| b.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("(\\{binders} -> {})", body.value.pretty())
            }
            Term::Let { name, bound, body } => format!(
                "(let {} = {} in {})",
                name.value,
                bound.value.pretty(),
                body.value.pretty()
            ),
            Term::Annotation(expression, annotation) => format!(
                "({} : {})",
                expression.value.pretty(),
                annotation.value.pretty()
            ),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

/// One top-level statement, i.e. the parse of one `WordStart` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Decl {
    /// `module X where`
    ModuleHeader { name: Spanned<Identifier> },
    /// `name : term`
    Declaration {
        name: Spanned<SingleIdentifier>,
        typ: Spanned<Term>,
    },
    /// `name binders… = term`
    Definition {
        name: Spanned<SingleIdentifier>,
        binders: Vec<Spanned<SingleIdentifier>>,
        body: Spanned<Term>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_identifiers_follow_the_original_shape() {
        assert!(SingleIdentifier::new("a").is_some());
        assert!(SingleIdentifier::new("_a").is_some());
        assert!(SingleIdentifier::new("x'").is_some());
        assert!(SingleIdentifier::new("Nat").is_some());
        assert!(SingleIdentifier::new("_").is_none());
        assert!(SingleIdentifier::new("1a").is_none());
        assert!(SingleIdentifier::new("").is_none());
        assert!(SingleIdentifier::new("a.b").is_none());
    }

    #[test]
    fn dotted_identifiers_split_into_prefix_and_suffix() {
        let identifier = Identifier::parse("A.B.c").unwrap();
        assert_eq!(identifier.prefix.len(), 2);
        assert_eq!(identifier.suffix.as_str(), "c");
        assert_eq!(identifier.to_dotted(), "A.B.c");
        assert!(!identifier.is_single());

        assert!(Identifier::parse("lone").unwrap().is_single());
        assert!(Identifier::parse("a..b").is_none());
        assert!(Identifier::parse("").is_none());
    }
}
