//! Core term language.
//!
//! The desugared calculus the surface syntax lowers into. Bound variables are
//! de Bruijn indices; names survive only for printing. Every node carries an
//! `info` payload, generic so the pipeline can thread spans through lowering
//! without the core types knowing about source positions.

pub mod lower;

use std::fmt;

use serde::Serialize;

/// A core term. `I` is the per-node info payload (byte spans in this crate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term<I> {
    IntValue {
        value: i64,
        info: I,
    },
    /// A named gap to be solved later, `?name` in the surface syntax.
    Hole {
        name: String,
        info: I,
    },
    Universe {
        level: u32,
        info: I,
    },
    /// A bound variable. `index` counts binders outward from the use site;
    /// `original_name` is kept for printing only.
    Variable {
        index: usize,
        original_name: String,
        info: I,
    },
    /// A name bound by no enclosing binder. Resolution against other modules
    /// happens in a later phase.
    FreeVariable {
        name: String,
        info: I,
    },
    Abstraction {
        parameter: String,
        body: Box<Term<I>>,
        info: I,
    },
    /// A dependent function type. `parameter` is `None` for plain arrows,
    /// whose codomain cannot mention the domain value.
    Forall {
        parameter: Option<String>,
        domain: Box<Term<I>>,
        codomain: Box<Term<I>>,
        info: I,
    },
    Application {
        left: Box<Term<I>>,
        right: Box<Term<I>>,
        info: I,
    },
    Let {
        name: String,
        bound: Box<Term<I>>,
        body: Box<Term<I>>,
        info: I,
    },
    Annotation {
        expression: Box<Term<I>>,
        annotation: Box<Term<I>>,
        info: I,
    },
}

impl<I> Term<I> {
    pub fn info(&self) -> &I {
        match self {
            Term::IntValue { info, .. }
            | Term::Hole { info, .. }
            | Term::Universe { info, .. }
            | Term::Variable { info, .. }
            | Term::FreeVariable { info, .. }
            | Term::Abstraction { info, .. }
            | Term::Forall { info, .. }
            | Term::Application { info, .. }
            | Term::Let { info, .. }
            | Term::Annotation { info, .. } => info,
        }
    }

    /// Pretty-prints the term, fully parenthesised, original names restored.
    pub fn pretty(&self) -> String {
        match self {
            Term::IntValue { value, .. } => value.to_string(),
            Term::Hole { name, .. } => format!("?{name}"),
            Term::Universe { level, .. } => format!("Type{level}"),
            Term::Variable {
                index,
                original_name,
                ..
            } => format!("{original_name}#{index}"),
            Term::FreeVariable { name, .. } => name.clone(),
            Term::Abstraction {
                parameter, body, ..
            } => format!("(\\{parameter} -> {})", body.pretty()),
            Term::Forall {
                parameter,
                domain,
                codomain,
                ..
            } => match parameter {
                Some(parameter) => format!(
                    "(({parameter} : {}) -> {})",
                    domain.pretty(),
                    codomain.pretty()
                ),
                None => format!("({} -> {})", domain.pretty(), codomain.pretty()),
            },
            Term::Application { left, right, .. } => {
                format!("({} {})", left.pretty(), right.pretty())
            }
            Term::Let {
                name, bound, body, ..
            } => format!("(let {name} = {} in {})", bound.pretty(), body.pretty()),
            Term::Annotation {
                expression,
                annotation,
                ..
            } => format!("({} : {})", expression.pretty(), annotation.pretty()),
        }
    }
}

impl<I> fmt::Display for Term<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

/// `module X where`, at most one per module, first statement when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHeader<I> {
    pub name: String,
    pub info: I,
}

/// One lowered top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Item<I> {
    /// `name : typ`
    Declaration {
        name: String,
        typ: Term<I>,
        info: I,
    },
    /// `name = body`, surface binders already folded into the body.
    Definition {
        name: String,
        body: Term<I>,
        info: I,
    },
}

impl<I> Item<I> {
    pub fn name(&self) -> &str {
        match self {
            Item::Declaration { name, .. } | Item::Definition { name, .. } => name,
        }
    }
}

/// A lowered module: the header, if any, plus its items in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module<I> {
    pub header: Option<ModuleHeader<I>>,
    pub items: Vec<Item<I>>,
}

impl<I> Default for Module<I> {
    fn default() -> Self {
        Self {
            header: None,
            items: Vec::new(),
        }
    }
}
