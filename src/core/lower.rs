//! Lowering from the surface syntax tree into core terms.
//!
//! A purely structural rewrite. Binders become de Bruijn indices counted
//! outward from the use site; names with no enclosing binder become
//! [`Term::FreeVariable`] for a later resolution phase. Multi-binder lambdas
//! unfold into nested single-parameter abstractions and definition binders
//! fold into the body the same way, so downstream phases only ever see one
//! binder at a time. Spans travel along as the `info` payload.

use crate::core::{Item, Module, ModuleHeader, Term};
use crate::syntax::{self, Decl, Span, Spanned};

/// The binders in scope at the current rewrite position, innermost last.
#[derive(Debug, Default)]
struct Scope {
    names: Vec<String>,
}

impl Scope {
    /// De Bruijn index of `name`, if bound. Innermost binders shadow outer
    /// ones, so the search runs from the end.
    fn lookup(&self, name: &str) -> Option<usize> {
        self.names.iter().rev().position(|bound| bound == name)
    }

    fn with_binder<T>(&mut self, name: &str, body: impl FnOnce(&mut Scope) -> T) -> T {
        self.names.push(name.to_string());
        let result = body(self);
        self.names.pop();
        result
    }
}

/// Lowers one surface term. Free at the top level means free in the result.
pub fn lower_term(term: &Spanned<syntax::Term>) -> Term<Span> {
    lower_in(term, &mut Scope::default())
}

/// Lowers the statements of one module in source order.
///
/// A `module … where` header is recorded when present; later headers are
/// lowered as if they were the first, which a validation phase may reject.
pub fn lower_module(declarations: &[Spanned<Decl>]) -> Module<Span> {
    let mut module = Module::default();
    for declaration in declarations {
        lower_declaration(declaration, &mut module);
    }
    module
}

fn lower_declaration(declaration: &Spanned<Decl>, module: &mut Module<Span>) {
    match &declaration.value {
        Decl::ModuleHeader { name } => {
            if module.header.is_none() {
                module.header = Some(ModuleHeader {
                    name: name.value.to_dotted(),
                    info: declaration.span,
                });
            }
        }
        Decl::Declaration { name, typ } => module.items.push(Item::Declaration {
            name: name.value.as_str().to_string(),
            typ: lower_term(typ),
            info: declaration.span,
        }),
        Decl::Definition {
            name,
            binders,
            body,
        } => module.items.push(Item::Definition {
            name: name.value.as_str().to_string(),
            body: lower_binders(binders, body, &mut Scope::default()),
            info: declaration.span,
        }),
    }
}

/// Folds `f x y = e` into `\x -> \y -> e`, one abstraction per binder.
fn lower_binders(
    binders: &[Spanned<syntax::SingleIdentifier>],
    body: &Spanned<syntax::Term>,
    scope: &mut Scope,
) -> Term<Span> {
    match binders.split_first() {
        None => lower_in(body, scope),
        Some((binder, rest)) => {
            let parameter = binder.value.as_str().to_string();
            let inner = scope.with_binder(&parameter, |scope| lower_binders(rest, body, scope));
            Term::Abstraction {
                parameter,
                body: Box::new(inner),
                info: Span {
                    start: binder.span.start,
                    end: body.span.end,
                },
            }
        }
    }
}

fn lower_in(term: &Spanned<syntax::Term>, scope: &mut Scope) -> Term<Span> {
    let info = term.span;
    match &term.value {
        syntax::Term::Int(value) => Term::IntValue {
            value: *value,
            info,
        },
        syntax::Term::Universe(level) => Term::Universe {
            level: *level,
            info,
        },
        syntax::Term::Hole(name) => Term::Hole {
            name: name.as_str().to_string(),
            info,
        },

        syntax::Term::Var(identifier) => {
            // Only dot-free names can be bound locally; dotted paths always
            // refer to another module.
            if identifier.is_single() {
                if let Some(index) = scope.lookup(identifier.suffix.as_str()) {
                    return Term::Variable {
                        index,
                        original_name: identifier.suffix.as_str().to_string(),
                        info,
                    };
                }
            }
            Term::FreeVariable {
                name: identifier.to_dotted(),
                info,
            }
        }

        syntax::Term::Apply(left, right) => Term::Application {
            left: Box::new(lower_in(left, scope)),
            right: Box::new(lower_in(right, scope)),
            info,
        },

        syntax::Term::Arrow(domain, codomain) => Term::Forall {
            parameter: None,
            domain: Box::new(lower_in(domain, scope)),
            codomain: Box::new(lower_in(codomain, scope)),
            info,
        },

        syntax::Term::Lambda(binders, body) => lower_binders(binders, body, scope),

        syntax::Term::Let { name, bound, body } => {
            // The bound term is outside the binding; only the body sees it.
            let bound = lower_in(bound, scope);
            let body = scope.with_binder(name.value.as_str(), |scope| lower_in(body, scope));
            Term::Let {
                name: name.value.as_str().to_string(),
                bound: Box::new(bound),
                body: Box::new(body),
                info,
            }
        }

        syntax::Term::Annotation(expression, annotation) => Term::Annotation {
            expression: Box::new(lower_in(expression, scope)),
            annotation: Box::new(lower_in(annotation, scope)),
            info,
        },
    }
}
