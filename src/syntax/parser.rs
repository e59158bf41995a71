//! Grammar-driven statement parser.
//!
//! A thin adapter over `pest`: each `WordStart` chunk from the segmenter is
//! re-lexed here against `grammar.pest` and turned into one [`Decl`]. All
//! spans are shifted by the chunk's byte offset so they point into the whole
//! source buffer, not into the chunk.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::diagnostics::{ErrorKind, FrontError, PhaseContext};
use crate::syntax::{Decl, Identifier, SingleIdentifier, Span, Spanned, Term};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct StatementParser;

/// Parses the text of one `WordStart` chunk into a declaration. `offset` is
/// the chunk's `position_start` in the source buffer.
pub fn parse_statement(
    text: &str,
    offset: usize,
    ctx: &PhaseContext,
) -> Result<Spanned<Decl>, FrontError> {
    let pairs = StatementParser::parse(Rule::statement, text)
        .map_err(|error| convert_parse_error(error, offset, ctx))?;
    let statement = pairs.peek().unwrap(); // pest guarantees the statement rule exists

    let decl = statement
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .unwrap(); // the statement rule has exactly one declaration inside
    build_decl(decl, offset, ctx)
}

fn span_of(pair: &Pair<Rule>, offset: usize) -> Span {
    let span = pair.as_span();
    Span {
        start: span.start(),
        end: span.end(),
    }
    .shift(offset)
}

fn build_decl(pair: Pair<Rule>, offset: usize, ctx: &PhaseContext) -> Result<Spanned<Decl>, FrontError> {
    let span = span_of(&pair, offset);
    match pair.as_rule() {
        Rule::module_header => {
            let name = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::identifier)
                .unwrap(); // the grammar requires a module name
            let name = build_identifier(&name, offset, ctx)?;
            Ok(Spanned::new(Decl::ModuleHeader { name }, span))
        }
        Rule::declaration => {
            let mut inner = pair.into_inner();
            let name = build_single_identifier(&inner.next().unwrap(), offset, ctx)?;
            let typ = build_term(inner.next().unwrap(), offset, ctx)?;
            Ok(Spanned::new(Decl::Declaration { name, typ }, span))
        }
        Rule::definition => {
            let mut inner: Vec<_> = pair.into_inner().collect();
            let body = build_term(inner.pop().unwrap(), offset, ctx)?;
            let mut names = inner.into_iter();
            let name = build_single_identifier(&names.next().unwrap(), offset, ctx)?;
            let binders = names
                .map(|binder| build_binder(binder, offset, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Spanned::new(
                Decl::Definition {
                    name,
                    binders,
                    body,
                },
                span,
            ))
        }
        other => unreachable!("statement rule produced {other:?}"),
    }
}

fn build_term(pair: Pair<Rule>, offset: usize, ctx: &PhaseContext) -> Result<Spanned<Term>, FrontError> {
    let span = span_of(&pair, offset);
    match pair.as_rule() {
        Rule::term | Rule::atom => {
            let inner = pair.into_inner().next().unwrap(); // single inner by grammar
            build_term(inner, offset, ctx)
        }

        Rule::lambda => {
            let mut binders = Vec::new();
            let mut body = None;
            for part in pair.into_inner() {
                match part.as_rule() {
                    Rule::binder => binders.push(build_binder(part, offset, ctx)?),
                    _ => body = Some(build_term(part, offset, ctx)?),
                }
            }
            let body = body.unwrap(); // the grammar requires a lambda body
            Ok(Spanned::new(Term::Lambda(binders, Box::new(body)), span))
        }

        Rule::let_term => {
            let mut parts = pair
                .into_inner()
                .filter(|p| !matches!(p.as_rule(), Rule::kw_let | Rule::kw_in));
            let name = build_single_identifier(&parts.next().unwrap(), offset, ctx)?;
            let bound = build_term(parts.next().unwrap(), offset, ctx)?;
            let body = build_term(parts.next().unwrap(), offset, ctx)?;
            Ok(Spanned::new(
                Term::Let {
                    name,
                    bound: Box::new(bound),
                    body: Box::new(body),
                },
                span,
            ))
        }

        Rule::arrow => {
            let mut inner = pair.into_inner();
            let domain = build_term(inner.next().unwrap(), offset, ctx)?;
            match inner.next() {
                None => Ok(domain),
                Some(codomain) => {
                    let codomain = build_term(codomain, offset, ctx)?;
                    Ok(Spanned::new(
                        Term::Arrow(Box::new(domain), Box::new(codomain)),
                        span,
                    ))
                }
            }
        }

        Rule::application => {
            let mut inner = pair.into_inner();
            let mut applied = build_term(inner.next().unwrap(), offset, ctx)?;
            for argument in inner {
                let argument = build_term(argument, offset, ctx)?;
                let span = Span {
                    start: applied.span.start,
                    end: argument.span.end,
                };
                applied = Spanned::new(Term::Apply(Box::new(applied), Box::new(argument)), span);
            }
            Ok(applied)
        }

        Rule::paren => {
            let mut inner = pair.into_inner();
            let expression = build_term(inner.next().unwrap(), offset, ctx)?;
            match inner.next() {
                None => Ok(expression),
                Some(annotation) => {
                    let annotation = build_term(annotation, offset, ctx)?;
                    Ok(Spanned::new(
                        Term::Annotation(Box::new(expression), Box::new(annotation)),
                        span,
                    ))
                }
            }
        }

        Rule::universe => {
            let digits = &pair.as_str()["Type".len()..];
            let level = digits.parse::<u32>().map_err(|_| {
                ctx.report(
                    ErrorKind::InvalidLiteral {
                        literal_type: "universe",
                        value: pair.as_str().to_string(),
                    },
                    (span.start..span.end).into(),
                )
            })?;
            Ok(Spanned::new(Term::Universe(level), span))
        }

        Rule::integer => {
            let value = pair.as_str().parse::<i64>().map_err(|_| {
                ctx.report(
                    ErrorKind::InvalidLiteral {
                        literal_type: "integer",
                        value: pair.as_str().to_string(),
                    },
                    (span.start..span.end).into(),
                )
            })?;
            Ok(Spanned::new(Term::Int(value), span))
        }

        Rule::hole => {
            let name = &pair.as_str()[1..];
            let name = SingleIdentifier::new(name).ok_or_else(|| {
                ctx.report(
                    ErrorKind::InvalidIdentifier {
                        identifier: name.to_string(),
                    },
                    (span.start..span.end).into(),
                )
            })?;
            Ok(Spanned::new(Term::Hole(name), span))
        }

        Rule::identifier => {
            let identifier = build_identifier(&pair, offset, ctx)?;
            Ok(Spanned::new(Term::Var(identifier.value), span))
        }

        other => unreachable!("term grammar produced {other:?}"),
    }
}

fn build_identifier(
    pair: &Pair<Rule>,
    offset: usize,
    ctx: &PhaseContext,
) -> Result<Spanned<Identifier>, FrontError> {
    let span = span_of(pair, offset);
    let identifier = Identifier::parse(pair.as_str()).ok_or_else(|| {
        ctx.report(
            ErrorKind::InvalidIdentifier {
                identifier: pair.as_str().to_string(),
            },
            (span.start..span.end).into(),
        )
    })?;
    Ok(Spanned::new(identifier, span))
}

/// Names that introduce bindings must be dot-free.
fn build_single_identifier(
    pair: &Pair<Rule>,
    offset: usize,
    ctx: &PhaseContext,
) -> Result<Spanned<SingleIdentifier>, FrontError> {
    let span = span_of(pair, offset);
    let name = SingleIdentifier::new(pair.as_str()).ok_or_else(|| {
        ctx.report(
            ErrorKind::InvalidIdentifier {
                identifier: pair.as_str().to_string(),
            },
            (span.start..span.end).into(),
        )
    })?;
    Ok(Spanned::new(name, span))
}

fn build_binder(
    pair: Pair<Rule>,
    offset: usize,
    ctx: &PhaseContext,
) -> Result<Spanned<SingleIdentifier>, FrontError> {
    let identifier = pair.into_inner().next().unwrap(); // binder wraps one identifier
    build_single_identifier(&identifier, offset, ctx)
}

fn convert_parse_error(
    error: pest::error::Error<Rule>,
    offset: usize,
    ctx: &PhaseContext,
) -> FrontError {
    let span = match error.location {
        pest::error::InputLocation::Pos(at) => Span {
            start: at,
            end: at + 1,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    }
    .shift(offset);

    ctx.report(
        ErrorKind::MalformedStatement {
            message: error.variant.message().into_owned(),
        },
        (span.start..span.end).into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SourceContext;

    fn parse(text: &str) -> Result<Spanned<Decl>, FrontError> {
        let ctx = PhaseContext::new(SourceContext::from_file("test.tanka", text), "parse");
        parse_statement(text, 0, &ctx)
    }

    fn parse_term(text: &str) -> Spanned<Term> {
        let statement = format!("t = {text}");
        match parse(&statement).unwrap().value {
            Decl::Definition { body, .. } => body,
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn module_headers_parse() {
        match parse("module A.B where").unwrap().value {
            Decl::ModuleHeader { name } => assert_eq!(name.value.to_dotted(), "A.B"),
            other => panic!("expected a module header, got {other:?}"),
        }
    }

    #[test]
    fn declarations_and_definitions_parse() {
        match parse("id : Type0 -> Type0").unwrap().value {
            Decl::Declaration { name, typ } => {
                assert_eq!(name.value.as_str(), "id");
                assert_eq!(typ.value.pretty(), "(Type0 -> Type0)");
            }
            other => panic!("expected a declaration, got {other:?}"),
        }

        match parse("const x y = x").unwrap().value {
            Decl::Definition { name, binders, body } => {
                assert_eq!(name.value.as_str(), "const");
                assert_eq!(binders.len(), 2);
                assert_eq!(body.value.pretty(), "x");
            }
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn continuation_lines_are_plain_whitespace() {
        match parse("f =\n \\x ->\n  x").unwrap().value {
            Decl::Definition { body, .. } => assert_eq!(body.value.pretty(), "(\\x -> x)"),
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn application_associates_left_and_arrows_right() {
        assert_eq!(parse_term("f a b").value.pretty(), "((f a) b)");
        assert_eq!(
            parse_term("a -> b -> c").value.pretty(),
            "(a -> (b -> c))"
        );
    }

    #[test]
    fn annotations_need_parentheses() {
        assert_eq!(parse_term("(x : Nat)").value.pretty(), "(x : Nat)");
        assert_eq!(parse_term("(x)").value.pretty(), "x");
    }

    #[test]
    fn holes_and_universes_parse() {
        assert_eq!(parse_term("?gap").value.pretty(), "?gap");
        assert_eq!(parse_term("Type2").value.pretty(), "Type2");
        // `Type2x` is an ordinary identifier, not a universe.
        assert_eq!(parse_term("Type2x").value.pretty(), "Type2x");
    }

    #[test]
    fn let_binds_one_name() {
        assert_eq!(
            parse_term("let y = 1 in f y").value.pretty(),
            "(let y = 1 in (f y))"
        );
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(parse("let = 1").is_err());
    }

    #[test]
    fn parse_errors_carry_the_shifted_offset() {
        let text = "f = )";
        let ctx = PhaseContext::new(SourceContext::from_file("test.tanka", text), "parse");
        let error = parse_statement(text, 100, &ctx).unwrap_err();
        assert!(matches!(error.kind, ErrorKind::MalformedStatement { .. }));
        assert!(error.source_info.primary_span.offset() >= 100);
    }
}
