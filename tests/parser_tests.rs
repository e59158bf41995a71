// tests/parser_tests.rs

use tanka::syntax::parser::parse_statement;
use tanka::syntax::{Decl, Spanned, Term};
use tanka::{ErrorKind, PhaseContext, SourceContext};

// A helper to parse one statement with a throwaway context.
fn parse(text: &str) -> Result<Spanned<Decl>, tanka::FrontError> {
    let ctx = PhaseContext::new(SourceContext::from_file("test.tanka", text), "parse");
    parse_statement(text, 0, &ctx)
}

fn body_of(text: &str) -> Spanned<Term> {
    match parse(text).unwrap().value {
        Decl::Definition { body, .. } => body,
        other => panic!("expected a definition, got {other:?}"),
    }
}

#[test]
fn the_three_statement_forms_are_told_apart() {
    assert!(matches!(
        parse("module Demo where").unwrap().value,
        Decl::ModuleHeader { .. }
    ));
    assert!(matches!(
        parse("x : Nat").unwrap().value,
        Decl::Declaration { .. }
    ));
    assert!(matches!(
        parse("x = 1").unwrap().value,
        Decl::Definition { .. }
    ));
}

#[test]
fn dotted_module_names_round_trip() {
    match parse("module Data.Nat.Properties where").unwrap().value {
        Decl::ModuleHeader { name } => {
            assert_eq!(name.value.to_dotted(), "Data.Nat.Properties")
        }
        other => panic!("expected a module header, got {other:?}"),
    }
}

#[test]
fn a_dependent_signature_parses() {
    match parse("replicate : (n : Nat) -> Vec n Bool").unwrap().value {
        Decl::Declaration { name, typ } => {
            assert_eq!(name.value.as_str(), "replicate");
            assert_eq!(typ.value.pretty(), "((n : Nat) -> ((Vec n) Bool))");
        }
        other => panic!("expected a declaration, got {other:?}"),
    }
}

#[test]
fn multiline_statements_parse_like_single_lines() {
    // The segmenter hands over statements with their continuation newlines
    // intact; the grammar treats them as ordinary whitespace.
    let flat = body_of("f = \\x -> g x 1");
    let folded = body_of("f =\n \\x ->\n   g x\n     1");
    assert_eq!(flat.value.pretty(), folded.value.pretty());
}

#[test]
fn lambda_let_and_holes_nest() {
    assert_eq!(
        body_of("f = \\x -> let y = suc x in eq y ?goal").value.pretty(),
        "(\\x -> (let y = (suc x) in ((eq y) ?goal)))"
    );
}

#[test]
fn statement_errors_name_the_parse_phase() {
    let error = parse("x = = 1").unwrap_err();
    assert!(matches!(error.kind, ErrorKind::MalformedStatement { .. }));
    assert_eq!(
        error.diagnostic_info.error_code,
        "tanka::parse::malformed_statement"
    );
}

#[test]
fn binders_must_be_dot_free() {
    let error = parse("f A.b = 1").unwrap_err();
    assert!(matches!(error.kind, ErrorKind::InvalidIdentifier { .. }));
}

#[test]
fn universe_levels_out_of_range_are_invalid_literals() {
    let error = parse("x : Type99999999999999999999").unwrap_err();
    assert!(matches!(
        error.kind,
        ErrorKind::InvalidLiteral {
            literal_type: "universe",
            ..
        }
    ));
}
