// tests/integration_pipeline.rs

//! End-to-end runs of the whole front end: raw text in, segmentation,
//! declarations, core module, and rendered diagnostics out.

use miette::Report;
use tanka::core::{Item, Term};
use tanka::segmenter::Chunk;
use tanka::{parse_module, ErrorKind, SourceContext};

const DEMO: &str = "\
module Demo where

{- natural numbers,
   church style
-}
id : Nat -> Nat
id x = x

const : Nat -> Nat -> Nat
const x y = x

-- the interesting one
twice : (f : Nat -> Nat) -> Nat -> Nat
twice f x = f (f x)
";

#[test]
fn a_whole_module_flows_through_every_phase() {
    let out = parse_module(&SourceContext::from_file("demo.tanka", DEMO));
    assert!(out.is_clean(), "unexpected errors: {:?}", out.errors);
    assert_eq!(out.declarations.len(), 7);

    let module = out.lower();
    assert_eq!(module.header.as_ref().map(|h| h.name.as_str()), Some("Demo"));
    let names: Vec<&str> = module.items.iter().map(Item::name).collect();
    assert_eq!(names, vec!["id", "id", "const", "const", "twice", "twice"]);

    match &module.items[3] {
        Item::Definition { body, .. } => {
            assert_eq!(body.pretty(), "(\\x -> (\\y -> x#1))");
        }
        other => panic!("expected a definition, got {other:?}"),
    }
}

#[test]
fn comments_survive_segmentation_for_tooling() {
    let out = parse_module(&SourceContext::from_file("demo.tanka", DEMO));
    let comments: Vec<&Chunk> = out
        .segmentation
        .chunks
        .iter()
        .filter(|c| {
            matches!(
                c,
                Chunk::LineComment { .. } | Chunk::MultiLineComment { .. }
            )
        })
        .collect();
    assert_eq!(comments.len(), 2);
}

#[test]
fn span_info_survives_lowering() {
    let out = parse_module(&SourceContext::from_file("demo.tanka", DEMO));
    let module = out.lower();
    for item in &module.items {
        let info = match item {
            Item::Declaration { info, .. } | Item::Definition { info, .. } => info,
        };
        assert_eq!(&DEMO[info.start..info.end], DEMO[info.start..info.end].trim_end());
        assert!(info.end <= DEMO.len());
    }
}

#[test]
fn malformed_input_still_yields_the_good_parts() {
    let text = "module Broken where\n-- note\n#?!\nok : Nat\nbad = = 1\nfine = 2\n";
    let out = parse_module(&SourceContext::from_file("broken.tanka", text));

    assert_eq!(out.declarations.len(), 3);
    assert_eq!(out.errors.len(), 2);
    assert!(matches!(
        out.errors[0].kind,
        ErrorKind::UnexpectedCharacter { character: '#' }
    ));
    assert!(matches!(
        out.errors[1].kind,
        ErrorKind::MalformedStatement { .. }
    ));
}

#[test]
fn rendered_diagnostics_carry_codes_and_source_names() {
    let text = "{- never closed\nid x = x\n";
    let out = parse_module(&SourceContext::from_file("open.tanka", text));
    assert_eq!(out.errors.len(), 1);
    assert_eq!(
        out.errors[0].diagnostic_info.error_code,
        "tanka::segment::unterminated_block_comment"
    );

    let rendered = format!(
        "{:?}",
        Report::new(out.errors.into_iter().next().unwrap())
    );
    assert!(rendered.contains("open.tanka"));
    assert!(rendered.contains("never closed"));
}

#[test]
fn free_and_bound_variables_are_distinguished_end_to_end() {
    let text = "apply f x = f (g x)\n";
    let out = parse_module(&SourceContext::from_file("apply.tanka", text));
    let module = out.lower();

    match &module.items[0] {
        Item::Definition { body, .. } => {
            // f and x are binders of the definition; g stays free.
            let printed = body.pretty();
            assert!(printed.contains("f#1"));
            assert!(printed.contains("x#0"));
            assert!(printed.contains("(g "));
            assert!(matches!(body, Term::Abstraction { .. }));
        }
        other => panic!("expected a definition, got {other:?}"),
    }
}
