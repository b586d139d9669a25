//! Property-based tests for the lexer, parser and evaluator

use std::borrow::Cow;

use proptest::prelude::*;
use serde_json::Value;
use tagrule_expression::prelude::*;
use tagrule_expression::{Lexer, TokenKind, parse};

struct NoFields;

impl FieldAccess for NoFields {
    fn value(&self, _field: &str) -> Option<&Value> {
        None
    }

    fn display_name(&self, _field: &str) -> Option<Cow<'_, str>> {
        None
    }
}

fn registry() -> RuleRegistry {
    RuleRegistry::new()
        .with("t", |_| Ok(()))
        .with("f", |ctx| {
            Err(RuleError::fail("f", format!("f{}", ctx.param(0).unwrap_or(""))))
        })
}

/// Fully parenthesized expression text with its expected truth value
fn expression() -> impl Strategy<Value = (String, bool)> {
    let leaf = prop_oneof![
        Just(("t".to_string(), true)),
        Just(("f".to_string(), false)),
        (0u8..100).prop_map(|n| (format!("f:{n}"), false)),
        (0u8..100).prop_map(|n| (format!("t:{n},'x'"), true)),
    ];
    leaf.prop_recursive(6, 48, 2, |inner| {
        (inner.clone(), inner, any::<bool>()).prop_map(|((left, l), (right, r), is_and)| {
            if is_and {
                (format!("({left} & {right})"), l && r)
            } else {
                (format!("({left} | {right})"), l || r)
            }
        })
    })
}

proptest! {
    #[test]
    fn lexer_always_terminates(input in ".{0,64}") {
        let tokens: Vec<_> = Lexer::new(&input).collect();
        let last = tokens.last().expect("lexer yields at least one token");
        prop_assert!(matches!(last.kind, TokenKind::Eof | TokenKind::Error));
        prop_assert!(
            tokens[..tokens.len() - 1]
                .iter()
                .all(|t| !matches!(t.kind, TokenKind::Eof | TokenKind::Error))
        );
    }

    #[test]
    fn parser_never_panics(input in "[tf&|():,' 0-9a-z]{0,48}") {
        let _ = parse(&input, &registry());
    }

    #[test]
    fn rendered_tree_reparses_identically((source, _) in expression()) {
        let registry = registry();
        let tree = parse(&source, &registry).unwrap();
        let rendered = tree.to_string();
        let reparsed = parse(&rendered, &registry).unwrap();
        prop_assert_eq!(reparsed.root(), tree.root());
        prop_assert_eq!(reparsed.to_string(), rendered);
    }

    #[test]
    fn evaluation_matches_boolean_logic((source, expected) in expression()) {
        let engine = RuleEngine::new(registry());
        let ctx = ExecutionContext::new("field", &NoFields);
        let outcome = engine.evaluate(&source, &ctx).unwrap();
        prop_assert_eq!(outcome.is_passed(), expected, "{}", source);
        if !expected {
            prop_assert!(!outcome.failures().is_empty());
        }
    }

    #[test]
    fn whitespace_does_not_change_shape((source, _) in expression()) {
        let registry = registry();
        let spaced = source
            .replace('(', " ( ")
            .replace(')', " ) ")
            .replace('&', "\t&\n");
        let compact = parse(&source, &registry).unwrap();
        let loose = parse(&spaced, &registry).unwrap();
        prop_assert_eq!(loose.root(), compact.root());
    }
}
