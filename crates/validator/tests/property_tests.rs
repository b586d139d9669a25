//! Property-based tests for tagrule-validator.

use proptest::prelude::*;
use serde_json::{Value, json};
use tagrule_validator::prelude::*;

fn single(rule: &str) -> RecordSchema {
    RecordSchema::new().field(FieldSchema::new("Field").json("field").validate(rule))
}

fn failures(schema: &RecordSchema, data: &Value) -> usize {
    match Validator::new().validate(schema, data) {
        Ok(()) => 0,
        Err(ValidateError::Invalid(errors)) => errors.len(),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// PRESENCE
// ============================================================================

proptest! {
    #[test]
    fn required_passes_iff_string_non_empty(s in ".{0,12}") {
        let data = json!({ "field": s.clone() });
        prop_assert_eq!(failures(&single("required"), &data) == 0, !s.is_empty());
    }

    #[test]
    fn required_and_empty_are_complements(n in any::<i64>()) {
        let data = json!({ "field": n });
        let required = failures(&single("required"), &data);
        let empty = failures(&single("empty"), &data);
        prop_assert_eq!(required + empty, 1);
    }
}

// ============================================================================
// NUMBER
// ============================================================================

proptest! {
    #[test]
    fn number_accepts_exactly_digit_strings(s in "[0-9a-z]{0,8}") {
        let data = json!({ "field": s.clone() });
        let digits = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        prop_assert_eq!(failures(&single("number"), &data) == 0, digits);
    }

    #[test]
    fn number_bounds_digit_count(s in "[0-9]{1,10}", min in 1usize..6, extra in 0usize..4) {
        let max = min + extra;
        let rule = format!("number:{min},{max}");
        let data = json!({ "field": s.clone() });
        let within = (min..=max).contains(&s.len());
        prop_assert_eq!(failures(&single(&rule), &data) == 0, within);
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

proptest! {
    #[test]
    fn check_syntax_never_panics(rule in "[a-z&|() :,'0-9]{0,24}") {
        let _ = Validator::new().check_syntax(&single(&rule));
    }

    #[test]
    fn validation_is_deterministic(name in ".{0,8}", email in ".{0,12}") {
        let schema = RecordSchema::new()
            .field(FieldSchema::new("Name").json("name").validate("required & name"))
            .field(FieldSchema::new("Email").json("email").validate("empty | email"));
        let data = json!({ "name": name, "email": email });

        let validator = Validator::new();
        let first = validator.validate(&schema, &data);
        let second = validator.validate(&schema, &data);
        prop_assert_eq!(&first, &second);
        // One failure at most per field: `&` stops at the first, `|` keeps the last.
        prop_assert!(first.err().and_then(|e| e.field_errors().map(FieldErrors::len)).unwrap_or(0) <= 2);
    }
}
