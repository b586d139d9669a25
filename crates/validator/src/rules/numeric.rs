//! The `number` rule
//!
//! On strings it checks for digits only and bounds the digit count; on
//! numbers it bounds the value itself, truncated toward zero. Bounds that
//! are empty or not integers are ignored.

use serde_json::Value;
use tagrule_expression::context::value_kind;
use tagrule_expression::{RuleContext, RuleError, RuleResult};

use super::fail;

/// Optional inclusive bounds
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Option<i64>,
    max: Option<i64>,
}

impl Bounds {
    fn from_params(ctx: &RuleContext<'_>) -> Self {
        let bound = |index| {
            ctx.param_unquoted(index)
                .filter(|text| !text.is_empty())
                .and_then(|text| text.parse::<i64>().ok())
        };
        Self {
            min: bound(0),
            max: bound(1),
        }
    }

    fn contains(self, value: i64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Digits only, or a number within `min,max`
pub fn number(ctx: &RuleContext<'_>) -> RuleResult {
    let bounds = Bounds::from_params(ctx);
    let field = ctx.display_name();

    let value = match ctx.value() {
        Value::String(text) => return digits(field, text, bounds),
        Value::Null => return digits(field, "", bounds),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(i64::MAX),
        other => {
            return Err(RuleError::misuse(format!(
                "the number rule must be applied to a number or a string, not {}",
                value_kind(other)
            )));
        }
    };

    if bounds.contains(value) {
        return Ok(());
    }
    let message = match (bounds.min, bounds.max) {
        (Some(min), Some(max)) => format!("'{field}' must be {min} to {max}"),
        (None, Some(max)) => format!("'{field}' must be {max} or less"),
        (Some(min), None) => format!("'{field}' must be {min} or more"),
        (None, None) => return Ok(()),
    };
    Err(fail("number", message))
}

fn digits(field: &str, text: &str, bounds: Bounds) -> RuleResult {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("number", format!("'{field}' must contain only numbers")));
    }
    if bounds.contains(text.len() as i64) {
        return Ok(());
    }
    let message = match (bounds.min, bounds.max) {
        (Some(min), Some(max)) => format!("'{field}' must be {min} to {max} digits"),
        (None, Some(max)) => format!("'{field}' must have {max} or fewer digits"),
        (Some(min), None) => format!("'{field}' must have {min} or more digits"),
        (None, None) => return Ok(()),
    };
    Err(fail("number", message))
}

#[cfg(test)]
mod tests {
    use super::super::testing::run;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn messages(rule: &str, value: Value) -> Vec<String> {
        run(rule, "Number", json!({ "Number": value })).unwrap()
    }

    #[rstest]
    #[case("number", json!("12345"), None)]
    #[case("number", json!(""), Some("'Number' must contain only numbers"))]
    #[case("number", json!(null), Some("'Number' must contain only numbers"))]
    #[case("number", json!("not a number"), Some("'Number' must contain only numbers"))]
    #[case("number", json!("-12"), Some("'Number' must contain only numbers"))]
    #[case("number:2,4", json!("0"), Some("'Number' must be 2 to 4 digits"))]
    #[case("number:2,4", json!("000"), None)]
    #[case("number:2,4", json!("00000"), Some("'Number' must be 2 to 4 digits"))]
    #[case("number:'',3", json!("1234"), Some("'Number' must have 3 or fewer digits"))]
    #[case("number:3", json!("12"), Some("'Number' must have 3 or more digits"))]
    fn test_digit_strings(#[case] rule: &str, #[case] value: Value, #[case] expected: Option<&str>) {
        let expected: Vec<String> = expected.into_iter().map(str::to_owned).collect();
        assert_eq!(messages(rule, value), expected);
    }

    #[rstest]
    #[case("number:2,4", json!(1), Some("'Number' must be 2 to 4"))]
    #[case("number:2,4", json!(3), None)]
    #[case("number:2,4", json!(5), Some("'Number' must be 2 to 4"))]
    #[case("number:2,4", json!(4.9), None)]
    #[case("number:'',10", json!(11), Some("'Number' must be 10 or less"))]
    #[case("number:-5", json!(-6), Some("'Number' must be -5 or more"))]
    #[case("number", json!(0), None)]
    #[case("number", json!(-3.5), None)]
    #[case("number:x,y", json!(100), None)]
    fn test_numbers(#[case] rule: &str, #[case] value: Value, #[case] expected: Option<&str>) {
        let expected: Vec<String> = expected.into_iter().map(str::to_owned).collect();
        assert_eq!(messages(rule, value), expected);
    }

    #[test]
    fn test_number_on_bool_is_misuse() {
        let err = run("number", "n", json!({ "n": true })).unwrap_err();
        assert!(err.ends_with("must be applied to a number or a string, not boolean"));
    }
}
