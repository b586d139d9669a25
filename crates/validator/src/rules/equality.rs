//! The `eq` rule

use serde_json::{Number, Value};
use tagrule_expression::context::unquote;
use tagrule_expression::{RuleContext, RuleError, RuleResult};

use super::{fail, quoted_list};

/// The field equals one of the parameters
///
/// Strings compare with the parameter text (quotes removed), numbers
/// numerically, booleans with `true` / `false`. `null` equals only an empty
/// parameter.
pub fn eq(ctx: &RuleContext<'_>) -> RuleResult {
    let params = ctx.params();
    if params.is_empty() {
        return Err(RuleError::misuse("eq requires at least one parameter"));
    }

    let mut candidates = params.iter().map(|param| unquote(param));
    let matched = match ctx.value() {
        Value::String(text) => candidates.any(|candidate| candidate == text),
        Value::Null => candidates.any(str::is_empty),
        Value::Bool(flag) => candidates.any(|candidate| candidate.parse::<bool>() == Ok(*flag)),
        Value::Number(number) => candidates.any(|candidate| number_equals(number, candidate)),
        Value::Array(_) | Value::Object(_) => false,
    };
    if matched {
        return Ok(());
    }

    let expected: Vec<&str> = params.iter().map(|param| unquote(param)).collect();
    Err(fail(
        "eq",
        format!(
            "'{}' must equal {}",
            ctx.display_name(),
            quoted_list(&expected, " or ")
        ),
    ))
}

fn number_equals(number: &Number, text: &str) -> bool {
    if let Some(value) = number.as_i64()
        && let Ok(expected) = text.parse::<i64>()
    {
        return value == expected;
    }
    if let Some(value) = number.as_u64()
        && let Ok(expected) = text.parse::<u64>()
    {
        return value == expected;
    }
    matches!(
        (number.as_f64(), text.parse::<f64>()),
        (Some(value), Ok(expected)) if value == expected
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing::run;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!(1))]
    #[case(json!(2))]
    #[case(json!("3"))]
    #[case(json!(3.0))]
    fn test_matches(#[case] value: Value) {
        assert_eq!(run("eq:1,2,3", "a", json!({ "a": value })), Ok(vec![]));
    }

    #[test]
    fn test_zero_values_fail_with_listed_choices() {
        let data = json!({ "a": 0, "b": 0, "c": "" });
        for field in ["a", "b", "c"] {
            assert_eq!(
                run("eq:1,2,3", field, data.clone()),
                Ok(vec![format!("'{field}' must equal '1', '2' or '3'")])
            );
        }
    }

    #[test]
    fn test_single_choice_message() {
        assert_eq!(
            run("eq:'on'", "mode", json!({ "mode": "off" })),
            Ok(vec!["'mode' must equal 'on'".to_string()])
        );
    }

    #[test]
    fn test_quoted_params_compare_unquoted() {
        assert_eq!(run(r#"eq:"a b",'c'"#, "s", json!({ "s": "a b" })), Ok(vec![]));
        assert_eq!(run("eq:'',x", "s", json!({ "s": null })), Ok(vec![]));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(run("eq:true", "b", json!({ "b": true })), Ok(vec![]));
        assert_eq!(
            run("eq:true", "b", json!({ "b": false })),
            Ok(vec!["'b' must equal 'true'".to_string()])
        );
    }

    #[test]
    fn test_without_params_is_misuse() {
        assert_eq!(
            run("eq", "a", json!({ "a": 1 })),
            Err("rule 'eq' on field 'a': eq requires at least one parameter".to_string())
        );
    }
}
