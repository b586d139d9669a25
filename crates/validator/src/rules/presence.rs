//! Presence rules

use tagrule_expression::{RuleContext, RuleResult};

use super::fail;

/// The field holds something other than its zero value
pub fn required(ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.is_empty() {
        Err(fail("required", format!("'{}' is required", ctx.display_name())))
    } else {
        Ok(())
    }
}

/// The field is unset. Meant as the left operand of `|`, as in `empty | email`.
pub fn empty(ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.is_empty() {
        Ok(())
    } else {
        Err(fail(
            "empty",
            format!(
                "'{}' should position omitempty before other tags",
                ctx.display_name()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::run;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!(null))]
    #[case(json!(""))]
    #[case(json!(0))]
    #[case(json!(0.0))]
    #[case(json!(false))]
    #[case(json!([]))]
    #[case(json!({}))]
    fn test_zero_values(#[case] value: Value) {
        let data = json!({ "f": value });
        assert_eq!(run("required", "f", data.clone()), Ok(vec!["'f' is required".to_string()]));
        assert_eq!(run("empty", "f", data), Ok(vec![]));
    }

    #[rstest]
    #[case(json!("x"))]
    #[case(json!(-1))]
    #[case(json!(true))]
    #[case(json!([0]))]
    fn test_set_values(#[case] value: Value) {
        let data = json!({ "f": value });
        assert_eq!(run("required", "f", data.clone()), Ok(vec![]));
        assert_eq!(
            run("empty", "f", data),
            Ok(vec!["'f' should position omitempty before other tags".to_string()])
        );
    }

    #[test]
    fn test_empty_or_email() {
        assert_eq!(run("empty | email", "f", json!({ "f": "" })), Ok(vec![]));
        assert_eq!(
            run("empty | email", "f", json!({ "f": "nope" })),
            Ok(vec!["'f' must be a valid email address".to_string()])
        );
    }
}
