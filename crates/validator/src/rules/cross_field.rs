//! Rules relating the field to sibling fields named by parameter
//!
//! Siblings are named by declared field name or data key. Naming a field
//! the record does not have is misuse. Messages list the field and its
//! siblings by display name.

use std::borrow::Cow;

use smallvec::SmallVec;
use tagrule_expression::context::unquote;
use tagrule_expression::{RuleContext, RuleResult};

use super::{fail, quoted_list};

type Names<'a> = SmallVec<[Cow<'a, str>; 4]>;

/// Exactly one of the field and its siblings is set
pub fn xor(ctx: &RuleContext<'_>) -> RuleResult {
    let mut names: Names<'_> = SmallVec::new();
    names.push(Cow::Borrowed(ctx.display_name()));
    let mut populated = usize::from(!ctx.is_empty());

    for param in ctx.params() {
        let sibling = unquote(param);
        if !ctx.sibling_is_empty(sibling)? {
            populated += 1;
        }
        names.push(ctx.sibling_display_name(sibling)?);
    }

    if populated == 1 {
        Ok(())
    } else {
        Err(fail(
            "xor",
            format!("either {} must be set", quoted_list(&names, " or ")),
        ))
    }
}

/// At least one of the field and its siblings is set
///
/// Stops at the first set field; siblings after it are not looked up.
pub fn or(ctx: &RuleContext<'_>) -> RuleResult {
    if !ctx.is_empty() {
        return Ok(());
    }

    let mut names: Names<'_> = SmallVec::new();
    names.push(Cow::Borrowed(ctx.display_name()));
    for param in ctx.params() {
        let sibling = unquote(param);
        if !ctx.sibling_is_empty(sibling)? {
            return Ok(());
        }
        names.push(ctx.sibling_display_name(sibling)?);
    }

    Err(fail(
        "or",
        format!("either {} must be set", quoted_list(&names, " and/or ")),
    ))
}

/// The field and every sibling are set
pub fn and(ctx: &RuleContext<'_>) -> RuleResult {
    let mut names: Names<'_> = SmallVec::new();
    names.push(Cow::Borrowed(ctx.display_name()));
    let mut populated = !ctx.is_empty();

    for param in ctx.params() {
        let sibling = unquote(param);
        populated &= !ctx.sibling_is_empty(sibling)?;
        names.push(ctx.sibling_display_name(sibling)?);
    }

    if populated {
        Ok(())
    } else {
        Err(fail(
            "and",
            format!("{} must be set", quoted_list(&names, " and ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::run;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn record(a: i64, b: i64, c: &str) -> Value {
        json!({ "a": a, "b": b, "c": c })
    }

    #[rstest]
    #[case(record(1, 0, ""), true)]
    #[case(record(0, 1, ""), true)]
    #[case(record(0, 0, "1"), true)]
    #[case(record(1, 1, "1"), false)]
    #[case(record(0, 0, ""), false)]
    fn test_xor(#[case] data: Value, #[case] passes: bool) {
        let expected = if passes {
            vec![]
        } else {
            vec!["either 'a', 'b' or 'c' must be set".to_string()]
        };
        assert_eq!(run("xor:b,c", "a", data), Ok(expected));
    }

    #[rstest]
    #[case(record(1, 0, ""), true)]
    #[case(record(0, 1, ""), true)]
    #[case(record(0, 0, "1"), true)]
    #[case(record(1, 1, "1"), true)]
    #[case(record(0, 0, ""), false)]
    fn test_or(#[case] data: Value, #[case] passes: bool) {
        let expected = if passes {
            vec![]
        } else {
            vec!["either 'a', 'b' and/or 'c' must be set".to_string()]
        };
        assert_eq!(run("or:b,c", "a", data), Ok(expected));
    }

    #[rstest]
    #[case(record(1, 0, ""), false)]
    #[case(record(0, 1, ""), false)]
    #[case(record(0, 0, "1"), false)]
    #[case(record(1, 1, "1"), true)]
    #[case(record(0, 0, ""), false)]
    fn test_and(#[case] data: Value, #[case] passes: bool) {
        let expected = if passes {
            vec![]
        } else {
            vec!["'a', 'b' and 'c' must be set".to_string()]
        };
        assert_eq!(run("and:b,c", "a", data), Ok(expected));
    }

    #[rstest]
    #[case("xor:missing")]
    #[case("or:missing")]
    #[case("and:missing")]
    fn test_unknown_sibling_is_misuse(#[case] rule: &str) {
        let err = run(rule, "a", record(0, 0, "")).unwrap_err();
        assert!(err.ends_with("'missing' is not a valid field"), "{err}");
    }

    #[test]
    fn test_or_stops_before_unknown_sibling_once_satisfied() {
        assert_eq!(run("or:b,missing", "a", record(0, 1, "")), Ok(vec![]));
    }
}
