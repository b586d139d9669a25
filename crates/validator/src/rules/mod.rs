//! Built-in rules
//!
//! | rule | passes when |
//! |---|---|
//! | `required` | the field is not its zero value |
//! | `empty` | the field is its zero value |
//! | `name` | a string of two or more characters without digits or most symbols |
//! | `email` | a string shaped like an email address |
//! | `password` | a string of six or more bytes with a non-letter |
//! | `number[:min,max]` | a digit string whose length, or a number whose value, is in range |
//! | `letters` | a string of ASCII letters and spaces |
//! | `eq:v1,v2,...` | the field equals one of the values |
//! | `xor:F1,F2,...` | exactly one of the field and the named siblings is set |
//! | `or:F1,F2,...` | at least one of them is set |
//! | `and:F1,F2,...` | all of them are set |
//!
//! String rules read `null` as `""`. `name`, `email`, `password` and
//! `number` reject other value kinds as misuse; `letters` and `eq` simply
//! fail.

mod content;
mod cross_field;
mod equality;
mod numeric;
mod presence;

use std::borrow::Cow;

use serde_json::Value;
use tagrule_expression::context::value_kind;
use tagrule_expression::{RuleContext, RuleError, RuleRegistry};

pub use content::{email, letters, name, password};
pub use cross_field::{and, or, xor};
pub use equality::eq;
pub use numeric::number;
pub use presence::{empty, required};

/// Registry holding every built-in rule
pub fn default_rules() -> RuleRegistry {
    RuleRegistry::new()
        .with("required", required)
        .with("empty", empty)
        .with("name", name)
        .with("email", email)
        .with("password", password)
        .with("number", number)
        .with("letters", letters)
        .with("eq", eq)
        .with("xor", xor)
        .with("or", or)
        .with("and", and)
}

/// The field as a string for rules that only make sense on text
fn string_value<'a>(ctx: &RuleContext<'a>, rule: &str) -> Result<&'a str, RuleError> {
    match ctx.value() {
        Value::String(text) => Ok(text),
        Value::Null => Ok(""),
        other => Err(RuleError::misuse(format!(
            "the {rule} rule must be applied to a string, not {}",
            value_kind(other)
        ))),
    }
}

/// `'a', 'b' <last> 'c'`
fn quoted_list<S: AsRef<str>>(names: &[S], last: &str) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(if i + 1 == names.len() { last } else { ", " });
        }
        out.push('\'');
        out.push_str(name.as_ref());
        out.push('\'');
    }
    out
}

fn fail(rule: &'static str, message: String) -> RuleError {
    RuleError::fail(Cow::Borrowed(rule), message)
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_rule_names() {
        assert_eq!(
            default_rules().names(),
            [
                "and", "email", "empty", "eq", "letters", "name", "number", "or", "password",
                "required", "xor"
            ]
        );
    }

    #[test]
    fn test_quoted_list() {
        assert_eq!(quoted_list::<&str>(&[], " or "), "");
        assert_eq!(quoted_list(&["a"], " or "), "'a'");
        assert_eq!(quoted_list(&["a", "b"], " or "), "'a' or 'b'");
        assert_eq!(quoted_list(&["a", "b", "c"], " and/or "), "'a', 'b' and/or 'c'");
    }
}
