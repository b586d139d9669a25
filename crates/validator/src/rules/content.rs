//! Text shape rules: name, email, password, letters

use std::sync::LazyLock;

use regex::Regex;
use tagrule_expression::{RuleContext, RuleResult};

use super::{fail, string_value};

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9_!¡?÷¿/\\+=@#$%ˆ\&*(){}|\~<>;:\[\]]{2,}$").unwrap()
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#
    ).unwrap()
});

static NON_LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z]").unwrap());

static LETTERS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z ]+$").unwrap());

/// A person's name: no digits and none of the usual symbols
///
/// An optional first parameter replaces the failure message.
pub fn name(ctx: &RuleContext<'_>) -> RuleResult {
    let text = string_value(ctx, "name")?;
    if NAME_REGEX.is_match(text) {
        return Ok(());
    }
    let message = match ctx.param_unquoted(0) {
        Some(custom) => custom.to_string(),
        None => format!("'{}' must be a valid name", ctx.display_name()),
    };
    Err(fail("name", message))
}

/// Email address
pub fn email(ctx: &RuleContext<'_>) -> RuleResult {
    let text = string_value(ctx, "email")?;
    if EMAIL_REGEX.is_match(text) {
        Ok(())
    } else {
        Err(fail(
            "email",
            format!("'{}' must be a valid email address", ctx.display_name()),
        ))
    }
}

/// At least six bytes, at least one of them not an ASCII letter
pub fn password(ctx: &RuleContext<'_>) -> RuleResult {
    let text = string_value(ctx, "password")?;
    if text.len() >= 6 && NON_LETTER_REGEX.is_match(text) {
        Ok(())
    } else {
        Err(fail(
            "password",
            format!(
                "'{}' must be a at least 6 characters long and contain at least one number or special character (eg. @!#)",
                ctx.display_name()
            ),
        ))
    }
}

/// ASCII letters and spaces; any non-string fails
pub fn letters(ctx: &RuleContext<'_>) -> RuleResult {
    if ctx.value().as_str().is_some_and(|text| LETTERS_REGEX.is_match(text)) {
        Ok(())
    } else {
        Err(fail(
            "letters",
            format!("'{}' can only contain letters and spaces", ctx.display_name()),
        ))
    }
}
