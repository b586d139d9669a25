//! Validator configuration

use serde::{Deserialize, Serialize};
use tagrule_expression::ParseLimits;

/// Annotation key holding rule text when none is configured
pub const DEFAULT_TAG: &str = "validate";

/// Annotation key supplying display names when none is configured
pub const DEFAULT_NAME_TAG: &str = "json";

/// Validator settings
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use tagrule_validator::ValidatorConfig;
///
/// let config: ValidatorConfig = serde_json::from_str(r#"{ "tag": "rules" }"#).unwrap();
/// assert_eq!(config.tag, "rules");
/// assert_eq!(config.name_tag, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Annotation key whose value is the field's rule expression
    pub tag: String,
    /// Annotation key whose first comma-separated segment names the field
    pub name_tag: String,
    /// Locale tag handed to every rule
    pub locale: String,
    /// Parser limits
    pub limits: ParseLimits,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            name_tag: DEFAULT_NAME_TAG.to_string(),
            locale: "en".to_string(),
            limits: ParseLimits::default(),
        }
    }
}

impl ValidatorConfig {
    /// Use a different annotation key for rule text
    #[must_use = "builder methods must be chained or built"]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Use a different annotation key for display names
    #[must_use = "builder methods must be chained or built"]
    pub fn with_name_tag(mut self, name_tag: impl Into<String>) -> Self {
        self.name_tag = name_tag.into();
        self
    }

    /// Set the locale tag
    #[must_use = "builder methods must be chained or built"]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set parser limits
    #[must_use = "builder methods must be chained or built"]
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.tag, "validate");
        assert_eq!(config.name_tag, "json");
        assert_eq!(config.locale, "en");
        assert_eq!(config.limits, ParseLimits::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: ValidatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_nested_limits_keep_defaults() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{ "locale": "es", "limits": { "max_terms": 8 } }"#).unwrap();
        assert_eq!(config.locale, "es");
        assert_eq!(config.limits.max_terms, 8);
        assert_eq!(config.limits.max_depth, ParseLimits::default().max_depth);
    }

    #[test]
    fn test_builders() {
        let config = ValidatorConfig::default()
            .with_tag("check")
            .with_name_tag("label")
            .with_locale("de");
        assert_eq!(
            (config.tag.as_str(), config.name_tag.as_str(), config.locale.as_str()),
            ("check", "label", "de")
        );
    }
}
