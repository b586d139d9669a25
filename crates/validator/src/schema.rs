//! Record schemas: fields, their annotations and nested records
//!
//! A schema plays the part struct tags play in other ecosystems. Each field
//! carries string annotations keyed by name; the validator reads rule text
//! from one key (`validate` by default) and the display name from another
//! (`json` by default).
//!
//! Schemas deserialize from JSON:
//!
//! ```
//! use tagrule_validator::RecordSchema;
//!
//! let schema: RecordSchema = serde_json::from_str(r#"{
//!     "fields": [
//!         { "name": "Email", "tags": { "json": "email,omitempty", "validate": "required & email" } },
//!         { "name": "Address", "tags": { "json": "address" }, "nested": {
//!             "fields": [{ "name": "Zip", "tags": { "json": "zip", "validate": "number:5,5" } }]
//!         } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(schema.fields()[0].display_name("json"), "email");
//! assert!(schema.fields()[1].nested_schema().is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_NAME_TAG, DEFAULT_TAG};

/// Ordered list of fields describing one record shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    #[serde(default)]
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a field in place
    pub fn push(&mut self, field: FieldSchema) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Field declared under `name`
    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field declared under `name`, or else the field whose data key is `name`
    pub fn resolve(&self, name: &str, name_tag: &str) -> Option<&FieldSchema> {
        self.get(name)
            .or_else(|| self.fields.iter().find(|field| field.key(name_tag) == name))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldSchema> for RecordSchema {
    fn from_iter<I: IntoIterator<Item = FieldSchema>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// One field: its name, annotations and optional nested record shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    name: String,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nested: Option<RecordSchema>,
}

impl FieldSchema {
    /// Create a field without annotations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            nested: None,
        }
    }

    /// Set annotation `key`
    #[must_use = "builder methods must be chained or built"]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Set the rule expression under the default annotation key
    #[must_use = "builder methods must be chained or built"]
    pub fn validate(self, rule: impl Into<String>) -> Self {
        self.tag(DEFAULT_TAG, rule)
    }

    /// Set the naming annotation under the default key, e.g. `"email,omitempty"`
    #[must_use = "builder methods must be chained or built"]
    pub fn json(self, name: impl Into<String>) -> Self {
        self.tag(DEFAULT_NAME_TAG, name)
    }

    /// Describe the record (or array of records) held by this field
    #[must_use = "builder methods must be chained or built"]
    pub fn nested(mut self, schema: RecordSchema) -> Self {
        self.nested = Some(schema);
        self
    }

    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annotation value under `key`
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// All annotations
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Schema of the nested record, if any
    pub fn nested_schema(&self) -> Option<&RecordSchema> {
        self.nested.as_ref()
    }

    /// Name used in messages and error paths
    ///
    /// The first comma-separated segment of the `name_tag` annotation, or the
    /// declared name when that segment is missing or empty.
    pub fn display_name(&self, name_tag: &str) -> &str {
        self.tag_value(name_tag)
            .and_then(|tag| tag.split(',').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    /// Key the field's value is stored under in record data
    pub fn key(&self, name_tag: &str) -> &str {
        self.display_name(name_tag)
    }
}
