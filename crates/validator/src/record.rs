//! Field access over JSON records described by a schema

use std::borrow::Cow;

use serde_json::{Map, Value};
use tagrule_expression::FieldAccess;

use crate::schema::{FieldSchema, RecordSchema};

static NULL: Value = Value::Null;

/// A JSON object viewed through its schema
///
/// Fields are looked up by declared name first, then by data key. A field
/// the schema declares but the object lacks reads as `null`; a name the
/// schema does not declare is unknown, even if the object has such a key.
#[derive(Debug, Clone, Copy)]
pub struct JsonRecord<'a> {
    schema: &'a RecordSchema,
    data: &'a Map<String, Value>,
    name_tag: &'a str,
}

impl<'a> JsonRecord<'a> {
    /// View `data` through `schema`, naming fields by the `name_tag` annotation
    pub fn new(schema: &'a RecordSchema, data: &'a Map<String, Value>, name_tag: &'a str) -> Self {
        Self {
            schema,
            data,
            name_tag,
        }
    }

    /// Value stored for a declared field; `null` when absent
    pub fn field_value(&self, field: &FieldSchema) -> &'a Value {
        self.data.get(field.key(self.name_tag)).unwrap_or(&NULL)
    }

    fn resolve(&self, name: &str) -> Option<&'a FieldSchema> {
        self.schema.resolve(name, self.name_tag)
    }
}

impl FieldAccess for JsonRecord<'_> {
    fn value(&self, field: &str) -> Option<&Value> {
        self.resolve(field).map(|schema| self.field_value(schema))
    }

    fn display_name(&self, field: &str) -> Option<Cow<'_, str>> {
        self.resolve(field)
            .map(|schema| Cow::Borrowed(schema.display_name(self.name_tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema::new()
            .field(FieldSchema::new("FirstName").json("firstName,omitempty"))
            .field(FieldSchema::new("Age"))
    }

    #[test]
    fn test_reads_by_name_and_key() {
        let schema = schema();
        let data = json!({ "firstName": "Ada", "Age": 36, "extra": true });
        let record = JsonRecord::new(&schema, data.as_object().unwrap(), "json");

        assert_eq!(record.value("FirstName"), Some(&json!("Ada")));
        assert_eq!(record.value("firstName"), Some(&json!("Ada")));
        assert_eq!(record.value("Age"), Some(&json!(36)));
        assert_eq!(record.value("extra"), None);
    }

    #[test]
    fn test_missing_declared_field_is_null() {
        let schema = schema();
        let data = json!({});
        let record = JsonRecord::new(&schema, data.as_object().unwrap(), "json");

        assert_eq!(record.value("FirstName"), Some(&Value::Null));
        assert_eq!(record.is_empty("FirstName"), Some(true));
        assert_eq!(record.is_empty("Nope"), None);
    }

    #[test]
    fn test_display_names() {
        let schema = schema();
        let data = json!({});
        let record = JsonRecord::new(&schema, data.as_object().unwrap(), "json");

        assert_eq!(record.display_name("FirstName").as_deref(), Some("firstName"));
        assert_eq!(record.display_name("Age").as_deref(), Some("Age"));
        assert_eq!(record.display_name("Nope"), None);
    }
}
