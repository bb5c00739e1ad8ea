// Extractor Record Reader
//
// One extractor line is one flat JSON object. Validation runs in a fixed
// order and stops at the first failure:
//   syntax -> object shape -> missing fields (schema order)
//   -> unexpected fields (sorted key order) -> value types -> empty name

use serde_json::{Map, Value};

use super::error::SchemaError;
use super::primitives::{TagPath, TagPattern};
use crate::utils::suggest::closest_match;

/// Fields every raw tag requires, in check order
pub const IDENTITY_FIELDS: [&str; 3] = ["name", "path", "pattern"];

/// A validated extractor record: every schema field present and a string,
/// no field outside the schema.
#[derive(Debug)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Parse `line` and validate it against `schema`
    pub fn read(line: &str, schema: &[&'static str]) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(line).map_err(SchemaError::malformed)?;

        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(SchemaError::malformed(format!(
                    "expected a JSON object, found {}",
                    json_type_name(&other)
                )))
            }
        };

        for &field in schema {
            if !fields.contains_key(field) {
                return Err(SchemaError::MissingField { field });
            }
        }

        let unknown = fields
            .keys()
            .find(|key| !schema.iter().any(|known| *known == key.as_str()));
        if let Some(unknown) = unknown {
            return Err(SchemaError::UnexpectedField {
                field: unknown.clone(),
                suggestion: closest_match(unknown, schema),
            });
        }

        for &field in schema {
            if !fields[field].is_string() {
                return Err(SchemaError::InvalidFieldType {
                    field,
                    expected: "a string",
                });
            }
        }

        if fields.get("name").and_then(Value::as_str) == Some("") {
            return Err(SchemaError::EmptyField { field: "name" });
        }

        Ok(Record { fields })
    }

    /// Move a validated string field out of the record
    pub fn take(&mut self, field: &'static str) -> Result<String, SchemaError> {
        match self.fields.remove(field) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(SchemaError::InvalidFieldType {
                field,
                expected: "a string",
            }),
            None => Err(SchemaError::MissingField { field }),
        }
    }

    /// Take `name`, `path` and `pattern`, compiling the pattern
    pub fn take_identity(&mut self) -> Result<(String, TagPath, TagPattern), SchemaError> {
        let name = self.take("name")?;
        let path = TagPath::new(self.take("path")?);
        let pattern = TagPattern::new(&self.take("pattern")?)?;
        Ok((name, path, pattern))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
