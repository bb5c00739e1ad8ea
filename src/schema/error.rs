// Schema Errors
//
// Every parse/construct operation in the schema layer fails fast with one of
// these. No partially built tag is ever returned alongside an error.

use thiserror::Error;

/// Failure while turning an extractor record into a typed tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The line is not a well-formed JSON object
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// A required field is absent
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    /// A field outside the variant's closed schema is present
    #[error("unexpected field `{field}`{}", did_you_mean(.suggestion))]
    UnexpectedField {
        field: String,
        suggestion: Option<&'static str>,
    },

    /// The `pattern` field does not compile
    #[error("pattern `{pattern}` does not compile: {reason}")]
    PatternCompile { pattern: String, reason: String },

    /// An enum-typed field holds an unknown value
    #[error("invalid value `{value}` for `{field}`{}", did_you_mean(.suggestion))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        suggestion: Option<&'static str>,
    },

    /// A present field holds a JSON value of the wrong type
    #[error("field `{field}` must be {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },

    /// A field that must be non-empty is empty
    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },
}

impl SchemaError {
    pub(crate) fn malformed(reason: impl std::fmt::Display) -> Self {
        SchemaError::MalformedRecord {
            reason: reason.to_string(),
        }
    }

    /// Name of the field the error is about, if it is a field-level error
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::MalformedRecord { .. } => None,
            SchemaError::MissingField { field }
            | SchemaError::InvalidFieldType { field, .. }
            | SchemaError::EmptyField { field }
            | SchemaError::InvalidEnumValue { field, .. } => Some(*field),
            SchemaError::UnexpectedField { field, .. } => Some(field.as_str()),
            SchemaError::PatternCompile { .. } => Some("pattern"),
        }
    }
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean `{}`?)", s),
        None => String::new(),
    }
}
