// Variable tags. Only the type is documented; values are not tracked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RawTagSchema;
use crate::schema::enums::TagKind;
use crate::schema::error::SchemaError;
use crate::schema::primitives::{TagPath, TagPattern};
use crate::schema::record::{Record, IDENTITY_FIELDS};

/// Variable as emitted by the tag extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRawTag {
    name: String,
    path: TagPath,
    pattern: TagPattern,
}

impl VariableRawTag {
    pub fn new(
        name: impl Into<String>,
        path: impl AsRef<std::path::Path>,
        pattern: &str,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name: name.into(),
            path: TagPath::new(path),
            pattern: TagPattern::new(pattern)?,
        })
    }
}

impl RawTagSchema for VariableRawTag {
    const KIND: TagKind = TagKind::Variable;
    const FIELDS: &'static [&'static str] = &IDENTITY_FIELDS;

    fn from_record(mut record: Record) -> Result<Self, SchemaError> {
        let (name, path, pattern) = record.take_identity()?;
        Ok(Self {
            name,
            path,
            pattern,
        })
    }
}

impl_tag_identity!(VariableRawTag, Self::KIND);

/// Documented variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableTag {
    pub name: String,
    pub path: TagPath,
    pub pattern: TagPattern,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl VariableTag {
    pub fn from_raw(
        raw: VariableRawTag,
        description: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: raw.name,
            path: raw.path,
            pattern: raw.pattern,
            description: description.into(),
            type_name: type_name.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl_tag_identity!(VariableTag, VariableRawTag::KIND);
