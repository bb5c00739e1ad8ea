// Class tags. Methods are documented as member tags.
//
// TODO: class attributes and decorators are not modelled yet.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::member::MemberTag;
use super::RawTagSchema;
use crate::schema::enums::TagKind;
use crate::schema::error::SchemaError;
use crate::schema::primitives::{TagPath, TagPattern};
use crate::schema::record::{Record, IDENTITY_FIELDS};

/// Class as emitted by the tag extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRawTag {
    name: String,
    path: TagPath,
    pattern: TagPattern,
}

impl ClassRawTag {
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

impl RawTagSchema for ClassRawTag {
    const KIND: TagKind = TagKind::Class;
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

impl_tag_identity!(ClassRawTag, Self::KIND);

/// Documented class with its methods in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassTag {
    pub name: String,
    pub path: TagPath,
    pub pattern: TagPattern,
    pub description: String,
    pub methods: Vec<MemberTag>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ClassTag {
    pub fn from_raw(
        raw: ClassRawTag,
        description: impl Into<String>,
        methods: Vec<MemberTag>,
    ) -> Self {
        Self {
            name: raw.name,
            path: raw.path,
            pattern: raw.pattern,
            description: description.into(),
            methods,
            extra: BTreeMap::new(),
        }
    }

    /// Method by name, first declared wins
    pub fn method(&self, name: &str) -> Option<&MemberTag> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl_tag_identity!(ClassTag, ClassRawTag::KIND);
