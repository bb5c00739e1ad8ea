// Function tags and the documentation shared with member tags

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RawTagSchema;
use crate::schema::enums::TagKind;
use crate::schema::error::SchemaError;
use crate::schema::primitives::{FunctionInput, TagPath, TagPattern};
use crate::schema::record::Record;

pub(crate) const DEFAULT_RETURN_TYPE: &str = "None";

pub(crate) fn default_return_type() -> String {
    DEFAULT_RETURN_TYPE.to_string()
}

/// Function as emitted by the tag extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRawTag {
    name: String,
    path: TagPath,
    pattern: TagPattern,
    signature: String,
}

impl FunctionRawTag {
    pub fn new(
        name: impl Into<String>,
        path: impl AsRef<std::path::Path>,
        pattern: &str,
        signature: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name: name.into(),
            path: TagPath::new(path),
            pattern: TagPattern::new(pattern)?,
            signature: signature.into(),
        })
    }

    /// Raw textual signature, e.g. `def run(x: int) -> None`
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl RawTagSchema for FunctionRawTag {
    const KIND: TagKind = TagKind::Function;
    const FIELDS: &'static [&'static str] = &["name", "path", "pattern", "signature"];

    fn from_record(mut record: Record) -> Result<Self, SchemaError> {
        let signature = record.take("signature")?;
        let (name, path, pattern) = record.take_identity()?;
        Ok(Self {
            name,
            path,
            pattern,
            signature,
        })
    }
}

impl_tag_identity!(FunctionRawTag, Self::KIND);

/// Documentation attached to a function or member by the synthesis stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDocs {
    pub description: String,
    pub inputs: Vec<FunctionInput>,
    pub return_type: String,
    /// Source text of the body
    pub body: String,
    /// `(exception name, when it is raised)` pairs
    pub raises: Vec<(String, String)>,
}

impl Default for CallableDocs {
    fn default() -> Self {
        Self {
            description: String::new(),
            inputs: Vec::new(),
            return_type: default_return_type(),
            body: String::new(),
            raises: Vec::new(),
        }
    }
}

/// Documented function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionTag {
    pub name: String,
    pub path: TagPath,
    pub pattern: TagPattern,
    pub description: String,
    pub inputs: Vec<FunctionInput>,
    #[serde(rename = "returnType", default = "default_return_type")]
    pub return_type: String,
    pub body: String,
    #[serde(default)]
    pub raises: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl FunctionTag {
    pub fn from_raw(raw: FunctionRawTag, docs: CallableDocs) -> Self {
        Self {
            name: raw.name,
            path: raw.path,
            pattern: raw.pattern,
            description: docs.description,
            inputs: docs.inputs,
            return_type: docs.return_type,
            body: docs.body,
            raises: docs.raises,
            extra: BTreeMap::new(),
        }
    }
}

impl_tag_identity!(FunctionTag, FunctionRawTag::KIND);
