// Member tags: functions nested in a class, section or chapter scope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::function::{default_return_type, CallableDocs};
use super::RawTagSchema;
use crate::schema::enums::{ScopeKind, TagKind};
use crate::schema::error::SchemaError;
use crate::schema::primitives::{FunctionInput, TagPath, TagPattern};
use crate::schema::record::Record;

/// Member as emitted by the tag extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRawTag {
    name: String,
    path: TagPath,
    pattern: TagPattern,
    signature: String,
    scope: String,
    scope_kind: ScopeKind,
}

impl MemberRawTag {
    pub fn new(
        name: impl Into<String>,
        path: impl AsRef<std::path::Path>,
        pattern: &str,
        signature: impl Into<String>,
        scope: impl Into<String>,
        scope_kind: ScopeKind,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name: name.into(),
            path: TagPath::new(path),
            pattern: TagPattern::new(pattern)?,
            signature: signature.into(),
            scope: scope.into(),
            scope_kind,
        })
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Name of the enclosing scope
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn scope_kind(&self) -> ScopeKind {
        self.scope_kind
    }
}

impl RawTagSchema for MemberRawTag {
    const KIND: TagKind = TagKind::Member;

    // scopeKind is required here even though ScopeKind has a default: an
    // extractor record without it is rejected, not defaulted to `class`.
    const FIELDS: &'static [&'static str] =
        &["name", "path", "pattern", "signature", "scope", "scopeKind"];

    fn from_record(mut record: Record) -> Result<Self, SchemaError> {
        let scope_kind: ScopeKind = record.take("scopeKind")?.parse()?;
        let signature = record.take("signature")?;
        let scope = record.take("scope")?;
        let (name, path, pattern) = record.take_identity()?;
        Ok(Self {
            name,
            path,
            pattern,
            signature,
            scope,
            scope_kind,
        })
    }
}

impl_tag_identity!(MemberRawTag, Self::KIND);

/// Documented member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberTag {
    pub name: String,
    pub path: TagPath,
    pub pattern: TagPattern,
    pub signature: String,
    pub scope: String,
    #[serde(rename = "scopeKind", default)]
    pub scope_kind: ScopeKind,
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

impl MemberTag {
    pub fn from_raw(raw: MemberRawTag, docs: CallableDocs) -> Self {
        Self {
            name: raw.name,
            path: raw.path,
            pattern: raw.pattern,
            signature: raw.signature,
            scope: raw.scope,
            scope_kind: raw.scope_kind,
            description: docs.description,
            inputs: docs.inputs,
            return_type: docs.return_type,
            body: docs.body,
            raises: docs.raises,
            extra: BTreeMap::new(),
        }
    }
}

impl_tag_identity!(MemberTag, MemberRawTag::KIND);
