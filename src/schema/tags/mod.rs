// Tag variants
//
// One raw + one enriched variant per symbol kind:
// - variable.rs: VariableRawTag / VariableTag
// - class.rs:    ClassRawTag / ClassTag
// - function.rs: FunctionRawTag / FunctionTag (+ CallableDocs)
// - member.rs:   MemberRawTag / MemberTag
//
// Raw tags are immutable facts parsed from one extractor line. Enriched tags
// are built from their raw counterpart by `from_raw` and keep their
// documentation fields public so the synthesis stage can fill them in.

/// Implements [`TagIdentity`] for a struct with `name`, `path` and `pattern` fields
macro_rules! impl_tag_identity {
    ($ty:ty, $kind:expr) => {
        impl $crate::schema::tags::TagIdentity for $ty {
            fn kind(&self) -> $crate::schema::enums::TagKind {
                $kind
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn path(&self) -> &$crate::schema::primitives::TagPath {
                &self.path
            }
            fn pattern(&self) -> &$crate::schema::primitives::TagPattern {
                &self.pattern
            }
        }
    };
}

pub mod class;
pub mod function;
pub mod member;
pub mod variable;

use serde::{Deserialize, Serialize};

use super::enums::TagKind;
use super::error::SchemaError;
use super::primitives::{TagPath, TagPattern};
use super::record::Record;

pub use class::{ClassRawTag, ClassTag};
pub use function::{CallableDocs, FunctionRawTag, FunctionTag};
pub use member::{MemberRawTag, MemberTag};
pub use variable::{VariableRawTag, VariableTag};

/// Identity shared by every raw and enriched tag
pub trait TagIdentity {
    fn kind(&self) -> TagKind;
    fn name(&self) -> &str;
    fn path(&self) -> &TagPath;
    fn pattern(&self) -> &TagPattern;

    /// Stable ID: MD5 of `kind:path:name:pattern`
    fn id(&self) -> String {
        tag_id(self.kind(), self.path(), self.name(), self.pattern())
    }
}

pub(crate) fn tag_id(kind: TagKind, path: &TagPath, name: &str, pattern: &TagPattern) -> String {
    let input = format!("{}:{}:{}:{}", kind, path, name, pattern.as_str());
    let digest = md5::compute(input.as_bytes());
    format!("{:x}", digest)
}

/// Closed schema and record conversion for one raw tag variant
pub trait RawTagSchema: Sized {
    const KIND: TagKind;

    /// Every field of the record, required, in check order
    const FIELDS: &'static [&'static str];

    /// Build the tag from a record already validated against [`Self::FIELDS`]
    fn from_record(record: Record) -> Result<Self, SchemaError>;

    /// Parse one extractor line into this variant
    fn parse(line: &str) -> Result<Self, SchemaError> {
        let record = Record::read(line, Self::FIELDS)?;
        Self::from_record(record)
    }
}

/// Any raw tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTag {
    Variable(VariableRawTag),
    Class(ClassRawTag),
    Function(FunctionRawTag),
    Member(MemberRawTag),
}

impl RawTag {
    /// Parse `line` as the variant for `kind`
    ///
    /// The kind comes from the caller; it is never read from the record.
    pub fn parse(kind: TagKind, line: &str) -> Result<Self, SchemaError> {
        Ok(match kind {
            TagKind::Variable => RawTag::Variable(VariableRawTag::parse(line)?),
            TagKind::Class => RawTag::Class(ClassRawTag::parse(line)?),
            TagKind::Function => RawTag::Function(FunctionRawTag::parse(line)?),
            TagKind::Member => RawTag::Member(MemberRawTag::parse(line)?),
        })
    }

    fn identity(&self) -> &dyn TagIdentity {
        match self {
            RawTag::Variable(t) => t,
            RawTag::Class(t) => t,
            RawTag::Function(t) => t,
            RawTag::Member(t) => t,
        }
    }
}

impl TagIdentity for RawTag {
    fn kind(&self) -> TagKind {
        self.identity().kind()
    }
    fn name(&self) -> &str {
        self.identity().name()
    }
    fn path(&self) -> &TagPath {
        self.identity().path()
    }
    fn pattern(&self) -> &TagPattern {
        self.identity().pattern()
    }
}

/// Any enriched tag
///
/// Serialized internally tagged: `{"kind": "function", "name": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Tag {
    Variable(VariableTag),
    Class(ClassTag),
    Function(FunctionTag),
    Member(MemberTag),
}

impl Tag {
    fn identity(&self) -> &dyn TagIdentity {
        match self {
            Tag::Variable(t) => t,
            Tag::Class(t) => t,
            Tag::Function(t) => t,
            Tag::Member(t) => t,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Tag::Variable(t) => &t.description,
            Tag::Class(t) => &t.description,
            Tag::Function(t) => &t.description,
            Tag::Member(t) => &t.description,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        match self {
            Tag::Variable(t) => t.description = description,
            Tag::Class(t) => t.description = description,
            Tag::Function(t) => t.description = description,
            Tag::Member(t) => t.description = description,
        }
    }
}

impl TagIdentity for Tag {
    fn kind(&self) -> TagKind {
        self.identity().kind()
    }
    fn name(&self) -> &str {
        self.identity().name()
    }
    fn path(&self) -> &TagPath {
        self.identity().path()
    }
    fn pattern(&self) -> &TagPattern {
        self.identity().pattern()
    }
}

impl From<VariableTag> for Tag {
    fn from(tag: VariableTag) -> Self {
        Tag::Variable(tag)
    }
}

impl From<ClassTag> for Tag {
    fn from(tag: ClassTag) -> Self {
        Tag::Class(tag)
    }
}

impl From<FunctionTag> for Tag {
    fn from(tag: FunctionTag) -> Self {
        Tag::Function(tag)
    }
}

impl From<MemberTag> for Tag {
    fn from(tag: MemberTag) -> Self {
        Tag::Member(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::enums::ScopeKind;

    const VARIABLE: &str = r#"{"name":"LIMIT","path":"src/conf.py","pattern":"^LIMIT ="}"#;

    #[test]
    fn test_dispatch_by_caller_kind() {
        let tag = RawTag::parse(TagKind::Variable, VARIABLE).unwrap();
        assert_eq!(tag.kind(), TagKind::Variable);
        assert_eq!(tag.name(), "LIMIT");

        // Same record read as a function is missing its signature
        let err = RawTag::parse(TagKind::Function, VARIABLE).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { field: "signature" });
    }

    #[test]
    fn test_kind_follows_variant_schema() {
        let member = MemberRawTag::new(
            "draw",
            "w.py",
            "^    def draw",
            "def draw(self)",
            "Widget",
            ScopeKind::Class,
        )
        .unwrap();
        assert_eq!(member.kind(), MemberRawTag::KIND);
        assert_eq!(
            MemberTag::from_raw(member, CallableDocs::default()).kind(),
            TagKind::Member
        );

        let class = ClassRawTag::new("Widget", "w.py", "^class Widget").unwrap();
        assert_eq!(class.kind(), ClassRawTag::KIND);
        assert_eq!(FunctionRawTag::KIND, TagKind::Function);
        assert_eq!(VariableRawTag::KIND, TagKind::Variable);
    }

    #[test]
    fn test_id_is_stable_and_kind_sensitive() {
        let a = RawTag::parse(TagKind::Variable, VARIABLE).unwrap();
        let b = RawTag::parse(TagKind::Class, VARIABLE).unwrap();
        assert_eq!(a.id(), a.clone().id());
        assert_eq!(a.id().len(), 32);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_enriched_tag_description_is_writable() {
        let raw = VariableRawTag::parse(VARIABLE).unwrap();
        let mut tag = Tag::from(VariableTag::from_raw(raw, "", "int"));
        assert_eq!(tag.description(), "");
        tag.set_description("Upper bound on retries.");
        assert_eq!(tag.description(), "Upper bound on retries.");
    }

    #[test]
    fn test_enriched_tag_serializes_with_kind() {
        let raw = VariableRawTag::parse(VARIABLE).unwrap();
        let tag = Tag::from(VariableTag::from_raw(raw, "Limit.", "int"));
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["kind"], "variable");
        assert_eq!(json["type"], "int");
        assert_eq!(json["pattern"], "^LIMIT =");

        let back: Tag = serde_json::from_value(json).unwrap();
        assert_eq!(back, tag);
    }
}
