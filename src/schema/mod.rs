// Tag Schema
//
// Typed model of the records a ctags-style extractor emits, and of the
// documented tags built from them:
// - primitives.rs: TagPath, TagPattern, FunctionInput
// - enums.rs: TagKind, ScopeKind
// - error.rs: SchemaError
// - record.rs: closed-schema validation of one extractor line
// - tags/: raw and enriched variants per symbol kind

pub mod enums;
pub mod error;
pub mod primitives;
pub mod record;
pub mod tags;

// Re-export key types for external use
pub use enums::{ScopeKind, TagKind};
pub use error::SchemaError;
pub use primitives::{FunctionInput, TagPath, TagPattern};
pub use record::Record;
pub use tags::{
    CallableDocs, ClassRawTag, ClassTag, FunctionRawTag, FunctionTag, MemberRawTag, MemberTag,
    RawTag, RawTagSchema, Tag, TagIdentity, VariableRawTag, VariableTag,
};
