// Carrots Core - typed tag schema and source-tree model
//
// Consumes the line-delimited records a ctags-style extractor emits and turns
// them into a validated Directory -> File -> Tag tree for the documentation
// stage. Pure data transformation: no extractor invocation, no rendering.

// Tag records, validation and enrichment
pub mod schema;

// Containment tree (arena)
pub mod tree;

// Line-stream driver over the schema
pub mod ingest;

// Path and suggestion helpers
pub mod utils;

pub use ingest::{
    ingest_lines, read_tag_file, ErrorPolicy, IngestConfig, IngestError, IngestReport, SkippedLine,
};
pub use schema::{
    CallableDocs, ClassRawTag, ClassTag, FunctionInput, FunctionRawTag, FunctionTag, MemberRawTag,
    MemberTag, RawTag, RawTagSchema, ScopeKind, SchemaError, Tag, TagIdentity, TagKind, TagPath,
    TagPattern, VariableRawTag, VariableTag,
};
pub use tree::{Directory, File, Node, SourceTree, TreeBuilder, TreeError};
