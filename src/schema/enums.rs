// Tag and scope kinds
//
// String forms are the lowercase names the tag extractor emits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;
use crate::utils::suggest::closest_match;

/// Symbol kinds - one per raw/enriched tag variant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Function,
    Class,
    Variable,
    Member,
}

impl TagKind {
    pub const ALL: [TagKind; 4] = [
        TagKind::Function,
        TagKind::Class,
        TagKind::Variable,
        TagKind::Member,
    ];

    const NAMES: [&'static str; 4] = ["function", "class", "variable", "member"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Function => "function",
            TagKind::Class => "class",
            TagKind::Variable => "variable",
            TagKind::Member => "member",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(TagKind::Function),
            "class" => Ok(TagKind::Class),
            "variable" => Ok(TagKind::Variable),
            "member" => Ok(TagKind::Member),
            _ => Err(SchemaError::InvalidEnumValue {
                field: "kind",
                value: s.to_string(),
                suggestion: closest_match(s, &Self::NAMES),
            }),
        }
    }
}

/// Kind of construct enclosing a member
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    #[default]
    Class,
    Section,
    Chapter,
}

impl ScopeKind {
    pub const ALL: [ScopeKind; 3] = [ScopeKind::Class, ScopeKind::Section, ScopeKind::Chapter];

    const NAMES: [&'static str; 3] = ["class", "section", "chapter"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Class => "class",
            ScopeKind::Section => "section",
            ScopeKind::Chapter => "chapter",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeKind {
    type Err = SchemaError;

    /// Exact, case-sensitive match on the extractor's spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(ScopeKind::Class),
            "section" => Ok(ScopeKind::Section),
            "chapter" => Ok(ScopeKind::Chapter),
            _ => Err(SchemaError::InvalidEnumValue {
                field: "scopeKind",
                value: s.to_string(),
                suggestion: closest_match(s, &Self::NAMES),
            }),
        }
    }
}
