// Primitive value types shared by every tag: path, pattern, function input.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::SchemaError;
use crate::utils::paths;

/// Filesystem path of the file defining a tag
///
/// Normalized lexically on construction. Never resolved or checked for
/// existence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagPath(PathBuf);

impl TagPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        TagPath(paths::normalize(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Unix-style string form (`/` separators on every platform)
    pub fn to_unix_string(&self) -> String {
        paths::to_unix_string(&self.0)
    }

    /// Final component without its extension
    pub fn file_stem(&self) -> Option<&str> {
        self.0.file_stem().and_then(|s| s.to_str())
    }

    /// Whether this path is lexically at or below `parent`
    pub fn is_within(&self, parent: &TagPath) -> bool {
        paths::is_nested_under(&self.0, &parent.0)
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_unix_string())
    }
}

impl From<&str> for TagPath {
    fn from(s: &str) -> Self {
        TagPath::new(s)
    }
}

impl AsRef<Path> for TagPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Serialize for TagPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_unix_string())
    }
}

impl<'de> Deserialize<'de> for TagPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TagPath::new(raw))
    }
}

/// Compiled search pattern locating a tag's definition inside its file
///
/// Keeps the source text verbatim. Two patterns are equal when their source
/// text is equal.
#[derive(Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    /// Compile `source`, failing with [`SchemaError::PatternCompile`]
    pub fn new(source: &str) -> Result<Self, SchemaError> {
        let regex = Regex::new(source).map_err(|e| SchemaError::PatternCompile {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(TagPattern { regex })
    }

    /// The pattern exactly as given
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// 1-based number of the first line of `source` the pattern matches
    ///
    /// Patterns are matched line by line, so `^`/`$` anchor to each line.
    pub fn locate(&self, source: &str) -> Option<usize> {
        source
            .lines()
            .position(|line| self.regex.is_match(line))
            .map(|idx| idx + 1)
    }
}

impl fmt::Debug for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagPattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for TagPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TagPattern {}

impl Serialize for TagPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TagPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TagPattern::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// One parameter of a function or member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionInput {
    pub name: String,
    /// Free-form type annotation
    #[serde(rename = "type")]
    pub type_name: String,
    /// Source text of the default value, empty when there is none
    pub default: String,
}

impl FunctionInput {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default: default.into(),
        }
    }

    /// Input without a default value
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, type_name, "")
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_empty()
    }
}
