//! Ingest driver - turns extractor output (one JSON record per line) into raw tags
//!
//! Each line is parsed independently, so large streams are parsed on rayon's
//! pool. Results are always reported in input order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::schema::{RawTag, SchemaError, TagIdentity, TagKind, TagPath};

/// What to do with a record that fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first bad record
    #[default]
    Abort,
    /// Log it, remember it in the report, keep going
    Skip,
}

/// Configuration for [`ingest_lines`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct IngestConfig {
    pub on_error: ErrorPolicy,
    /// Parse on rayon's pool once the stream reaches `parallel_threshold` lines
    pub parallel: bool,
    pub parallel_threshold: usize,
    /// Whitespace-only lines are not records
    pub skip_blank_lines: bool,
    /// Drop records whose tag ID was already seen in this stream
    pub dedupe: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Abort,
            parallel: true,
            parallel_threshold: 64,
            skip_blank_lines: true,
            dedupe: false,
        }
    }
}

impl IngestConfig {
    /// Parse a JSON config; missing keys take their defaults
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// A record that failed under [`ErrorPolicy::Abort`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct IngestError {
    /// 1-based line number in the stream
    pub line: usize,
    pub source: SchemaError,
}

/// A record dropped under [`ErrorPolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub error: SchemaError,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub kind: TagKind,
    /// Parsed tags in input order
    pub tags: Vec<RawTag>,
    pub skipped: Vec<SkippedLine>,
    pub duplicates: usize,
}

impl IngestReport {
    /// Tags grouped by the file that defines them, input order kept per file
    pub fn by_path(&self) -> BTreeMap<&TagPath, Vec<&RawTag>> {
        let mut groups: BTreeMap<&TagPath, Vec<&RawTag>> = BTreeMap::new();
        for tag in &self.tags {
            groups.entry(tag.path()).or_default().push(tag);
        }
        groups
    }
}

fn parse_line(kind: TagKind, &(line, text): &(usize, &str)) -> (usize, Result<RawTag, SchemaError>) {
    (line, RawTag::parse(kind, text))
}

/// Parse every record in `text` as a `kind` tag
pub fn ingest_lines(
    kind: TagKind,
    text: &str,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !(config.skip_blank_lines && line.trim().is_empty()))
        .collect();

    let results: Vec<(usize, Result<RawTag, SchemaError>)> =
        if config.parallel && lines.len() >= config.parallel_threshold {
            lines.par_iter().map(|entry| parse_line(kind, entry)).collect()
        } else {
            lines.iter().map(|entry| parse_line(kind, entry)).collect()
        };

    let mut report = IngestReport {
        kind,
        tags: Vec::with_capacity(results.len()),
        skipped: Vec::new(),
        duplicates: 0,
    };
    let mut seen = HashSet::new();

    for (line, result) in results {
        match result {
            Ok(tag) => {
                if config.dedupe && !seen.insert(tag.id()) {
                    trace!("Dropping duplicate {} tag {} at line {}", kind, tag.name(), line);
                    report.duplicates += 1;
                    continue;
                }
                report.tags.push(tag);
            }
            Err(error) => match config.on_error {
                ErrorPolicy::Abort => return Err(IngestError { line, source: error }),
                ErrorPolicy::Skip => {
                    warn!("Skipping {} record at line {}: {}", kind, line, error);
                    report.skipped.push(SkippedLine { line, error });
                }
            },
        }
    }

    debug!(
        "Ingested {} {} tags ({} skipped, {} duplicates) from {} records",
        report.tags.len(),
        kind,
        report.skipped.len(),
        report.duplicates,
        lines.len()
    );
    Ok(report)
}

/// Read an extractor output file and ingest it
pub fn read_tag_file(path: &Path, kind: TagKind, config: &IngestConfig) -> Result<IngestReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read extractor output {}", path.display()))?;
    let report = ingest_lines(kind, &text, config)
        .with_context(|| format!("failed to ingest {}", path.display()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, path: &str) -> String {
        format!(r#"{{"name":"{name}","path":"{path}","pattern":"^{name} ="}}"#)
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert!(config.parallel);
        assert!(config.skip_blank_lines);
        assert!(!config.dedupe);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = IngestConfig::from_json(r#"{"onError":"skip","dedupe":true}"#).unwrap();
        assert_eq!(config.on_error, ErrorPolicy::Skip);
        assert!(config.dedupe);
        assert_eq!(config.parallel_threshold, 64);

        assert!(IngestConfig::from_json(r#"{"on_error":"skip"}"#).is_err());
    }

    #[test]
    fn test_abort_reports_first_bad_line() {
        let text = format!("{}\n\n{{\"name\":\"B\"}}\nnot json\n", record("A", "a.py"));
        let err = ingest_lines(TagKind::Variable, &text, &IngestConfig::default()).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.source, SchemaError::MissingField { field: "path" });
        assert_eq!(err.to_string(), "line 3: missing field `path`");
    }

    #[test]
    fn test_skip_keeps_going() {
        let text = format!("{}\nnot json\n{}\n", record("A", "a.py"), record("B", "b.py"));
        let config = IngestConfig {
            on_error: ErrorPolicy::Skip,
            ..Default::default()
        };
        let report = ingest_lines(TagKind::Variable, &text, &config).unwrap();
        let names: Vec<&str> = report.tags.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 2);
        assert!(matches!(
            report.skipped[0].error,
            SchemaError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn test_blank_lines_can_be_records() {
        let text = format!("{}\n   \n", record("A", "a.py"));
        let config = IngestConfig {
            skip_blank_lines: false,
            ..Default::default()
        };
        let err = ingest_lines(TagKind::Variable, &text, &config).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.source, SchemaError::MalformedRecord { .. }));
    }

    #[test]
    fn test_dedupe() {
        let a = record("A", "a.py");
        let text = format!("{a}\n{a}\n{}\n", record("B", "a.py"));
        let config = IngestConfig {
            dedupe: true,
            ..Default::default()
        };
        let report = ingest_lines(TagKind::Class, &text, &config).unwrap();
        assert_eq!(report.tags.len(), 2);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_parallel_preserves_order() {
        let text: String = (0..500)
            .map(|i| record(&format!("V{i}"), &format!("m{}.py", i % 7)) + "\n")
            .collect();
        let config = IngestConfig {
            parallel_threshold: 1,
            ..Default::default()
        };
        let report = ingest_lines(TagKind::Variable, &text, &config).unwrap();
        assert_eq!(report.tags.len(), 500);
        for (i, tag) in report.tags.iter().enumerate() {
            assert_eq!(tag.name(), format!("V{i}"));
        }
    }

    #[test]
    fn test_by_path_groups_in_order() {
        let text = [
            record("A", "a.py"),
            record("B", "b.py"),
            record("C", "a.py"),
        ]
        .join("\n");
        let report = ingest_lines(TagKind::Variable, &text, &IngestConfig::default()).unwrap();
        let groups = report.by_path();
        let a: Vec<&str> = groups[&TagPath::new("a.py")].iter().map(|t| t.name()).collect();
        assert_eq!(a, ["A", "C"]);
        assert_eq!(groups.len(), 2);
    }
}
