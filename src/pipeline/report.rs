use super::Amalgamation;
use crate::config::AmalgamateConfig;
use crate::diagnostics::Diagnostic;
use crate::resolver::ResolvedFragment;
use crate::scanner::InclusionDirective;
use crate::splicer::SpliceStrategy;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one directive of the entry file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveReport {
    pub path: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub fragment_bytes: usize,
    pub guards_removed: usize,
    pub nested_removed: usize,
}

impl DirectiveReport {
    pub fn new(directive: &InclusionDirective, fragment: &ResolvedFragment) -> Self {
        Self {
            path: directive.referenced_path.clone(),
            line: directive.line,
            start: directive.start,
            end: directive.end,
            fragment_bytes: fragment.bytes.len(),
            guards_removed: fragment.guards_removed,
            nested_removed: fragment.nested_removed,
        }
    }
}

/// Summary of a completed run, serialized by `build --report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmalgamationReport {
    pub generator: String,
    pub generated_at: DateTime<Utc>,
    pub root_dir: PathBuf,
    pub entry_file: String,
    pub output_path: PathBuf,
    pub strategy: SpliceStrategy,
    pub directives: Vec<DirectiveReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Hex SHA-256 of the written artifact
    pub sha256: String,
}

impl AmalgamationReport {
    pub fn new(config: &AmalgamateConfig, amalgamation: Amalgamation) -> Self {
        Self {
            generator: format!("single-header v{}", env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            root_dir: config.root_dir.clone(),
            entry_file: config.entry_file.clone(),
            output_path: config.output_path.clone(),
            strategy: config.strategy,
            directives: amalgamation.directives,
            diagnostics: amalgamation.diagnostics,
            input_bytes: amalgamation.input_bytes,
            output_bytes: amalgamation.bytes.len(),
            sha256: sha256_hex(&amalgamation.bytes),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).context(format!("Failed to write report: {}", path.display()))
    }
}

/// SHA-256 digest of `bytes` as lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let config = AmalgamateConfig::new("src", "lib.h", "lib.h");
        let amalgamation = Amalgamation {
            bytes: b"int a;\n".to_vec(),
            directives: vec![],
            diagnostics: vec![Diagnostic::warning("lib.h", 2, "odd line")],
            input_bytes: 30,
        };

        let report = AmalgamationReport::new(&config, amalgamation);
        let json = report.to_json().unwrap();
        let parsed: AmalgamationReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.output_bytes, 7);
        assert_eq!(parsed.input_bytes, 30);
        assert_eq!(parsed.sha256, report.sha256);
        assert_eq!(parsed.strategy, SpliceStrategy::Segments);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert!(json.contains("\"generator\": \"single-header v"));
    }
}
