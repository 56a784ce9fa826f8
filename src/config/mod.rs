mod file;
mod loader;

pub use file::{ConfigFile, MergeSection, PathsSection};
pub use loader::{load_config_file, resolve_config, ConfigOverrides, DEFAULT_CONFIG_FILE};

use crate::pipeline::MergeOptions;
use crate::resolver::DEFAULT_GUARD_MARKER;
use crate::security::PathSanitizer;
use crate::source::AmalgamateError;
use crate::splicer::SpliceStrategy;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Everything one run needs, passed explicitly into `amalgamate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmalgamateConfig {
    /// Directory holding the entry file and every header it references
    pub root_dir: PathBuf,
    /// Entry file name, relative to `root_dir`
    pub entry_file: String,
    /// Destination of the merged header
    pub output_path: PathBuf,
    pub guard_marker: String,
    pub strategy: SpliceStrategy,
    /// Write through a temporary file and rename into place
    pub atomic_write: bool,
}

impl AmalgamateConfig {
    /// Config with default merge options
    pub fn new(
        root_dir: impl Into<PathBuf>,
        entry_file: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            entry_file: entry_file.into(),
            output_path: output_path.into(),
            guard_marker: DEFAULT_GUARD_MARKER.to_string(),
            strategy: SpliceStrategy::default(),
            atomic_write: true,
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.root_dir.join(&self.entry_file)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            guard_marker: self.guard_marker.clone(),
            strategy: self.strategy,
        }
    }

    /// Reject configurations that cannot produce a sound run
    pub fn validate(&self) -> Result<(), AmalgamateError> {
        if self.entry_file.trim().is_empty() {
            return Err(AmalgamateError::InvalidConfig(
                "entry file name is empty".to_string(),
            ));
        }
        PathSanitizer::sanitize(&self.entry_file)?;

        if self.guard_marker.is_empty() {
            return Err(AmalgamateError::InvalidConfig(
                "guard marker is empty".to_string(),
            ));
        }

        if self.output_path.file_name().is_none() {
            return Err(AmalgamateError::InvalidConfig(format!(
                "output path has no file name: {}",
                self.output_path.display()
            )));
        }

        if self.output_is_entry() {
            return Err(AmalgamateError::InvalidConfig(format!(
                "output would overwrite the entry file: {}",
                self.output_path.display()
            )));
        }

        Ok(())
    }

    /// Lexical comparison, then canonical paths when both exist
    fn output_is_entry(&self) -> bool {
        let entry = self.entry_path();
        if without_cur_dir(&self.output_path) == without_cur_dir(&entry) {
            return true;
        }
        match (fs::canonicalize(&self.output_path), fs::canonicalize(&entry)) {
            (Ok(output), Ok(entry)) => output == entry,
            _ => false,
        }
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
