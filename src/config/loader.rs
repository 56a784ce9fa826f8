use super::{AmalgamateConfig, ConfigFile};
use crate::splicer::SpliceStrategy;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "single-header.toml";

/// Load a TOML config file.
///
/// An explicit `path` must exist. Without one, `single-header.toml` is used if
/// present and `Ok(None)` is returned otherwise.
pub fn load_config_file(path: Option<&Path>) -> Result<Option<ConfigFile>> {
    let (config_path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    if !config_path.exists() {
        if required {
            bail!("Config file not found: {}", config_path.display());
        }
        return Ok(None);
    }

    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config file: {}", config_path.display()))?;
    let file = ConfigFile::from_toml(&content)
        .context(format!("Failed to parse config file: {}", config_path.display()))?;

    log::debug!("Loaded config from {}", config_path.display());
    Ok(Some(file))
}

/// Values given on the command line; they win over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub entry: Option<String>,
    pub output: Option<PathBuf>,
    pub guard_marker: Option<String>,
    pub strategy: Option<SpliceStrategy>,
    pub atomic_write: Option<bool>,
}

/// Combine CLI overrides, file values and defaults, in that order of precedence
pub fn resolve_config(file: Option<ConfigFile>, overrides: ConfigOverrides) -> Result<AmalgamateConfig> {
    let file = file.unwrap_or_default();

    let entry = overrides
        .entry
        .or(file.paths.entry)
        .context("No entry file configured (pass --entry or set paths.entry)")?;
    let root = overrides
        .root
        .or(file.paths.root)
        .unwrap_or_else(|| PathBuf::from("."));
    let output = match overrides.output.or(file.paths.output) {
        Some(output) => output,
        None => Path::new(&entry)
            .file_name()
            .map(PathBuf::from)
            .context(format!("Cannot derive an output name from entry {}", entry))?,
    };

    let mut config = AmalgamateConfig::new(root, entry, output);

    if let Some(marker) = overrides.guard_marker.or(file.merge.guard_marker) {
        config.guard_marker = marker;
    }
    if let Some(strategy) = overrides.strategy.or(file.merge.strategy) {
        config.strategy = strategy;
    }
    if let Some(atomic) = overrides.atomic_write.or(file.merge.atomic_write) {
        config.atomic_write = atomic;
    }

    Ok(config)
}
