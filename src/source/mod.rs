mod entry;
mod error;


pub use entry::FileEntry;
pub use error::AmalgamateError;

use crate::security::PathSanitizer;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read access to the headers of a library tree
pub trait HeaderSource {
    /// Read a header's raw bytes by its path relative to the tree root.
    ///
    /// Every call reads the content fresh; nothing is cached between calls.
    fn read(&self, path: &str) -> Result<Vec<u8>, AmalgamateError>;

    /// List every file in the tree as sorted, `/`-separated relative paths
    fn list(&self) -> Result<Vec<String>, AmalgamateError>;

    /// Short human-readable name of the tree, used in logs and errors
    fn describe(&self) -> String;
}

/// Header tree backed by a directory on disk
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl HeaderSource for DirSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AmalgamateError> {
        let virtual_path = PathSanitizer::sanitize(path)?;
        let full_path = self.root.join(&virtual_path);

        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AmalgamateError::FileNotFound {
                path: virtual_path,
                root: self.root.clone(),
            },
            _ => AmalgamateError::io(full_path, e),
        })
    }

    fn list(&self) -> Result<Vec<String>, AmalgamateError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                AmalgamateError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            paths.push(parts.join("/"));
        }

        paths.sort();
        Ok(paths)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Immutable in-memory header tree with arena-backed storage
pub struct MemorySource {
    /// Single contiguous blob containing all file data
    arena: Vec<u8>,
    /// Index mapping virtual paths to arena slices
    index: HashMap<String, FileEntry>,
}

/// Mutable builder for constructing a `MemorySource`
pub struct MemorySourceBuilder {
    arena: Vec<u8>,
    index: HashMap<String, FileEntry>,
}

impl MemorySourceBuilder {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a header to the arena. A repeated path replaces the earlier entry.
    pub fn add_file(&mut self, raw_path: &str, data: &[u8]) -> Result<(), AmalgamateError> {
        let virtual_path = PathSanitizer::sanitize(raw_path)?;

        let offset = self.arena.len();
        self.arena.extend_from_slice(data);

        self.index.insert(
            virtual_path.clone(),
            FileEntry {
                offset,
                length: data.len(),
                virtual_path,
            },
        );

        Ok(())
    }

    /// Chainable form of `add_file`
    pub fn with_file(mut self, raw_path: &str, data: &[u8]) -> Result<Self, AmalgamateError> {
        self.add_file(raw_path, data)?;
        Ok(self)
    }

    pub fn build(self) -> MemorySource {
        MemorySource {
            arena: self.arena,
            index: self.index,
        }
    }
}

impl Default for MemorySourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Get a file's contents as a byte slice (zero-copy)
    pub fn get(&self, virtual_path: &str) -> Option<&[u8]> {
        self.index
            .get(virtual_path)
            .map(|entry| &self.arena[entry.offset..entry.offset + entry.length])
    }

    pub fn get_entry(&self, virtual_path: &str) -> Option<&FileEntry> {
        self.index.get(virtual_path)
    }

    pub fn file_count(&self) -> usize {
        self.index.len()
    }

    /// Total arena size in bytes, including replaced content
    pub fn total_size(&self) -> usize {
        self.arena.len()
    }
}

impl HeaderSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AmalgamateError> {
        let virtual_path = PathSanitizer::sanitize(path)?;

        self.get(&virtual_path)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| AmalgamateError::FileNotFound {
                path: virtual_path,
                root: PathBuf::from(self.describe()),
            })
    }

    fn list(&self) -> Result<Vec<String>, AmalgamateError> {
        let mut paths: Vec<String> = self.index.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }

    fn describe(&self) -> String {
        format!("<memory: {} files>", self.index.len())
    }
}
