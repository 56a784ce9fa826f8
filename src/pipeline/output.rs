use crate::source::AmalgamateError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the merged artifact.
///
/// With `atomic` set the bytes go to a sibling `<name>.tmp` first and are
/// renamed over `path`, so a failed write never leaves a partial artifact.
pub fn write_output(path: &Path, bytes: &[u8], atomic: bool) -> Result<(), AmalgamateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AmalgamateError::io(parent, e))?;
    }

    if !atomic {
        return fs::write(path, bytes).map_err(|e| AmalgamateError::io(path, e));
    }

    let temp = temp_path(path);
    log::debug!("Writing {} bytes to {}", bytes.len(), temp.display());

    if let Err(e) = fs::write(&temp, bytes) {
        let _ = fs::remove_file(&temp);
        return Err(AmalgamateError::io(temp, e));
    }

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        AmalgamateError::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(temp_path(Path::new("out/lib.h")), PathBuf::from("out/lib.h.tmp"));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("merged.h");

        write_output(&target, b"int a;\n", true).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"int a;\n");
        assert!(!dir.path().join("merged.h.tmp").exists());
    }

    #[test]
    fn test_direct_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("merged.h");
        fs::write(&target, b"old old old").unwrap();

        write_output(&target, b"new", false).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("dist/include/lib.h");

        write_output(&target, b"x", true).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_unwritable_target_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be replaced by a file
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), b"").unwrap();

        let err = write_output(&target, b"x", true).unwrap_err();
        assert!(matches!(err, AmalgamateError::Io { .. }));
        assert!(!dir.path().join("taken.tmp").exists());
    }
}
