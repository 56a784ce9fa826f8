use crate::source::AmalgamateError;
use std::path::{Component, Path};

pub struct PathSanitizer;

impl PathSanitizer {
    /// Normalize a quoted include path into a root-relative virtual path.
    ///
    /// Every header of the merged library lives under the root directory, so a
    /// path that is empty, absolute or climbs out with `..` cannot name one and
    /// is rejected. `.` components are dropped and the result is joined with `/`,
    /// which keeps `detail/x.h` and `./detail/x.h` the same header.
    pub fn sanitize(raw_path: &str) -> Result<String, AmalgamateError> {
        if raw_path.is_empty() {
            return Err(AmalgamateError::InvalidPath("Empty path".to_string()));
        }

        let mut components = Vec::new();

        for component in Path::new(raw_path).components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(AmalgamateError::InvalidPath(format!(
                        "Absolute path not allowed: {}",
                        raw_path
                    )));
                }
                Component::ParentDir => {
                    return Err(AmalgamateError::InvalidPath(format!(
                        "Parent directory traversal not allowed: {}",
                        raw_path
                    )));
                }
                Component::CurDir => continue,
                Component::Normal(part) => {
                    let part_str = part.to_str().ok_or_else(|| {
                        AmalgamateError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", part))
                    })?;
                    components.push(part_str);
                }
            }
        }

        if components.is_empty() {
            return Err(AmalgamateError::InvalidPath(format!(
                "No valid components: {}",
                raw_path
            )));
        }

        Ok(components.join("/"))
    }
}
