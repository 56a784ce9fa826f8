use crate::scanner::Scanner;
use crate::source::{AmalgamateError, HeaderSource};
use regex::bytes::Regex;

/// Guard marker stripped from every fragment unless configured otherwise
pub const DEFAULT_GUARD_MARKER: &str = "#pragma once";

/// Cleaned content of one referenced header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFragment {
    /// Path as written in the directive
    pub path: String,
    pub bytes: Vec<u8>,
    /// Number of guard marker occurrences deleted
    pub guards_removed: usize,
    /// Number of nested directive lines deleted
    pub nested_removed: usize,
}

/// Loads referenced headers and strips what the merged file no longer needs.
///
/// Nested directives are deleted, never followed: the entry file is trusted to
/// list every header the library needs, in dependency order.
pub struct Resolver<'a, S: HeaderSource + ?Sized> {
    source: &'a S,
    guard: Option<Regex>,
}

impl<'a, S: HeaderSource + ?Sized> Resolver<'a, S> {
    pub fn new(source: &'a S, guard_marker: &str) -> Result<Self, AmalgamateError> {
        Ok(Self {
            source,
            guard: guard_pattern(guard_marker)?,
        })
    }

    /// Read `path` fresh from the source and clean it
    pub fn resolve(&self, path: &str) -> Result<ResolvedFragment, AmalgamateError> {
        let raw = self.source.read(path)?;
        let (bytes, guards_removed, nested_removed) = clean_with(&raw, self.guard.as_ref());

        Ok(ResolvedFragment {
            path: path.to_string(),
            bytes,
            guards_removed,
            nested_removed,
        })
    }
}

/// Delete guard markers, then delete directive lines.
///
/// Returns the cleaned bytes with the guard and directive removal counts.
pub fn clean_fragment(
    raw: &[u8],
    guard_marker: &str,
) -> Result<(Vec<u8>, usize, usize), AmalgamateError> {
    let guard = guard_pattern(guard_marker)?;
    Ok(clean_with(raw, guard.as_ref()))
}

/// Literal matcher for the guard marker; an empty marker matches nothing
fn guard_pattern(marker: &str) -> Result<Option<Regex>, AmalgamateError> {
    if marker.is_empty() {
        return Ok(None);
    }
    Regex::new(&regex::escape(marker))
        .map(Some)
        .map_err(|e| AmalgamateError::InvalidConfig(format!("guard marker {:?}: {}", marker, e)))
}

fn clean_with(raw: &[u8], guard: Option<&Regex>) -> (Vec<u8>, usize, usize) {
    let (unguarded, guards_removed) = match guard {
        Some(pattern) => match pattern.find_iter(raw).count() {
            0 => (raw.to_vec(), 0),
            n => (pattern.replace_all(raw, &b""[..]).into_owned(), n),
        },
        None => (raw.to_vec(), 0),
    };
    let (bytes, nested_removed) = Scanner::strip(&unguarded);
    (bytes, guards_removed, nested_removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySourceBuilder;

    #[test]
    fn test_clean_removes_guard_and_nested_line() {
        let raw = b"#pragma once\n#include \"b.h\"\nint c;\n";
        let (bytes, guards, nested) = clean_fragment(raw, DEFAULT_GUARD_MARKER).unwrap();

        assert_eq!(bytes, b"\nint c;\n");
        assert_eq!(guards, 1);
        assert_eq!(nested, 1);
    }

    #[test]
    fn test_guard_removed_before_directive_match() {
        // Once the marker is gone the directive sits at a line start
        let raw = b"#pragma once#include \"b.h\"\nint c;\n";
        let (bytes, _, nested) = clean_fragment(raw, DEFAULT_GUARD_MARKER).unwrap();

        assert_eq!(bytes, b"int c;\n");
        assert_eq!(nested, 1);
    }

    #[test]
    fn test_every_guard_occurrence_removed() {
        let raw = b"#pragma once\nint a;\n#pragma once\n";
        let (bytes, guards, _) = clean_fragment(raw, DEFAULT_GUARD_MARKER).unwrap();

        assert_eq!(bytes, b"\nint a;\n\n");
        assert_eq!(guards, 2);
    }

    #[test]
    fn test_custom_guard_marker() {
        let raw = b"// @guard\nint a;\n#pragma once\n";
        let (bytes, guards, _) = clean_fragment(raw, "// @guard").unwrap();

        assert_eq!(bytes, b"\nint a;\n#pragma once\n");
        assert_eq!(guards, 1);
    }

    #[test]
    fn test_system_includes_kept() {
        let raw = b"#pragma once\n#include <cstdint>\n#include \"utilities.h\"\n";
        let (bytes, _, nested) = clean_fragment(raw, DEFAULT_GUARD_MARKER).unwrap();

        assert_eq!(bytes, b"\n#include <cstdint>\n");
        assert_eq!(nested, 1);
    }

    #[test]
    fn test_resolve_reads_through_source() {
        let source = MemorySourceBuilder::new()
            .with_file("b.h", b"#pragma once\nint b;\n")
            .unwrap()
            .build();
        let resolver = Resolver::new(&source, DEFAULT_GUARD_MARKER).unwrap();

        let fragment = resolver.resolve("b.h").unwrap();
        assert_eq!(fragment.path, "b.h");
        assert_eq!(fragment.bytes, b"\nint b;\n");
        assert_eq!(fragment.guards_removed, 1);
        assert_eq!(fragment.nested_removed, 0);
    }

    #[test]
    fn test_resolve_missing_file() {
        let source = MemorySourceBuilder::new().build();
        let resolver = Resolver::new(&source, DEFAULT_GUARD_MARKER).unwrap();

        assert!(matches!(
            resolver.resolve("gone.h"),
            Err(AmalgamateError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_guard_marker_matched_literally() {
        let raw = b"/* guard (v1.*) */\nint a;\n/* guard (v1x) */\n";
        let (bytes, guards, _) = clean_fragment(raw, "/* guard (v1.*) */").unwrap();

        assert_eq!(bytes, b"\nint a;\n/* guard (v1x) */\n");
        assert_eq!(guards, 1);
    }

    #[test]
    fn test_empty_guard_marker_removes_nothing() {
        let raw = b"#pragma once\nint a;\n";
        let (bytes, guards, _) = clean_fragment(raw, "").unwrap();

        assert_eq!(bytes, raw);
        assert_eq!(guards, 0);
    }
}
