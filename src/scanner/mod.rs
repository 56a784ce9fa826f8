//! Textual discovery of quoted include directives.
//!
//! This is pattern matching, not preprocessing: a directive inside a comment or
//! a string literal is found like any other, and a malformed one is left alone.

mod pattern;


use crate::diagnostics::Diagnostic;
use std::collections::HashSet;

pub use pattern::{CANDIDATE, DIRECTIVE};

/// One matched directive, located in the buffer it was scanned from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionDirective {
    /// Path between the quotes, relative to the tree root
    pub referenced_path: String,
    /// Offset of the `#` that opens the directive line
    pub start: usize,
    /// Offset one past the directive's line terminator
    pub end: usize,
    /// 1-based line number of the directive
    pub line: usize,
}

pub struct Scanner;

impl Scanner {
    /// Find every directive in document order with a single pass over `bytes`.
    ///
    /// Offsets are only meaningful against this exact buffer.
    pub fn scan(bytes: &[u8]) -> Vec<InclusionDirective> {
        let mut directives = Vec::new();
        let mut line = 1;
        let mut counted_to = 0;

        for caps in DIRECTIVE.captures_iter(bytes) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(path) = caps.name("path") else { continue };

            line += count_newlines(&bytes[counted_to..whole.start()]);
            counted_to = whole.start();

            directives.push(InclusionDirective {
                referenced_path: String::from_utf8_lossy(path.as_bytes()).into_owned(),
                start: whole.start(),
                end: whole.end(),
                line,
            });
        }

        directives
    }

    /// Delete every directive line entirely, returning the remaining bytes and
    /// how many lines were removed
    pub fn strip(bytes: &[u8]) -> (Vec<u8>, usize) {
        let removed = DIRECTIVE.find_iter(bytes).count();
        if removed == 0 {
            return (bytes.to_vec(), 0);
        }
        (DIRECTIVE.replace_all(bytes, &b""[..]).into_owned(), removed)
    }

    /// Report lines that look like quoted directives but will be left verbatim
    pub fn near_misses(file: &str, bytes: &[u8]) -> Vec<Diagnostic> {
        let matched: HashSet<usize> = DIRECTIVE.find_iter(bytes).map(|m| m.start()).collect();
        let mut diagnostics = Vec::new();

        for caps in CANDIDATE.captures_iter(bytes) {
            let Some(whole) = caps.get(0) else { continue };
            if matched.contains(&whole.start()) {
                continue;
            }

            let rest = caps.name("rest").map(|m| m.as_bytes()).unwrap_or_default();
            let line = count_newlines(&bytes[..whole.start()]) + 1;
            let text = String::from_utf8_lossy(whole.as_bytes());

            let reason = match rest.iter().position(|&b| b == b'"') {
                None => "unterminated quote",
                Some(close) if !rest[..close].ends_with(b".h") => "target is not a .h header",
                Some(_) => "no line terminator after the directive",
            };

            diagnostics.push(Diagnostic::warning(
                file,
                line,
                format!("`{}` left unexpanded: {}", text, reason),
            ));
        }

        diagnostics
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
