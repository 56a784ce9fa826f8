use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// A whole directive line: `#include "<path>.h"`, trailing text, terminator.
///
/// Matched on raw bytes with Unicode disabled so that any byte sequence can be
/// scanned. The match spans the line terminator.
pub static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m-u)^#include "(?P<path>[^"\r\n]*\.h)"[^\r\n]*\r?\n"#)
        .expect("directive pattern is valid")
});

/// Any line that begins like a quoted directive, well-formed or not
pub static CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m-u)^#include "(?P<rest>[^\r\n]*)"#).expect("candidate pattern is valid")
});
