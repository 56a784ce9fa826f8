use once_cell::sync::Lazy;
use regex::bytes::Regex;

static CRLF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n").expect("CRLF pattern is valid"));

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank run pattern is valid"));

/// Convert every `\r\n` pair to `\n`. Lone `\r` bytes are left alone.
pub fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    CRLF.replace_all(bytes, &b"\n"[..]).into_owned()
}

/// Collapse runs of three or more `\n` to exactly two
pub fn collapse_blank_lines(bytes: &[u8]) -> Vec<u8> {
    BLANK_RUN.replace_all(bytes, &b"\n\n"[..]).into_owned()
}

/// Line endings first, then blank lines
pub fn normalize(bytes: &[u8]) -> Vec<u8> {
    collapse_blank_lines(&normalize_line_endings(bytes))
}
