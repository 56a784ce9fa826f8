use super::*;
use crate::source::{MemorySource, MemorySourceBuilder};

const ENTRY: &[u8] = b"#pragma once\n#include \"b.h\"\n#include \"c.h\"\nint x;\n";

fn scenario() -> MemorySource {
    MemorySourceBuilder::new()
        .with_file("b.h", b"#pragma once\nint b;\n")
        .and_then(|b| b.with_file("c.h", b"#pragma once\n#include \"b.h\"\nint c;\n"))
        .unwrap()
        .build()
}

#[test]
fn test_merge_concrete_scenario() {
    let source = scenario();
    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", ENTRY)
        .unwrap();

    assert_eq!(
        String::from_utf8(merged.bytes).unwrap(),
        "#pragma once\n\nint b;\n\nint c;\nint x;\n"
    );
    assert_eq!(merged.input_bytes, ENTRY.len());
    assert!(merged.diagnostics.is_empty());

    assert_eq!(merged.directives.len(), 2);
    assert_eq!(merged.directives[0].path, "b.h");
    assert_eq!(merged.directives[0].guards_removed, 1);
    assert_eq!(merged.directives[1].path, "c.h");
    assert_eq!(merged.directives[1].nested_removed, 1);
}

#[test]
fn test_strategies_agree() {
    let source = scenario();
    let segments = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", ENTRY)
        .unwrap();
    let in_place = Amalgamator::new(
        &source,
        MergeOptions {
            strategy: SpliceStrategy::InPlace,
            ..MergeOptions::default()
        },
    )
    .merge("lib.h", ENTRY)
    .unwrap();

    assert_eq!(segments.bytes, in_place.bytes);
    assert_eq!(segments.directives, in_place.directives);
}

#[test]
fn test_no_fragment_guard_or_directive_survives() {
    let source = scenario();
    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", ENTRY)
        .unwrap();
    let text = String::from_utf8(merged.bytes).unwrap();

    // Only the entry's own marker remains
    assert_eq!(text.matches("#pragma once").count(), 1);
    assert!(!text.contains("#include \""));
}

#[test]
fn test_duplicate_reference_resolved_each_time() {
    let source = scenario();
    let entry = b"#include \"b.h\"\n// between\n#include \"b.h\"\n";
    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", entry)
        .unwrap();

    assert_eq!(
        String::from_utf8(merged.bytes).unwrap(),
        "\n\nint b;\n// between\n\nint b;\n"
    );
    assert_eq!(merged.directives.len(), 2);
}

#[test]
fn test_order_follows_entry() {
    let source = MemorySourceBuilder::new()
        .with_file("one.h", b"// one\n")
        .and_then(|b| b.with_file("two.h", b"// two\n"))
        .and_then(|b| b.with_file("three.h", b"// three\n"))
        .unwrap()
        .build();
    let entry = b"#include \"three.h\"\n#include \"one.h\"\n#include \"two.h\"\n";

    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", entry)
        .unwrap();
    let text = String::from_utf8(merged.bytes).unwrap();

    let three = text.find("// three").unwrap();
    let one = text.find("// one").unwrap();
    let two = text.find("// two").unwrap();
    assert!(three < one && one < two);
}

#[test]
fn test_crlf_entry_and_fragments() {
    let source = MemorySourceBuilder::new()
        .with_file("a.h", b"#pragma once\r\n\r\n\r\nint a;\r\n")
        .unwrap()
        .build();
    let entry = b"// lib\r\n#include \"a.h\"\r\nint z;\r\n";

    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", entry)
        .unwrap();

    assert_eq!(
        String::from_utf8(merged.bytes).unwrap(),
        "// lib\n\nint a;\nint z;\n"
    );
}

#[test]
fn test_malformed_directive_left_verbatim() {
    let source = scenario();
    let entry = b"#include \"b.h\"\n#include \"c.h\nint x;\n";

    let merged = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", entry)
        .unwrap();
    let text = String::from_utf8(merged.bytes).unwrap();

    assert!(text.contains("#include \"c.h\nint x;"));
    assert_eq!(merged.directives.len(), 1);
    assert_eq!(merged.diagnostics.len(), 1);
    assert_eq!(merged.diagnostics[0].line, 2);
}

#[test]
fn test_missing_fragment_aborts() {
    let source = scenario();
    let entry = b"#include \"b.h\"\n#include \"nope.h\"\n";

    let err = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", entry)
        .unwrap_err();
    assert!(matches!(err, AmalgamateError::FileNotFound { ref path, .. } if path == "nope.h"));
}

#[test]
fn test_traversal_in_directive_aborts() {
    let source = scenario();
    let err = Amalgamator::new(&source, MergeOptions::default())
        .merge("lib.h", b"#include \"../b.h\"\n")
        .unwrap_err();
    assert!(matches!(err, AmalgamateError::InvalidPath(_)));
}

#[test]
fn test_custom_guard_marker() {
    let source = MemorySourceBuilder::new()
        .with_file("a.h", b"#ifndef A_H\nint a;\n")
        .unwrap()
        .build();
    let options = MergeOptions {
        guard_marker: "#ifndef A_H".to_string(),
        ..MergeOptions::default()
    };

    let merged = Amalgamator::new(&source, options)
        .merge("lib.h", b"#include \"a.h\"\n")
        .unwrap();
    assert_eq!(String::from_utf8(merged.bytes).unwrap(), "\n\nint a;\n");
}
