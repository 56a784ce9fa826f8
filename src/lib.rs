//! Merge a header-only library into one self-contained header.
//!
//! The entry file lists the library's headers with quoted `#include`
//! directives. Each directive line is replaced by the referenced header with
//! its guard marker and its own quoted includes removed, then line endings and
//! blank lines are normalized.

pub mod config;
pub mod diagnostics;
pub mod normalizer;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
pub mod security;
pub mod source;
pub mod splicer;
pub mod validate;

// Re-export main types for convenience
pub use config::{AmalgamateConfig, ConfigFile, ConfigOverrides};
pub use diagnostics::{Diagnostic, Severity};
pub use normalizer::{collapse_blank_lines, normalize, normalize_line_endings};
pub use pipeline::{
    amalgamate, write_output, Amalgamation, AmalgamationReport, Amalgamator, DirectiveReport,
    MergeOptions,
};
pub use resolver::{clean_fragment, ResolvedFragment, Resolver, DEFAULT_GUARD_MARKER};
pub use scanner::{InclusionDirective, Scanner};
pub use security::PathSanitizer;
pub use source::{AmalgamateError, DirSource, FileEntry, HeaderSource, MemorySource, MemorySourceBuilder};
pub use splicer::{Segment, SpliceStrategy};
pub use validate::{validate, ValidationReport};
