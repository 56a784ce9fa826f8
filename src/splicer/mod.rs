//! Substitution of resolved fragments into the entry buffer.
//!
//! Two strategies produce identical bytes. `Segments` walks the directives
//! left to right and concatenates borrowed literal spans with the fragments.
//! `InPlace` rewrites a single buffer starting from the highest `start`, so
//! every directive still pending sits below the edited region and keeps its
//! recorded offsets.


use crate::resolver::ResolvedFragment;
use crate::scanner::InclusionDirective;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes placed in front of every substituted fragment
pub const FRAGMENT_PREFIX: &[u8] = b"\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpliceStrategy {
    /// Ordered segment list, concatenated once
    #[default]
    Segments,
    /// Reverse-offset mutation of one buffer
    InPlace,
}

impl fmt::Display for SpliceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceStrategy::Segments => write!(f, "segments"),
            SpliceStrategy::InPlace => write!(f, "in-place"),
        }
    }
}

/// One piece of the output in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Untouched span of the entry buffer
    Literal(&'a [u8]),
    /// Replacement for one directive
    Fragment(&'a [u8]),
}

impl Segment<'_> {
    fn len(&self) -> usize {
        match self {
            Segment::Literal(bytes) => bytes.len(),
            Segment::Fragment(bytes) => FRAGMENT_PREFIX.len() + bytes.len(),
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Segment::Literal(bytes) => out.extend_from_slice(bytes),
            Segment::Fragment(bytes) => {
                out.extend_from_slice(FRAGMENT_PREFIX);
                out.extend_from_slice(bytes);
            }
        }
    }
}

/// Splice with the chosen strategy.
///
/// `pairs` must be in document order with non-overlapping, in-bounds spans,
/// as produced by one `Scanner::scan` of `source`.
pub fn splice(
    strategy: SpliceStrategy,
    source: &[u8],
    pairs: &[(InclusionDirective, ResolvedFragment)],
) -> Vec<u8> {
    match strategy {
        SpliceStrategy::Segments => assemble(&segments(source, pairs)),
        SpliceStrategy::InPlace => {
            let mut buffer = source.to_vec();
            splice_in_place(&mut buffer, pairs);
            buffer
        }
    }
}

/// Split `source` into literal spans and fragments, left to right
pub fn segments<'a>(
    source: &'a [u8],
    pairs: &'a [(InclusionDirective, ResolvedFragment)],
) -> Vec<Segment<'a>> {
    let mut out = Vec::with_capacity(pairs.len() * 2 + 1);
    let mut cursor = 0;

    for (directive, fragment) in pairs {
        debug_assert!(cursor <= directive.start && directive.start <= directive.end);
        if directive.start > cursor {
            out.push(Segment::Literal(&source[cursor..directive.start]));
        }
        out.push(Segment::Fragment(&fragment.bytes));
        cursor = directive.end;
    }

    if cursor < source.len() {
        out.push(Segment::Literal(&source[cursor..]));
    }

    out
}

/// Concatenate segments into one buffer
pub fn assemble(segments: &[Segment<'_>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(segments.iter().map(Segment::len).sum());
    for segment in segments {
        segment.write_to(&mut out);
    }
    out
}

/// Replace each directive span inside `buffer`, highest `start` first.
///
/// `buffer` must be the exact snapshot the directives were scanned from.
pub fn splice_in_place(buffer: &mut Vec<u8>, pairs: &[(InclusionDirective, ResolvedFragment)]) {
    let mut order: Vec<&(InclusionDirective, ResolvedFragment)> = pairs.iter().collect();
    order.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    for (directive, fragment) in order {
        let replacement = FRAGMENT_PREFIX.iter().chain(fragment.bytes.iter()).copied();
        drop(buffer.splice(directive.start..directive.end, replacement));
    }
}
