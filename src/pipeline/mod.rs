mod output;
mod report;

#[cfg(test)]
mod tests;

pub use output::write_output;
pub use report::{sha256_hex, AmalgamationReport, DirectiveReport};

use crate::config::AmalgamateConfig;
use crate::diagnostics::Diagnostic;
use crate::normalizer::normalize;
use crate::resolver::{Resolver, DEFAULT_GUARD_MARKER};
use crate::scanner::Scanner;
use crate::source::{AmalgamateError, DirSource, HeaderSource};
use crate::splicer::{splice, SpliceStrategy};

/// Knobs of the in-memory merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub guard_marker: String,
    pub strategy: SpliceStrategy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            guard_marker: DEFAULT_GUARD_MARKER.to_string(),
            strategy: SpliceStrategy::default(),
        }
    }
}

/// Result of merging one entry file in memory
#[derive(Debug, Clone)]
pub struct Amalgamation {
    /// Normalized output bytes
    pub bytes: Vec<u8>,
    /// One entry per substituted directive, in document order
    pub directives: Vec<DirectiveReport>,
    /// Near misses found in the entry file
    pub diagnostics: Vec<Diagnostic>,
    /// Size of the entry file before merging
    pub input_bytes: usize,
}

/// Single-pass merger over a header source
pub struct Amalgamator<'a, S: HeaderSource + ?Sized> {
    source: &'a S,
    options: MergeOptions,
}

impl<'a, S: HeaderSource + ?Sized> Amalgamator<'a, S> {
    pub fn new(source: &'a S, options: MergeOptions) -> Self {
        Self { source, options }
    }

    /// Scan, resolve, splice and normalize `entry`.
    ///
    /// The entry is scanned exactly once and every directive is resolved
    /// exactly once; fragments are never scanned for further expansion.
    pub fn merge(&self, entry_name: &str, entry: &[u8]) -> Result<Amalgamation, AmalgamateError> {
        let mut pending = Scanner::scan(entry);
        log::debug!("Found {} directives in {}", pending.len(), entry_name);

        let diagnostics = Scanner::near_misses(entry_name, entry);
        for diagnostic in &diagnostics {
            diagnostic.log();
        }

        // The in-place splice consumes directives from the end of the buffer
        if self.options.strategy == SpliceStrategy::InPlace {
            pending.reverse();
        }

        let resolver = Resolver::new(self.source, &self.options.guard_marker)?;
        let mut pairs = Vec::with_capacity(pending.len());

        for directive in pending {
            let fragment = resolver.resolve(&directive.referenced_path)?;
            log::debug!(
                "Resolved {} (line {}): {} bytes, {} guard(s) and {} nested directive(s) removed",
                fragment.path,
                directive.line,
                fragment.bytes.len(),
                fragment.guards_removed,
                fragment.nested_removed
            );
            pairs.push((directive, fragment));
        }

        pairs.sort_by_key(|(directive, _)| directive.start);

        let bytes = normalize(&splice(self.options.strategy, entry, &pairs));
        let directives = pairs
            .iter()
            .map(|(directive, fragment)| DirectiveReport::new(directive, fragment))
            .collect();

        Ok(Amalgamation {
            bytes,
            directives,
            diagnostics,
            input_bytes: entry.len(),
        })
    }
}

/// Merge the configured entry file and write the output artifact
pub fn amalgamate(config: &AmalgamateConfig) -> Result<AmalgamationReport, AmalgamateError> {
    config.validate()?;

    let source = DirSource::new(&config.root_dir);
    log::info!(
        "Merging {} from {} into {}",
        config.entry_file,
        source.describe(),
        config.output_path.display()
    );

    let entry = source.read(&config.entry_file)?;

    let amalgamation = Amalgamator::new(&source, config.merge_options()).merge(&config.entry_file, &entry)?;

    write_output(&config.output_path, &amalgamation.bytes, config.atomic_write)?;

    let report = AmalgamationReport::new(config, amalgamation);
    log::info!(
        "Wrote {} ({} bytes, {} headers inlined, sha256 {})",
        report.output_path.display(),
        report.output_bytes,
        report.directives.len(),
        report.sha256
    );

    Ok(report)
}
