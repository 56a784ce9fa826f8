//! Coverage check for the entry file.
//!
//! The merge trusts the entry file to list every header the library needs,
//! each after the headers it includes. This pass verifies that assumption by
//! following nested directives, without touching the merge itself.


use crate::diagnostics::Diagnostic;
use crate::scanner::Scanner;
use crate::security::PathSanitizer;
use crate::source::{AmalgamateError, HeaderSource};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub entry_file: String,
    /// Headers listed by the entry file, in document order
    pub listed: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// Check that `entry_file` lists, in dependency order, every header reachable
/// through nested directives.
///
/// Only a missing or unreadable entry file is fatal; every other finding is
/// recorded as a diagnostic.
pub fn validate<S: HeaderSource + ?Sized>(
    source: &S,
    entry_file: &str,
) -> Result<ValidationReport, AmalgamateError> {
    let entry_name = PathSanitizer::sanitize(entry_file)?;
    let entry = source.read(&entry_name)?;

    let mut diagnostics = Scanner::near_misses(&entry_name, &entry);
    let directives = Scanner::scan(&entry);

    // Position of the first listing of each header
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut listed = Vec::with_capacity(directives.len());
    for (index, directive) in directives.iter().enumerate() {
        match PathSanitizer::sanitize(&directive.referenced_path) {
            Ok(path) => {
                position.entry(path.clone()).or_insert(index);
                listed.push(path);
            }
            Err(e) => diagnostics.push(Diagnostic::error(&entry_name, directive.line, e.to_string())),
        }
    }

    let mut reachable: HashSet<String> = HashSet::new();
    reachable.insert(entry_name.clone());
    let mut visited: HashSet<String> = HashSet::new();

    for directive in &directives {
        let Ok(path) = PathSanitizer::sanitize(&directive.referenced_path) else {
            continue;
        };
        reachable.insert(path.clone());
        if !visited.insert(path.clone()) {
            continue;
        }

        let Some(raw) = read_optional(source, &path)? else {
            diagnostics.push(Diagnostic::error(
                &entry_name,
                directive.line,
                format!("{} does not exist", path),
            ));
            continue;
        };

        let own_position = position[&path];
        let mut unlisted = Vec::new();

        for nested in Scanner::scan(&raw) {
            let target = match PathSanitizer::sanitize(&nested.referenced_path) {
                Ok(target) => target,
                Err(e) => {
                    diagnostics.push(Diagnostic::error(&path, nested.line, e.to_string()));
                    continue;
                }
            };

            match position.get(&target) {
                Some(&p) if p < own_position => {}
                Some(_) => diagnostics.push(Diagnostic::error(
                    &path,
                    nested.line,
                    format!("includes {} which {} lists after it", target, entry_name),
                )),
                None => {
                    diagnostics.push(Diagnostic::error(
                        &path,
                        nested.line,
                        format!("includes {} which {} never lists", target, entry_name),
                    ));
                    unlisted.push(target);
                }
            }
        }

        follow_unlisted(
            source,
            unlisted,
            &entry_name,
            &position,
            &mut visited,
            &mut reachable,
            &mut diagnostics,
        )?;
    }

    for file in source.list()? {
        if file.ends_with(".h") && !reachable.contains(&file) {
            diagnostics.push(Diagnostic::warning(
                &file,
                0,
                format!("never included by {}", entry_name),
            ));
        }
    }

    log::debug!(
        "Validated {}: {} listed, {} reachable, {} diagnostics",
        entry_name,
        listed.len(),
        reachable.len(),
        diagnostics.len()
    );

    Ok(ValidationReport {
        entry_file: entry_name,
        listed,
        diagnostics,
    })
}

/// Walk headers the entry never lists, reporting what they require in turn
fn follow_unlisted<S: HeaderSource + ?Sized>(
    source: &S,
    mut stack: Vec<String>,
    entry_name: &str,
    position: &HashMap<String, usize>,
    visited: &mut HashSet<String>,
    reachable: &mut HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), AmalgamateError> {
    while let Some(path) = stack.pop() {
        reachable.insert(path.clone());
        if !visited.insert(path.clone()) {
            continue;
        }

        let Some(raw) = read_optional(source, &path)? else {
            diagnostics.push(Diagnostic::error(&path, 0, "does not exist"));
            continue;
        };

        for nested in Scanner::scan(&raw) {
            let Ok(target) = PathSanitizer::sanitize(&nested.referenced_path) else {
                continue;
            };
            if !position.contains_key(&target) {
                diagnostics.push(Diagnostic::error(
                    &path,
                    nested.line,
                    format!("includes {} which {} never lists", target, entry_name),
                ));
                stack.push(target);
            }
        }
    }

    Ok(())
}

fn read_optional<S: HeaderSource + ?Sized>(
    source: &S,
    path: &str,
) -> Result<Option<Vec<u8>>, AmalgamateError> {
    match source.read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(AmalgamateError::FileNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
