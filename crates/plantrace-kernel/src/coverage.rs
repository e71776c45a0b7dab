//! Work-item coverage resolution.
//!
//! Scans directories of markdown work items (stories, tasks, acceptance
//! criteria) and records which known identifiers each file references.
//! Unreadable files become `read_errors`; they never abort the scan.

use crate::ids::{IdDomain, find_references};
use crate::rules::IdPatterns;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// How strongly a work item supports the identifiers it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStrength {
    /// Referenced from a file with a partial status or no status marker.
    Partial,
    /// Referenced from a file whose status marks it complete.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemFile {
    pub name: String,
    pub referenced_ids: Vec<String>,
    pub is_complete: bool,
    pub is_partial: bool,
}

impl WorkItemFile {
    pub fn strength(&self) -> TraceStrength {
        if self.is_complete {
            TraceStrength::Complete
        } else {
            TraceStrength::Partial
        }
    }

    pub fn is_scope_creep(&self) -> bool {
        self.referenced_ids.is_empty()
    }
}

/// Coverage facts for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCoverage {
    pub directory: String,
    pub files: Vec<WorkItemFile>,
    /// Canonical ID to the sorted names of files that mention it.
    pub references: BTreeMap<String, Vec<String>>,
    pub scope_creep: Vec<String>,
    pub read_errors: Vec<String>,
}

/// Coverage facts merged across every scanned directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageIndex {
    pub directories: Vec<String>,
    pub files: Vec<WorkItemFile>,
    pub references: BTreeMap<String, Vec<String>>,
    pub scope_creep: Vec<String>,
    pub read_errors: Vec<String>,
}

impl CoverageIndex {
    /// Unions per-ID file lists; a file name is listed once per ID even when
    /// it appears in several directories.
    pub fn merge(parts: Vec<DirectoryCoverage>) -> Self {
        let mut directories = Vec::new();
        let mut files = Vec::new();
        let mut references: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut scope_creep = BTreeSet::new();
        let mut read_errors = Vec::new();

        for part in parts {
            directories.push(part.directory);
            files.extend(part.files);
            for (id, names) in part.references {
                references.entry(id).or_default().extend(names);
            }
            scope_creep.extend(part.scope_creep);
            read_errors.extend(part.read_errors);
        }

        Self {
            directories,
            files,
            references: references
                .into_iter()
                .map(|(id, names)| (id, names.into_iter().collect()))
                .collect(),
            scope_creep: scope_creep.into_iter().collect(),
            read_errors,
        }
    }

    pub fn files_referencing(&self, id: &str) -> &[String] {
        self.references.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_covered(&self, id: &str) -> bool {
        !self.files_referencing(id).is_empty()
    }

    /// File name to the sorted IDs it references; scope-creep files omitted.
    pub fn ids_by_file(&self) -> BTreeMap<String, Vec<String>> {
        let mut by_file: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (id, names) in &self.references {
            for name in names {
                by_file.entry(name.clone()).or_default().insert(id.clone());
            }
        }
        by_file
            .into_iter()
            .map(|(name, ids)| (name, ids.into_iter().collect()))
            .collect()
    }
}

/// Reads one work item's body: references into the known `universe` and its
/// status marker.
pub fn scan_work_item(
    patterns: &IdPatterns,
    domain: IdDomain,
    name: &str,
    content: &str,
    universe: &BTreeSet<String>,
) -> WorkItemFile {
    let is_complete = patterns.status_complete.is_match(content);
    WorkItemFile {
        name: name.to_string(),
        referenced_ids: find_references(patterns, domain, content, Some(universe)),
        is_complete,
        is_partial: !is_complete && patterns.status_partial.is_match(content),
    }
}

/// Scans the top level of `dir` for `.md` files. Other entries are skipped.
pub fn scan_directory(
    patterns: &IdPatterns,
    domain: IdDomain,
    dir: &Path,
    universe: &BTreeSet<String>,
) -> DirectoryCoverage {
    let mut coverage = DirectoryCoverage {
        directory: dir.display().to_string(),
        ..DirectoryCoverage::default()
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(directory = %dir.display(), error = %err, "work-item directory unreadable");
            coverage.read_errors.push(format!("{}: {err}", dir.display()));
            return coverage;
        }
    };

    let mut entries = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                coverage.read_errors.push(format!("{}: {err}", dir.display()));
                None
            }
        })
        .collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.file_name());

    let mut references: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() || !is_markdown(&path) {
            continue;
        }
        // Non-UTF-8 names are still scanned, under a lossy display name.
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "work item unreadable");
                coverage.read_errors.push(format!("{}: {err}", path.display()));
                continue;
            }
        };

        let file = scan_work_item(patterns, domain, &name, &content, universe);
        tracing::debug!(
            file = %name,
            references = file.referenced_ids.len(),
            complete = file.is_complete,
            "scanned work item"
        );
        if file.is_scope_creep() {
            coverage.scope_creep.push(file.name.clone());
        }
        for id in &file.referenced_ids {
            references
                .entry(id.clone())
                .or_default()
                .insert(file.name.clone());
        }
        coverage.files.push(file);
    }

    coverage.references = references
        .into_iter()
        .map(|(id, names)| (id, names.into_iter().collect()))
        .collect();
    coverage
}

/// Scans every directory in order and merges the results.
pub fn resolve_coverage<P: AsRef<Path>>(
    patterns: &IdPatterns,
    domain: IdDomain,
    dirs: &[P],
    universe: &BTreeSet<String>,
) -> CoverageIndex {
    let parts = dirs
        .iter()
        .map(|dir| scan_directory(patterns, domain, dir.as_ref(), universe))
        .collect();
    CoverageIndex::merge(parts)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
