//! Two-pass commit classification.
//!
//! The static pass looks at each commit alone. The temporal pass revisits
//! commits that touched code without tests and asks whether a paired test
//! file appeared earlier or later in the history.

use std::collections::HashMap;
use std::fmt;

use plantrace_kernel::{FileKind, FileKindRules};
use serde::{Deserialize, Serialize};

use crate::commit::CommitRecord;
use crate::pairing::paired_implementation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TddClassification {
    TestFirst,
    TestWith,
    TestAfter,
    TestOnly,
    NoTest,
    NonCode,
}

impl TddClassification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TestFirst => "test-first",
            Self::TestWith => "test-with",
            Self::TestAfter => "test-after",
            Self::TestOnly => "test-only",
            Self::NoTest => "no-test",
            Self::NonCode => "non-code",
        }
    }

    /// Whether the commit counts toward the compliance score.
    pub fn is_code_commit(self) -> bool {
        !matches!(self, Self::TestOnly | Self::NonCode)
    }
}

impl fmt::Display for TddClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    #[serde(flatten)]
    pub commit: CommitRecord,
    pub classification: TddClassification,
    pub has_test_files: bool,
    pub has_code_files: bool,
}

impl ClassifiedCommit {
    pub fn code_files<'a>(&'a self, rules: &'a FileKindRules) -> impl Iterator<Item = &'a str> {
        self.commit
            .files
            .iter()
            .map(String::as_str)
            .filter(|file| rules.is_code(file))
    }
}

/// First pass: classify each commit from its own file list.
pub fn classify_static(commits: &[CommitRecord], rules: &FileKindRules) -> Vec<ClassifiedCommit> {
    commits
        .iter()
        .map(|commit| {
            let mut has_test_files = false;
            let mut has_code_files = false;
            for file in &commit.files {
                match rules.classify(file) {
                    FileKind::Test => has_test_files = true,
                    FileKind::Code => has_code_files = true,
                    FileKind::NonCode | FileKind::Unknown => {}
                }
            }
            let classification = match (has_test_files, has_code_files) {
                (true, true) => TddClassification::TestWith,
                (true, false) => TddClassification::TestOnly,
                (false, true) => TddClassification::NoTest,
                (false, false) => TddClassification::NonCode,
            };
            ClassifiedCommit {
                commit: commit.clone(),
                classification,
                has_test_files,
                has_code_files,
            }
        })
        .collect()
}

/// Second pass: upgrade `no-test` commits whose code files have a paired
/// test first seen in another commit. An earlier test wins over a later one.
pub fn reclassify_temporal(
    mut classified: Vec<ClassifiedCommit>,
    rules: &FileKindRules,
) -> Vec<ClassifiedCommit> {
    let mut first_seen = HashMap::<&str, usize>::new();
    let mut tests_by_implementation = HashMap::<String, Vec<&str>>::new();
    for (idx, entry) in classified.iter().enumerate() {
        for file in entry.commit.files.iter().filter(|file| rules.is_test(file)) {
            if first_seen.contains_key(file.as_str()) {
                continue;
            }
            first_seen.insert(file.as_str(), idx);
            if let Some(implementation) = paired_implementation(file, rules) {
                tests_by_implementation
                    .entry(implementation)
                    .or_default()
                    .push(file.as_str());
            }
        }
    }

    let mut upgrades = Vec::new();
    for (idx, entry) in classified.iter().enumerate() {
        if entry.classification != TddClassification::NoTest {
            continue;
        }
        let test_indexes = entry
            .code_files(rules)
            .filter_map(|file| tests_by_implementation.get(file))
            .flatten()
            .filter_map(|test| first_seen.get(test).copied())
            .collect::<Vec<_>>();

        let upgraded = if test_indexes.iter().any(|&seen| seen < idx) {
            TddClassification::TestFirst
        } else if test_indexes.iter().any(|&seen| seen > idx) {
            TddClassification::TestAfter
        } else {
            continue;
        };
        tracing::debug!(
            hash = %entry.commit.hash,
            classification = %upgraded,
            "reclassified commit from paired test history"
        );
        upgrades.push((idx, upgraded));
    }

    for (idx, upgraded) in upgrades {
        classified[idx].classification = upgraded;
    }
    classified
}

/// Runs both passes over commits in history order (oldest first).
pub fn classify_commits(commits: &[CommitRecord], rules: &FileKindRules) -> Vec<ClassifiedCommit> {
    reclassify_temporal(classify_static(commits, rules), rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantrace_kernel::RuleExtensions;

    fn commit(hash: &str, files: &[&str]) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: "Dev".to_string(),
            date: "2026-01-15".to_string(),
            message: format!("commit {hash}"),
            files: files.iter().map(|file| file.to_string()).collect(),
        }
    }

    fn rules() -> FileKindRules {
        FileKindRules::new().expect("built-in rules compile")
    }

    fn classifications(commits: &[CommitRecord]) -> Vec<TddClassification> {
        classify_commits(commits, &rules())
            .into_iter()
            .map(|entry| entry.classification)
            .collect()
    }

    #[test]
    fn static_pass_covers_every_file_mix() {
        let commits = [
            commit("a", &["auth.go", "auth_test.go"]),
            commit("b", &["auth_test.go"]),
            commit("c", &["feature.go"]),
            commit("d", &["README.md"]),
            commit("e", &["Makefile"]),
            commit("f", &["auth_test.go", "NOTES.md"]),
        ];
        let classified = classify_static(&commits, &rules());
        let kinds = classified
            .iter()
            .map(|entry| entry.classification)
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                TddClassification::TestWith,
                TddClassification::TestOnly,
                TddClassification::NoTest,
                TddClassification::NonCode,
                TddClassification::NonCode,
                TddClassification::TestOnly,
            ]
        );
        assert!(classified[0].has_test_files && classified[0].has_code_files);
        assert!(!classified[3].has_test_files && !classified[3].has_code_files);
    }

    #[test]
    fn earlier_test_makes_implementation_test_first() {
        let commits = [commit("a", &["auth_test.go"]), commit("b", &["auth.go"])];
        assert_eq!(
            classifications(&commits),
            vec![TddClassification::TestOnly, TddClassification::TestFirst]
        );
    }

    #[test]
    fn later_test_makes_implementation_test_after() {
        let commits = [
            commit("a", &["src/auth.ts"]),
            commit("b", &["src/auth.spec.ts"]),
        ];
        assert_eq!(
            classifications(&commits),
            vec![TddClassification::TestAfter, TddClassification::TestOnly]
        );
    }

    #[test]
    fn unpaired_code_stays_no_test() {
        let commits = [commit("a", &["feature.go"]), commit("b", &["other_test.go"])];
        assert_eq!(
            classifications(&commits),
            vec![TddClassification::NoTest, TddClassification::TestOnly]
        );
    }

    #[test]
    fn configured_test_patterns_pair_across_commits() {
        let rules = FileKindRules::with_extensions(&RuleExtensions {
            extra_test_patterns: vec![r"\.it\.ts$".to_string()],
            ..RuleExtensions::default()
        })
        .expect("configured rules compile");
        let commits = [commit("a", &["src/api.it.ts"]), commit("b", &["src/api.ts"])];
        let kinds = classify_commits(&commits, &rules)
            .into_iter()
            .map(|entry| entry.classification)
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![TddClassification::TestOnly, TddClassification::TestFirst]);
    }

    #[test]
    fn pairing_respects_directories() {
        let commits = [commit("a", &["pkg/a/auth_test.go"]), commit("b", &["pkg/b/auth.go"])];
        assert_eq!(
            classifications(&commits),
            vec![TddClassification::TestOnly, TddClassification::NoTest]
        );
    }

    #[test]
    fn conflicting_signals_resolve_to_test_first() {
        let commits = [
            commit("a", &["test_auth.py"]),
            commit("b", &["auth.py", "billing.py"]),
            commit("c", &["test_billing.py"]),
        ];
        assert_eq!(classifications(&commits)[1], TddClassification::TestFirst);
    }

    #[test]
    fn test_with_commits_seed_first_seen() {
        let commits = [
            commit("a", &["auth.go", "auth_test.go"]),
            commit("b", &["auth.go"]),
        ];
        assert_eq!(
            classifications(&commits),
            vec![TddClassification::TestWith, TddClassification::TestFirst]
        );
    }

    #[test]
    fn classification_serializes_kebab_case() {
        let json = serde_json::to_value(TddClassification::TestFirst).expect("serialize");
        assert_eq!(json, "test-first");
        assert!(!TddClassification::NonCode.is_code_commit());
        assert!(!TddClassification::TestOnly.is_code_commit());
        assert!(TddClassification::NoTest.is_code_commit());
    }
}
