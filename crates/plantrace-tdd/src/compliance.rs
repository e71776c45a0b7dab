//! Compliance scoring, violations and remediation hints.

use std::fmt;

use plantrace_kernel::{FileKindRules, Grade, compliance_score};
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifiedCommit, TddClassification};
use crate::pairing::suggest_test_file;

pub const MESSAGE_NO_COMMITS: &str = "no commits found in range";
pub const MESSAGE_NO_CODE_COMMITS: &str = "no code commits to analyze";

const MAX_MESSAGE_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TddBreakdown {
    pub test_first: usize,
    pub test_with: usize,
    pub test_after: usize,
    pub test_only: usize,
    pub no_test: usize,
    pub non_code: usize,
}

impl TddBreakdown {
    pub fn record(&mut self, classification: TddClassification) {
        let slot = match classification {
            TddClassification::TestFirst => &mut self.test_first,
            TddClassification::TestWith => &mut self.test_with,
            TddClassification::TestAfter => &mut self.test_after,
            TddClassification::TestOnly => &mut self.test_only,
            TddClassification::NoTest => &mut self.no_test,
            TddClassification::NonCode => &mut self.non_code,
        };
        *slot += 1;
    }

    pub fn score(&self) -> f64 {
        compliance_score(self.test_first, self.test_with, self.test_after, self.no_test)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn for_classification(classification: TddClassification) -> Option<Self> {
        match classification {
            TddClassification::NoTest => Some(Self::Error),
            TddClassification::TestAfter => Some(Self::Warning),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TddViolation {
    pub commit_hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
    pub files: Vec<String>,
    pub classification: TddClassification,
    pub severity: Severity,
    pub remediation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TddCompliance {
    pub total_commits: usize,
    pub total_code_commits: usize,
    pub breakdown: TddBreakdown,
    pub compliance_score: f64,
    pub compliance_grade: Grade,
    pub violations: Vec<TddViolation>,
    pub violations_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Scores classified commits and lists the ones that need attention.
pub fn assess_compliance(classified: &[ClassifiedCommit], rules: &FileKindRules) -> TddCompliance {
    let mut breakdown = TddBreakdown::default();
    let mut flagged = Vec::new();
    for entry in classified {
        breakdown.record(entry.classification);
        if let Some(severity) = Severity::for_classification(entry.classification) {
            flagged.push((entry.commit.timestamp(), violation(entry, severity, rules)));
        }
    }
    // Errors before warnings, newest first within a severity.
    flagged.sort_by(|(left_at, left), (right_at, right)| {
        left.severity
            .cmp(&right.severity)
            .then_with(|| right_at.cmp(left_at))
            .then_with(|| right.date.cmp(&left.date))
    });
    let violations = flagged
        .into_iter()
        .map(|(_, violation)| violation)
        .collect::<Vec<_>>();

    let total_code_commits = classified
        .iter()
        .filter(|entry| entry.classification.is_code_commit())
        .count();
    let compliance_score = breakdown.score();
    let message = if classified.is_empty() {
        Some(MESSAGE_NO_COMMITS.to_string())
    } else if total_code_commits == 0 {
        Some(MESSAGE_NO_CODE_COMMITS.to_string())
    } else {
        None
    };

    tracing::info!(
        commits = classified.len(),
        code_commits = total_code_commits,
        score = compliance_score,
        violations = violations.len(),
        "assessed tdd compliance"
    );

    TddCompliance {
        total_commits: classified.len(),
        total_code_commits,
        breakdown,
        compliance_score,
        compliance_grade: Grade::from_score(compliance_score),
        violations_count: violations.len(),
        violations,
        message,
    }
}

fn violation(entry: &ClassifiedCommit, severity: Severity, rules: &FileKindRules) -> TddViolation {
    let commit = &entry.commit;
    let code_files = entry.code_files(rules).collect::<Vec<_>>();
    TddViolation {
        commit_hash: commit.hash.clone(),
        author: commit.author.clone(),
        date: commit.date.clone(),
        message: truncate_message(&commit.message),
        files: commit.files.clone(),
        classification: entry.classification,
        severity,
        remediation: remediation(&code_files),
    }
}

/// Hint naming the untested code files of a commit.
pub fn remediation(code_files: &[&str]) -> String {
    match code_files {
        [] => "Review commit for missing tests".to_string(),
        [file] => format!("Add tests for: {file} (suggested: {})", suggest_test_file(file)),
        files => format!("Add tests for: {}", files.join(", ")),
    }
}

pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let kept = message
        .chars()
        .take(MAX_MESSAGE_CHARS - ELLIPSIS.len())
        .collect::<String>();
    format!("{kept}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_commits;
    use crate::commit::CommitRecord;

    fn commit(hash: &str, date: &str, message: &str, files: &[&str]) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: "Dev".to_string(),
            date: date.to_string(),
            message: message.to_string(),
            files: files.iter().map(|file| file.to_string()).collect(),
        }
    }

    fn assess(commits: &[CommitRecord]) -> TddCompliance {
        let rules = FileKindRules::new().expect("built-in rules compile");
        assess_compliance(&classify_commits(commits, &rules), &rules)
    }

    #[test]
    fn empty_history_scores_zero_with_message() {
        let result = assess(&[]);
        assert_eq!(result.total_commits, 0);
        assert_eq!(result.compliance_score, 0.0);
        assert_eq!(result.compliance_grade, Grade::F);
        assert_eq!(result.message.as_deref(), Some(MESSAGE_NO_COMMITS));
    }

    #[test]
    fn docs_only_history_has_no_code_commits() {
        let result = assess(&[commit("a", "2026-01-01", "docs", &["README.md"])]);
        assert_eq!(result.total_commits, 1);
        assert_eq!(result.total_code_commits, 0);
        assert_eq!(result.breakdown.non_code, 1);
        assert!(result.violations.is_empty());
        assert_eq!(result.message.as_deref(), Some(MESSAGE_NO_CODE_COMMITS));
    }

    #[test]
    fn untested_feature_is_an_error_violation() {
        let result = assess(&[commit("a", "2026-01-01", "feat", &["feature.go"])]);
        assert_eq!(result.breakdown.no_test, 1);
        assert_eq!(result.violations_count, 1);
        let violation = &result.violations[0];
        assert_eq!(violation.severity, Severity::Error);
        assert_eq!(violation.classification, TddClassification::NoTest);
        assert_eq!(
            violation.remediation,
            "Add tests for: feature.go (suggested: feature_test.go)"
        );
        assert_eq!(result.message, None);
    }

    #[test]
    fn score_weights_each_code_commit() {
        let result = assess(&[
            commit("a", "2026-01-01", "spec", &["auth_test.go"]),
            commit("b", "2026-01-02", "impl", &["auth.go"]),
            commit("c", "2026-01-03", "both", &["cart.go", "cart_test.go"]),
            commit("d", "2026-01-04", "late", &["pay.go"]),
            commit("e", "2026-01-05", "late test", &["pay_test.go"]),
            commit("f", "2026-01-06", "untested", &["misc.go"]),
        ]);
        insta::assert_json_snapshot!(result.breakdown, @r###"
        {
          "test_first": 1,
          "test_with": 1,
          "test_after": 1,
          "test_only": 2,
          "no_test": 1,
          "non_code": 0
        }
        "###);
        assert_eq!(result.total_code_commits, 4);
        assert_eq!(result.compliance_score, 50.0);
        assert_eq!(result.compliance_grade, Grade::D);
    }

    #[test]
    fn violations_sort_errors_first_then_newest() {
        let result = assess(&[
            commit("old", "2026-01-01", "old", &["old.go"]),
            commit("late", "2026-01-02", "late", &["late.go"]),
            commit("new", "2026-01-03T09:00:00Z", "new", &["new.go"]),
            commit("late-test", "2026-01-04", "late test", &["late_test.go"]),
        ]);
        let order = result
            .violations
            .iter()
            .map(|violation| (violation.commit_hash.as_str(), violation.severity))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                ("new", Severity::Error),
                ("old", Severity::Error),
                ("late", Severity::Warning),
            ]
        );
    }

    #[test]
    fn remediation_variants() {
        assert_eq!(remediation(&[]), "Review commit for missing tests");
        assert_eq!(
            remediation(&["src/app.ts"]),
            "Add tests for: src/app.ts (suggested: src/app.test.ts)"
        );
        assert_eq!(remediation(&["a.go", "b.go"]), "Add tests for: a.go, b.go");
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(250);
        let truncated = truncate_message(&long);
        assert_eq!(truncated.chars().count(), 200);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_message("short"), "short");
        assert_eq!(truncate_message(&"y".repeat(200)), "y".repeat(200));
    }
}
