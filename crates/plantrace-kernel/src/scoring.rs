//! Scoring engine: alignment, binary coverage, risk coverage, and the
//! weighted TDD compliance score with its letter grade.
//!
//! Every percentage is `0.0` when its denominator is zero.

use crate::coverage::{CoverageIndex, TraceStrength};
use crate::ids::Identified;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const REASON_PARTIAL: &str = "Story in progress or incomplete";
pub const REASON_UNMET: &str = "No story traces to this requirement";

const PARTIAL_WEIGHT: f64 = 0.5;

const TEST_FIRST_POINTS: f64 = 100.0;
const TEST_WITH_POINTS: f64 = 75.0;
const TEST_AFTER_POINTS: f64 = 25.0;
const NO_TEST_POINTS: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Unmet,
    Partial,
    Met,
}

impl RequirementStatus {
    /// Applies one trace; a status never moves backwards.
    pub fn upgrade(self, strength: TraceStrength) -> Self {
        let target = match strength {
            TraceStrength::Complete => Self::Met,
            TraceStrength::Partial => Self::Partial,
        };
        self.max(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unmet => "unmet",
            Self::Partial => "partial",
            Self::Met => "met",
        }
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDetail {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: RequirementStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traced_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGap {
    pub requirement_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub status: RequirementStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    pub total: usize,
    pub met: usize,
    pub partial: usize,
    pub unmet: usize,
    pub score: f64,
    pub gaps: Vec<AlignmentGap>,
    pub details: Vec<RequirementDetail>,
}

/// `(met + 0.5 * partial) / total * 100`, or `0.0` for an empty set.
pub fn alignment_score(met: usize, partial: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (met as f64 + PARTIAL_WEIGHT * partial as f64) / total as f64 * 100.0
}

/// `covered / total * 100`, or `0.0` for an empty set.
pub fn percentage(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    covered as f64 / total as f64 * 100.0
}

pub fn score_alignment(requirements: &[Identified], index: &CoverageIndex) -> AlignmentSummary {
    let mut statuses: BTreeMap<&str, RequirementStatus> = requirements
        .iter()
        .map(|req| (req.id.as_str(), RequirementStatus::Unmet))
        .collect();

    for file in &index.files {
        for id in &file.referenced_ids {
            if let Some(status) = statuses.get_mut(id.as_str()) {
                *status = status.upgrade(file.strength());
            }
        }
    }

    let mut summary = AlignmentSummary {
        total: requirements.len(),
        met: 0,
        partial: 0,
        unmet: 0,
        score: 0.0,
        gaps: Vec::new(),
        details: Vec::with_capacity(requirements.len()),
    };

    for req in requirements {
        let status = statuses
            .get(req.id.as_str())
            .copied()
            .unwrap_or(RequirementStatus::Unmet);
        match status {
            RequirementStatus::Met => summary.met += 1,
            RequirementStatus::Partial => summary.partial += 1,
            RequirementStatus::Unmet => summary.unmet += 1,
        }
        if status != RequirementStatus::Met {
            let reason = if status == RequirementStatus::Partial {
                REASON_PARTIAL
            } else {
                REASON_UNMET
            };
            summary.gaps.push(AlignmentGap {
                requirement_id: req.id.clone(),
                description: req.description.clone(),
                status,
                reason: reason.to_string(),
            });
        }
        summary.details.push(RequirementDetail {
            id: req.id.clone(),
            description: req.description.clone(),
            status,
            traced_by: index.files_referencing(&req.id).to_vec(),
        });
    }

    summary.score = alignment_score(summary.met, summary.partial, summary.total);
    summary
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    pub total: usize,
    pub covered_count: usize,
    pub uncovered: Vec<String>,
    pub percentage: f64,
    pub coverage_by_file: BTreeMap<String, Vec<String>>,
}

/// Binary coverage: a requirement is covered when any file references it.
pub fn score_coverage(requirements: &[Identified], index: &CoverageIndex) -> CoverageSummary {
    let uncovered = requirements
        .iter()
        .filter(|req| !index.is_covered(&req.id))
        .map(|req| req.id.clone())
        .collect::<Vec<_>>();
    let covered_count = requirements.len() - uncovered.len();
    CoverageSummary {
        total: requirements.len(),
        covered_count,
        uncovered,
        percentage: percentage(covered_count, requirements.len()),
        coverage_by_file: index.ids_by_file(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDetail {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub covered: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub covered_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummary {
    pub identified: usize,
    pub addressed: usize,
    pub unaddressed: Vec<String>,
    pub percentage: f64,
    pub details: Vec<RiskDetail>,
}

pub fn score_risks(risks: &[Identified], index: &CoverageIndex) -> RiskSummary {
    let details = risks
        .iter()
        .map(|risk| {
            let covered_by = index.files_referencing(&risk.id).to_vec();
            RiskDetail {
                id: risk.id.clone(),
                description: risk.description.clone(),
                covered: !covered_by.is_empty(),
                covered_by,
            }
        })
        .collect::<Vec<_>>();
    let unaddressed = details
        .iter()
        .filter(|detail| !detail.covered)
        .map(|detail| detail.id.clone())
        .collect::<Vec<_>>();
    let addressed = details.len() - unaddressed.len();
    RiskSummary {
        identified: details.len(),
        addressed,
        unaddressed,
        percentage: percentage(addressed, details.len()),
        details,
    }
}

/// Letter grade for a TDD compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 75.0 {
            Self::B
        } else if score >= 60.0 {
            Self::C
        } else if score >= 40.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted TDD score over code commits; test-only and non-code commits are
/// not part of the denominator.
pub fn compliance_score(test_first: usize, test_with: usize, test_after: usize, no_test: usize) -> f64 {
    let total = test_first + test_with + test_after + no_test;
    if total == 0 {
        return 0.0;
    }
    let points = test_first as f64 * TEST_FIRST_POINTS
        + test_with as f64 * TEST_WITH_POINTS
        + test_after as f64 * TEST_AFTER_POINTS
        + no_test as f64 * NO_TEST_POINTS;
    points / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::WorkItemFile;

    fn reqs(ids: &[&str]) -> Vec<Identified> {
        ids.iter()
            .map(|id| Identified {
                id: id.to_string(),
                description: format!("{id} description"),
            })
            .collect()
    }

    fn file(name: &str, ids: &[&str], complete: bool, partial: bool) -> WorkItemFile {
        WorkItemFile {
            name: name.to_string(),
            referenced_ids: ids.iter().map(|id| id.to_string()).collect(),
            is_complete: complete,
            is_partial: partial,
        }
    }

    fn index(files: Vec<WorkItemFile>) -> CoverageIndex {
        let mut references: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for f in &files {
            for id in &f.referenced_ids {
                references.entry(id.clone()).or_default().push(f.name.clone());
            }
        }
        for names in references.values_mut() {
            names.sort();
        }
        CoverageIndex {
            directories: vec!["stories".to_string()],
            files,
            references,
            scope_creep: Vec::new(),
            read_errors: Vec::new(),
        }
    }

    #[test]
    fn complete_story_tracing_everything_is_full_alignment() {
        let summary = score_alignment(
            &reqs(&["REQ-1", "REQ-2"]),
            &index(vec![file("story.md", &["REQ-1", "REQ-2"], true, false)]),
        );
        assert_eq!(summary.met, 2);
        assert_eq!(summary.score, 100.0);
        assert!(summary.gaps.is_empty());
    }

    #[test]
    fn mixed_statuses_score_half() {
        let summary = score_alignment(
            &reqs(&["REQ-1", "REQ-2", "REQ-3"]),
            &index(vec![
                file("a.md", &["REQ-1"], true, false),
                file("b.md", &["REQ-2"], false, true),
            ]),
        );
        assert_eq!((summary.met, summary.partial, summary.unmet), (1, 1, 1));
        assert_eq!(summary.score, 50.0);
        assert_eq!(summary.met + summary.partial + summary.unmet, summary.total);
        assert_eq!(summary.gaps.len(), 2);
        assert_eq!(summary.gaps[0].requirement_id, "REQ-2");
        assert_eq!(summary.gaps[0].reason, REASON_PARTIAL);
        assert_eq!(summary.gaps[1].requirement_id, "REQ-3");
        assert_eq!(summary.gaps[1].reason, REASON_UNMET);
    }

    #[test]
    fn met_never_regresses_regardless_of_file_order() {
        let requirements = reqs(&["REQ-1"]);
        let forward = score_alignment(
            &requirements,
            &index(vec![
                file("a.md", &["REQ-1"], true, false),
                file("b.md", &["REQ-1"], false, false),
            ]),
        );
        let backward = score_alignment(
            &requirements,
            &index(vec![
                file("b.md", &["REQ-1"], false, false),
                file("a.md", &["REQ-1"], true, false),
            ]),
        );
        assert_eq!(forward.details[0].status, RequirementStatus::Met);
        assert_eq!(backward.details[0].status, RequirementStatus::Met);
        assert_eq!(forward.details[0].traced_by, vec!["a.md", "b.md"]);
    }

    #[test]
    fn unmarked_story_counts_as_partial() {
        let summary = score_alignment(
            &reqs(&["REQ-1"]),
            &index(vec![file("a.md", &["REQ-1"], false, false)]),
        );
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.score, 50.0);
    }

    #[test]
    fn alignment_score_is_monotone_under_upgrades() {
        let total = 4;
        let unmet = alignment_score(1, 0, total);
        let partial = alignment_score(1, 1, total);
        let met = alignment_score(2, 0, total);
        assert!(unmet <= partial && partial <= met);
    }

    #[test]
    fn empty_sets_score_zero_not_nan() {
        let summary = score_alignment(&[], &index(Vec::new()));
        assert_eq!(summary.score, 0.0);
        let coverage = score_coverage(&[], &index(Vec::new()));
        assert_eq!(coverage.percentage, 0.0);
        assert!(!coverage.percentage.is_nan());
        let risks = score_risks(&[], &index(Vec::new()));
        assert_eq!(risks.percentage, 0.0);
        assert_eq!(compliance_score(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn coverage_ignores_status_weighting() {
        let summary = score_coverage(
            &reqs(&["REQ-1", "REQ-2", "REQ-3", "REQ-4"]),
            &index(vec![
                file("a.md", &["REQ-1"], false, false),
                file("b.md", &["REQ-3", "REQ-1"], false, true),
            ]),
        );
        assert_eq!(summary.covered_count, 2);
        assert_eq!(summary.uncovered, vec!["REQ-2", "REQ-4"]);
        assert_eq!(summary.percentage, 50.0);
        assert_eq!(
            summary.coverage_by_file.get("b.md").cloned().unwrap_or_default(),
            vec!["REQ-1", "REQ-3"]
        );
    }

    #[test]
    fn risks_list_every_covering_file() {
        let summary = score_risks(
            &reqs(&["R-1", "R-2", "R-3"]),
            &index(vec![
                file("story.md", &["R-1"], false, false),
                file("task.md", &["R-1", "R-3"], false, false),
            ]),
        );
        assert_eq!(summary.addressed, 2);
        assert_eq!(summary.unaddressed, vec!["R-2"]);
        assert_eq!(summary.details[0].covered_by, vec!["story.md", "task.md"]);
        assert!((summary.percentage - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(100.0), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.999), Grade::B);
        assert_eq!(Grade::from_score(75.0), Grade::B);
        assert_eq!(Grade::from_score(74.9), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::C);
        assert_eq!(Grade::from_score(40.0), Grade::D);
        assert_eq!(Grade::from_score(39.99), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn compliance_weights() {
        assert_eq!(compliance_score(1, 0, 0, 0), 100.0);
        assert_eq!(compliance_score(0, 1, 0, 0), 75.0);
        assert_eq!(compliance_score(0, 0, 1, 0), 25.0);
        assert_eq!(compliance_score(0, 0, 0, 1), 0.0);
        assert_eq!(compliance_score(1, 1, 1, 1), 50.0);
    }

    #[test]
    fn statuses_serialize_lowercase() {
        insta::assert_json_snapshot!(
            [RequirementStatus::Met, RequirementStatus::Partial, RequirementStatus::Unmet],
            @r###"
        [
          "met",
          "partial",
          "unmet"
        ]
        "###
        );
    }
}
