//! # plantrace-kernel
//!
//! Traceability analysis over planning artifacts: requirement and risk
//! identifiers are pulled out of loosely structured markdown, cross-referenced
//! against directories of work items, and turned into scores.
//!
//! ## Pipeline
//!
//! ```text
//! Rules                 ← compiled-once pattern tables (read-only)
//!     │
//! ids::extract          ← text → ordered, deduplicated canonical IDs
//!     │
//! coverage::resolve     ← directories of .md work items → ID → files
//!     │
//! scoring               ← alignment / coverage / risk percentages, grades
//! ```
//!
//! `file_kind` is shared with the commit classifier in `plantrace-tdd`.

pub mod coverage;
pub mod error;
pub mod file_kind;
pub mod ids;
pub mod input;
pub mod rules;
pub mod scoring;

pub use coverage::{
    CoverageIndex, DirectoryCoverage, TraceStrength, WorkItemFile, resolve_coverage,
    scan_directory, scan_work_item,
};
pub use error::TraceError;
pub use file_kind::{FileKind, FileKindRules, base_name};
pub use ids::{
    Extraction, IdDomain, Identified, OrderedIds, extract, extract_requirements, extract_risks,
    find_references, normalize,
};
pub use input::{read_input, validate_input_file, validate_work_dir};
pub use rules::{IdPatterns, RuleExtensions, Rules};
pub use scoring::{
    AlignmentGap, AlignmentSummary, CoverageSummary, Grade, REASON_PARTIAL, REASON_UNMET,
    RequirementDetail, RequirementStatus, RiskDetail, RiskSummary, alignment_score,
    compliance_score, percentage, score_alignment, score_coverage, score_risks,
};
