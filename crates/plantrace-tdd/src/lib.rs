//! # plantrace-tdd
//!
//! Test-driven-development compliance over a pre-gathered commit history.
//!
//! Commits arrive oldest first as pipe-delimited lines. Each is classified
//! from its own file list, then revisited against the history: code that
//! landed after its conventionally named test counts as test-first, code
//! whose test only shows up later counts as test-after.
//!
//! ```text
//! parse_commit_log → CommitRange::apply → classify_static
//!     → reclassify_temporal → assess_compliance
//! ```

pub mod classify;
pub mod commit;
pub mod compliance;
pub mod pairing;

pub use classify::{
    ClassifiedCommit, TddClassification, classify_commits, classify_static, reclassify_temporal,
};
pub use commit::{CommitLog, CommitLogError, CommitRange, CommitRecord, parse_commit_log};
pub use compliance::{
    MESSAGE_NO_CODE_COMMITS, MESSAGE_NO_COMMITS, Severity, TddBreakdown, TddCompliance,
    TddViolation, assess_compliance, remediation, truncate_message,
};
pub use pairing::{implementation_for_test, paired_implementation, suggest_test_file};
