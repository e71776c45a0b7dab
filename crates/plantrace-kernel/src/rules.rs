//! Compiled-once pattern tables.
//!
//! Every regex the engine uses is compiled here, exactly once per process,
//! and handed to the parsing and classification functions by reference.
//! Nothing in this module is mutable after construction.

use crate::error::TraceError;
use crate::file_kind::FileKindRules;
use regex::Regex;
use serde::{Deserialize, Serialize};

const REQUIREMENT_INLINE: &str = r"(?i)\b(REQ(?:UIREMENT)?-\d+)\b";
// A bare number needs a separator after it, so `## 2FA support` is prose.
const REQUIREMENT_HEADING: &str = r"(?i)^#{1,6}\s+(?:(REQ(?:UIREMENT)?-\d+)\.?\s*[:\-]?\s*|(\d+)(?:\.|\s*[:\-])\s+)(.*?)\s*$";
const NUMBERED_ITEM: &str = r"^\s*(\d+)\.\s+(.+)";
const REQUIREMENT_LIKE: &str = r"(?i)\b(?:requirements?|must|shall|should)\b";

const RISK_INLINE: &str = r"(?i)\b(?:R-?\d+|Risk[\s-]*\d+)\b";
const RISK_SECTION: &str = r"(?i)^\s*#+\s*(?:Risk\s*Analysis|Potential\s*Risks)\s*$";
const RISK_TABLE_ROW: &str = r"(?i)\|\s*(R-?\d+|Risk[\s-]*\d+)[:\s]*([^|]*)";
const RISK_LIST_ITEM: &str = r"(?i)^\s*[-*+]\s+\*{0,2}(R-?\d+|Risk[\s-]*\d+)\*{0,2}[:\s]*(.*)";

const DIGITS: &str = r"\d+";
const STATUS_COMPLETE: &str = r"(?i)\bStatus\s*:\s*\**\s*(?:Complete|Done|Finished)\b";
const STATUS_PARTIAL: &str = r"(?i)\bStatus\s*:\s*\**\s*(?:Partial|In Progress|WIP)\b";

/// User-supplied additions to the built-in file-kind tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RuleExtensions {
    /// Extra regexes matched against a file's base name to mark it as a test.
    pub extra_test_patterns: Vec<String>,
    /// Extra extensions (without the dot) treated as implementation code.
    pub extra_code_extensions: Vec<String>,
    /// Extra regexes matched against a file's base name to mark it as non-code.
    pub extra_non_code_patterns: Vec<String>,
}

/// Identifier-extraction patterns for both ID domains.
#[derive(Debug, Clone)]
pub struct IdPatterns {
    pub requirement_inline: Regex,
    pub requirement_heading: Regex,
    pub numbered_item: Regex,
    pub requirement_like: Regex,
    pub risk_inline: Regex,
    pub risk_section: Regex,
    pub risk_table_row: Regex,
    pub risk_list_item: Regex,
    pub digits: Regex,
    pub status_complete: Regex,
    pub status_partial: Regex,
}

impl IdPatterns {
    pub fn new() -> Result<Self, TraceError> {
        Ok(Self {
            requirement_inline: compile(REQUIREMENT_INLINE)?,
            requirement_heading: compile(REQUIREMENT_HEADING)?,
            numbered_item: compile(NUMBERED_ITEM)?,
            requirement_like: compile(REQUIREMENT_LIKE)?,
            risk_inline: compile(RISK_INLINE)?,
            risk_section: compile(RISK_SECTION)?,
            risk_table_row: compile(RISK_TABLE_ROW)?,
            risk_list_item: compile(RISK_LIST_ITEM)?,
            digits: compile(DIGITS)?,
            status_complete: compile(STATUS_COMPLETE)?,
            status_partial: compile(STATUS_PARTIAL)?,
        })
    }
}

/// The complete read-only rule set shared by every component.
#[derive(Debug, Clone)]
pub struct Rules {
    pub ids: IdPatterns,
    pub files: FileKindRules,
}

impl Rules {
    /// Built-in tables only.
    pub fn new() -> Result<Self, TraceError> {
        Self::with_extensions(&RuleExtensions::default())
    }

    pub fn with_extensions(extensions: &RuleExtensions) -> Result<Self, TraceError> {
        Ok(Self {
            ids: IdPatterns::new()?,
            files: FileKindRules::with_extensions(extensions)?,
        })
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, TraceError> {
    Regex::new(pattern).map_err(|err| TraceError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}
