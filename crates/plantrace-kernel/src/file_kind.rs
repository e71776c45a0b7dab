//! File-kind classification shared by every component that reasons about
//! test versus implementation files.
//!
//! Classification looks only at the base name of a path. Test patterns are
//! checked before code patterns, so `auth_test.go` is a test and never code.

use std::ops::Range;

use crate::error::TraceError;
use crate::rules::{RuleExtensions, compile};
use regex::Regex;
use serde::{Deserialize, Serialize};

const TEST_PATTERNS: &[&str] = &[
    r"_test\.go$",
    r"\.test\.(ts|tsx|js|jsx)$",
    r"\.spec\.(ts|tsx|js|jsx)$",
    r"^test_.*\.py$",
    r"_test\.py$",
    r"Test\.java$",
    r"_test\.rs$",
    r"_test\.rb$",
    r"\.test\.rb$",
    r"_spec\.rb$",
];

const CODE_EXTENSIONS: &[&str] = &[
    "go", "ts", "tsx", "js", "jsx", "py", "java", "rs", "rb", "c", "cpp", "h", "hpp", "cs",
    "swift", "kt",
];

const NON_CODE_PATTERNS: &[&str] = &[
    r"\.md$",
    r"\.txt$",
    r"\.rst$",
    r"\.adoc$",
    r"LICENSE",
    r"CHANGELOG",
    r"\.gitignore$",
    r"\.editorconfig$",
];

/// What a single path in a commit represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Test,
    Code,
    NonCode,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct FileKindRules {
    test: Vec<Regex>,
    code: Regex,
    non_code: Vec<Regex>,
}

impl FileKindRules {
    pub fn new() -> Result<Self, TraceError> {
        Self::with_extensions(&RuleExtensions::default())
    }

    pub fn with_extensions(extensions: &RuleExtensions) -> Result<Self, TraceError> {
        let test = TEST_PATTERNS
            .iter()
            .copied()
            .chain(extensions.extra_test_patterns.iter().map(String::as_str))
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        let code_alternation = CODE_EXTENSIONS
            .iter()
            .copied()
            .chain(
                extensions
                    .extra_code_extensions
                    .iter()
                    .map(|ext| ext.trim_start_matches('.')),
            )
            .filter(|ext| !ext.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let code = compile(&format!(r"\.({code_alternation})$"))?;

        let non_code = NON_CODE_PATTERNS
            .iter()
            .copied()
            .chain(extensions.extra_non_code_patterns.iter().map(String::as_str))
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            test,
            code,
            non_code,
        })
    }

    pub fn is_test(&self, path: &str) -> bool {
        let base = base_name(path);
        self.test.iter().any(|re| re.is_match(base))
    }

    /// Byte range of the first test pattern found in a base name.
    pub fn test_marker(&self, base: &str) -> Option<Range<usize>> {
        self.test.iter().find_map(|re| re.find(base)).map(|found| found.range())
    }

    /// Implementation code: a code extension that is not itself a test.
    pub fn is_code(&self, path: &str) -> bool {
        !self.is_test(path) && self.code.is_match(base_name(path))
    }

    pub fn is_non_code(&self, path: &str) -> bool {
        let base = base_name(path);
        self.non_code.iter().any(|re| re.is_match(base))
    }

    pub fn classify(&self, path: &str) -> FileKind {
        if self.is_test(path) {
            FileKind::Test
        } else if self.is_code(path) {
            FileKind::Code
        } else if self.is_non_code(path) {
            FileKind::NonCode
        } else {
            FileKind::Unknown
        }
    }
}

/// Final path component, accepting both `/` and `\` separators.
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
