//! Error types for plantrace kernel operations.
//!
//! Only fatal conditions live here. Per-file read failures and parse
//! ambiguities are embedded in results as `read_errors` / `parse_warnings`.

/// Errors that abort an analysis before any parsing happens.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// A caller-supplied input path does not exist.
    #[error("{label} not found: {path}")]
    InputMissing { label: String, path: String },

    /// A caller-supplied work-item path exists but is not a directory.
    #[error("{label} path is not a directory: {path}")]
    NotADirectory { label: String, path: String },

    /// The primary input document could not be read.
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// A classification or identifier pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}
