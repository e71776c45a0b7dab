//! Fatal input validation, run before any parsing.

use crate::error::TraceError;
use std::fs;
use std::path::Path;

/// Fails unless `path` exists. `label` names the input in the error message.
pub fn validate_input_file(label: &str, path: &Path) -> Result<(), TraceError> {
    if !path.exists() {
        return Err(TraceError::InputMissing {
            label: label.to_string(),
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Fails unless `path` exists and is a directory.
pub fn validate_work_dir(label: &str, path: &Path) -> Result<(), TraceError> {
    if !path.exists() {
        return Err(TraceError::InputMissing {
            label: format!("{label} directory"),
            path: path.display().to_string(),
        });
    }
    if !path.is_dir() {
        return Err(TraceError::NotADirectory {
            label: label.to_string(),
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Validates and reads a primary input document.
pub fn read_input(label: &str, path: &Path) -> Result<String, TraceError> {
    validate_input_file(label, path)?;
    fs::read_to_string(path).map_err(|err| TraceError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
