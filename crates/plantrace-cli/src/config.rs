//! Optional TOML configuration.

use plantrace_kernel::RuleExtensions;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = ".plantrace/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantraceConfig {
    pub classification: RuleExtensions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub json: bool,
    pub minimal: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read config file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads the explicit config path, or the default path when it exists.
/// A missing default file yields the default config.
pub fn load_config(explicit: Option<&str>) -> Result<PlantraceConfig, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !Path::new(path).exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_string(),
                });
            }
            path
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH,
        None => return Ok(PlantraceConfig::default()),
    };
    tracing::debug!(path, "loading config");
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_string(),
        source,
    })?;
    parse_config(path, &text)
}

pub fn parse_config(path: &str, text: &str) -> Result<PlantraceConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::ParseToml {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_classification_and_output_tables() {
        let config = parse_config(
            "inline.toml",
            r#"
[classification]
extra_test_patterns = ['\.it\.ts$']
extra_code_extensions = ["scala"]

[output]
json = true
"#,
        )
        .expect("config should parse");
        assert_eq!(config.classification.extra_test_patterns, vec![r"\.it\.ts$"]);
        assert_eq!(config.classification.extra_code_extensions, vec!["scala"]);
        assert!(config.classification.extra_non_code_patterns.is_empty());
        assert!(config.output.json);
        assert!(!config.output.minimal);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(
            parse_config("empty.toml", "").expect("empty config should parse"),
            PlantraceConfig::default()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("bad.toml", "[output]\ncolour = true\n").expect_err("unknown key");
        assert!(err.to_string().contains("bad.toml"));

        let err = parse_config("bad.toml", "[reporting]\n").expect_err("unknown table");
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing.display().to_string())).expect_err("missing config");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\nminimal = true\n").expect("config written");
        let config = load_config(Some(&path.display().to_string())).expect("config loads");
        assert!(config.output.minimal);
    }
}
