use crate::config::{OutputConfig, PlantraceConfig, load_config};
use plantrace_kernel::{Rules, read_input, validate_work_dir};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::path::Path;

/// Exit code for fatal input and configuration errors.
pub const EXIT_FATAL: i32 = 2;

const KEY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("file", "f"),
    ("line", "l"),
    ("name", "n"),
    ("type", "t"),
    ("path", "p"),
    ("message", "msg"),
    ("status", "s"),
    ("value", "v"),
    ("key", "k"),
    ("result", "r"),
    ("error", "err"),
    ("success", "ok"),
    ("files", "fs"),
    ("matches", "m"),
    ("question", "q"),
    ("answer", "a"),
    ("occurrences", "o"),
    ("directories", "dirs"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
    MinimalJson,
}

impl OutputMode {
    /// `--min` implies JSON. Config defaults apply when no flag is given.
    pub fn resolve(json: bool, min: bool, config: OutputConfig) -> Self {
        if min || ((json || config.json) && config.minimal) {
            Self::MinimalJson
        } else if json || config.json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

fn exit_with(err: impl Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(EXIT_FATAL);
}

pub fn load_config_or_exit(explicit: Option<&str>) -> PlantraceConfig {
    load_config(explicit).unwrap_or_else(|err| exit_with(err))
}

pub fn rules_or_exit(config: &PlantraceConfig) -> Rules {
    Rules::with_extensions(&config.classification).unwrap_or_else(|err| exit_with(err))
}

pub fn read_input_or_exit(label: &str, path: &str) -> String {
    read_input(label, Path::new(path)).unwrap_or_else(|err| exit_with(err))
}

/// Validates every supplied work-item directory, in flag order.
pub fn work_dirs_or_exit(dirs: &[(&str, Option<&str>)]) -> Vec<String> {
    let mut valid = Vec::new();
    for &(label, dir) in dirs {
        let Some(dir) = dir else {
            continue;
        };
        validate_work_dir(label, Path::new(dir)).unwrap_or_else(|err| exit_with(err));
        valid.push(dir.to_string());
    }
    valid
}

pub fn fail_or_exit(message: &str) -> ! {
    exit_with(message)
}

/// Prints a command result in the selected mode; text rendering is the caller's.
pub fn emit<T, F>(result: &T, mode: OutputMode, render_text: F)
where
    T: Serialize,
    F: FnOnce(&T),
{
    match mode {
        OutputMode::Text => render_text(result),
        OutputMode::Json => {
            let rendered = serde_json::to_string_pretty(result)
                .unwrap_or_else(|err| exit_with(format!("failed to render result: {err}")));
            println!("{rendered}");
        }
        OutputMode::MinimalJson => {
            let value = serde_json::to_value(result)
                .unwrap_or_else(|err| exit_with(format!("failed to render result: {err}")));
            let compact = minimize(value).unwrap_or(Value::Object(Map::new()));
            let rendered = serde_json::to_string(&compact)
                .unwrap_or_else(|err| exit_with(format!("failed to render result: {err}")));
            println!("{rendered}");
        }
    }
}

/// Abbreviates object keys and drops nulls. Empty strings, arrays and
/// objects are kept: optional fields already skip themselves when empty, so
/// whatever is left is part of the result's fixed shape.
/// Returns `None` when the value itself is dropped.
pub fn minimize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(minimize).collect(),
        )),
        Value::Object(fields) => Some(Value::Object(
            fields
                .into_iter()
                .filter_map(|(key, value)| {
                    minimize(value).map(|value| (abbreviate(&key).to_string(), value))
                })
                .collect::<Map<_, _>>(),
        )),
        other => Some(other),
    }
}

fn abbreviate(key: &str) -> &str {
    KEY_ABBREVIATIONS
        .iter()
        .find(|(long, _)| *long == key)
        .map_or(key, |&(_, short)| short)
}

pub fn print_list_block(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {header}:");
    for item in items {
        println!("    - {item}");
    }
}
