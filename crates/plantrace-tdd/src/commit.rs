//! Commit records and the pipe-delimited log format they are read from.
//!
//! One commit per line: `hash|author|date|message|file1,file2,...`. This is
//! the shape of `git log --pretty=format:%H|%an|%aI|%s` joined with a file
//! list; gathering it is the caller's job.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

const MIN_FIELDS: usize = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
    pub files: Vec<String>,
}

impl CommitRecord {
    /// Calendar date of the commit, from RFC 3339 or `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|stamp| stamp.date_naive())
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
    }

    /// Instant of the commit; bare dates count as midnight UTC.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|stamp| stamp.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .ok()
                    .map(|day| day.and_time(NaiveTime::MIN).and_utc())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitLog {
    pub commits: Vec<CommitRecord>,
    /// Non-blank lines with fewer than five fields.
    pub skipped_lines: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CommitLogError {
    #[error("invalid {flag} date `{value}`: expected YYYY-MM-DD")]
    InvalidDate { flag: String, value: String },

    #[error("--since {since} is after --until {until}")]
    EmptyRange { since: NaiveDate, until: NaiveDate },
}

/// Parses a commit log. Malformed lines are counted and skipped.
///
/// Hash, author and date are the first three fields and the file list is
/// the last; anything in between is the message, so messages may contain `|`.
pub fn parse_commit_log(content: &str) -> CommitLog {
    let mut log = CommitLog::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts = line.split('|').collect::<Vec<_>>();
        if parts.len() < MIN_FIELDS {
            tracing::debug!(line, "skipping commit line with too few fields");
            log.skipped_lines += 1;
            continue;
        }
        let last = parts.len() - 1;
        let files = parts[last]
            .split(',')
            .map(str::trim)
            .filter(|file| !file.is_empty())
            .map(str::to_string)
            .collect();
        log.commits.push(CommitRecord {
            hash: parts[0].trim().to_string(),
            author: parts[1].trim().to_string(),
            date: parts[2].trim().to_string(),
            message: parts[3..last].join("|").trim().to_string(),
            files,
        });
    }
    log
}

/// Date window and size cap applied before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub count: Option<usize>,
}

impl CommitRange {
    pub fn parse(
        since: Option<&str>,
        until: Option<&str>,
        count: Option<usize>,
    ) -> Result<Self, CommitLogError> {
        let since = since.map(|value| parse_flag_date("--since", value)).transpose()?;
        let until = until.map(|value| parse_flag_date("--until", value)).transpose()?;
        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(CommitLogError::EmptyRange { since, until });
            }
        }
        Ok(Self {
            since,
            until,
            // Zero means no cap.
            count: count.filter(|&count| count > 0),
        })
    }

    /// Keeps commits inside the inclusive date window (commits with an
    /// unparseable date are kept), then the `count` most recent of those.
    /// Input order is preserved.
    pub fn apply(&self, commits: Vec<CommitRecord>) -> Vec<CommitRecord> {
        let mut kept = commits
            .into_iter()
            .filter(|commit| self.contains(commit))
            .collect::<Vec<_>>();
        if let Some(count) = self.count {
            if kept.len() > count {
                kept.drain(..kept.len() - count);
            }
        }
        kept
    }

    fn contains(&self, commit: &CommitRecord) -> bool {
        let Some(date) = commit.calendar_date() else {
            return true;
        };
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }
}

fn parse_flag_date(flag: &str, value: &str) -> Result<NaiveDate, CommitLogError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CommitLogError::InvalidDate {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}
