use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plantrace",
    about = "Plantrace: requirement traceability and TDD compliance over planning artifacts",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (default: .plantrace/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log debug events to stderr (RUST_LOG overrides when set)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score how well stories, tasks and acceptance criteria trace back to requirements
    AlignmentCheck {
        /// Path to the requirements document
        #[arg(long)]
        requirements: String,

        /// Directory of story markdown files
        #[arg(long)]
        stories: String,

        /// Directory of task markdown files
        #[arg(long)]
        tasks: Option<String>,

        /// Directory of acceptance-criteria markdown files
        #[arg(long)]
        acceptance_criteria: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON with abbreviated keys
        #[arg(long)]
        min: bool,
    },

    /// Report which requirements are referenced by at least one work item
    CoverageReport {
        /// Path to the requirements document
        #[arg(long)]
        requirements: String,

        /// Directory of story markdown files
        #[arg(long)]
        stories: String,

        /// Directory of task markdown files
        #[arg(long)]
        tasks: Option<String>,

        /// Directory of acceptance-criteria markdown files
        #[arg(long)]
        acceptance_criteria: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON with abbreviated keys
        #[arg(long)]
        min: bool,
    },

    /// Check that every risk in a design document's risk section is addressed by a work item
    ValidateRisks {
        /// Path to the design document
        #[arg(long)]
        design: String,

        /// Directory of story markdown files
        #[arg(long)]
        stories: Option<String>,

        /// Directory of task markdown files
        #[arg(long)]
        tasks: Option<String>,

        /// Directory of acceptance-criteria markdown files
        #[arg(long)]
        acceptance_criteria: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON with abbreviated keys
        #[arg(long)]
        min: bool,
    },

    /// Classify commits by test ordering and grade TDD compliance
    TddCompliance {
        /// Inline commit log (`hash|author|date|message|file1,file2`, one per line)
        #[arg(long, conflicts_with = "log_file", required_unless_present = "log_file")]
        content: Option<String>,

        /// Path to a commit log file in the same format
        #[arg(long)]
        log_file: Option<String>,

        /// Only commits on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Only commits on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Keep only the N most recent commits (0 keeps all)
        #[arg(long)]
        count: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Compact JSON with abbreviated keys
        #[arg(long)]
        min: bool,
    },
}
