//! Plantrace CLI: the `plantrace` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use commands::WorkItemDirs;
use support::OutputMode;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = support::load_config_or_exit(cli.config.as_deref());
    let rules = support::rules_or_exit(&config);

    match cli.command {
        Commands::AlignmentCheck {
            requirements,
            stories,
            tasks,
            acceptance_criteria,
            json,
            min,
        } => commands::alignment_check::run(
            commands::alignment_check::Args {
                requirements,
                dirs: WorkItemDirs {
                    stories: Some(stories),
                    tasks,
                    acceptance_criteria,
                },
            },
            &rules,
            OutputMode::resolve(json, min, config.output),
        ),

        Commands::CoverageReport {
            requirements,
            stories,
            tasks,
            acceptance_criteria,
            json,
            min,
        } => commands::coverage_report::run(
            commands::coverage_report::Args {
                requirements,
                dirs: WorkItemDirs {
                    stories: Some(stories),
                    tasks,
                    acceptance_criteria,
                },
            },
            &rules,
            OutputMode::resolve(json, min, config.output),
        ),

        Commands::ValidateRisks {
            design,
            stories,
            tasks,
            acceptance_criteria,
            json,
            min,
        } => commands::validate_risks::run(
            commands::validate_risks::Args {
                design,
                dirs: WorkItemDirs {
                    stories,
                    tasks,
                    acceptance_criteria,
                },
            },
            &rules,
            OutputMode::resolve(json, min, config.output),
        ),

        Commands::TddCompliance {
            content,
            log_file,
            since,
            until,
            count,
            json,
            min,
        } => commands::tdd_compliance::run(
            commands::tdd_compliance::Args {
                content,
                log_file,
                since,
                until,
                count,
            },
            &rules,
            OutputMode::resolve(json, min, config.output),
        ),
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
