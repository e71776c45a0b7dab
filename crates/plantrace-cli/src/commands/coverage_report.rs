use super::WorkItemDirs;
use crate::support::{OutputMode, emit, print_list_block, read_input_or_exit};
use plantrace_kernel::{IdDomain, Rules, extract, resolve_coverage, score_coverage};
use serde::Serialize;
use std::collections::BTreeMap;

const CHECK_KIND: &str = "plantrace.coverage_report.v1";

pub struct Args {
    pub requirements: String,
    pub dirs: WorkItemDirs,
}

#[derive(Debug, Serialize)]
struct CoverageReportResult {
    check_kind: &'static str,
    total_requirements: usize,
    covered_count: usize,
    uncovered_requirements: Vec<String>,
    coverage_percentage: f64,
    coverage_by_story: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scope_creep: Vec<String>,
    requirements_file: String,
    work_item_directories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    read_errors: Vec<String>,
    parse_warnings: Vec<String>,
}

pub fn run(args: Args, rules: &Rules, mode: OutputMode) {
    let directories = args.dirs.validated_or_exit();
    let text = read_input_or_exit("requirements file", &args.requirements);

    let extraction = extract(&rules.ids, IdDomain::Requirement, &text);
    let index = resolve_coverage(
        &rules.ids,
        IdDomain::Requirement,
        &directories,
        &extraction.universe(),
    );
    let summary = score_coverage(&extraction.items, &index);

    tracing::info!(
        requirements = summary.total,
        covered = summary.covered_count,
        percentage = summary.percentage,
        "coverage report complete"
    );

    let result = CoverageReportResult {
        check_kind: CHECK_KIND,
        total_requirements: summary.total,
        covered_count: summary.covered_count,
        uncovered_requirements: summary.uncovered,
        coverage_percentage: summary.percentage,
        coverage_by_story: summary.coverage_by_file,
        scope_creep: index.scope_creep,
        requirements_file: args.requirements,
        work_item_directories: directories,
        read_errors: index.read_errors,
        parse_warnings: extraction.parse_warnings,
    };
    emit(&result, mode, render_text);
}

fn render_text(result: &CoverageReportResult) {
    println!("COVERAGE_REPORT:");
    println!("  Requirements: {}", result.requirements_file);
    println!("  Work item directories: {}", result.work_item_directories.join(", "));
    println!(
        "  Covered: {}/{} ({:.1}%)",
        result.covered_count, result.total_requirements, result.coverage_percentage
    );
    print_list_block("Uncovered requirements", &result.uncovered_requirements);
    if !result.coverage_by_story.is_empty() {
        println!("  Coverage by work item:");
        for (file, ids) in &result.coverage_by_story {
            println!("    - {file}: {}", ids.join(", "));
        }
    }
    print_list_block("Scope creep (no requirement references)", &result.scope_creep);
    print_list_block("Read errors", &result.read_errors);
    print_list_block("Parse warnings", &result.parse_warnings);
}
