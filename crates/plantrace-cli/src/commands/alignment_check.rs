use super::WorkItemDirs;
use crate::support::{OutputMode, emit, print_list_block, read_input_or_exit};
use plantrace_kernel::{
    AlignmentGap, IdDomain, RequirementDetail, Rules, extract, resolve_coverage, score_alignment,
};
use serde::Serialize;

const CHECK_KIND: &str = "plantrace.alignment_check.v1";

pub struct Args {
    pub requirements: String,
    pub dirs: WorkItemDirs,
}

#[derive(Debug, Serialize)]
struct AlignmentCheckResult {
    check_kind: &'static str,
    total_requirements: usize,
    requirements_met: usize,
    requirements_partial: usize,
    requirements_unmet: usize,
    alignment_score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    gaps: Vec<AlignmentGap>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    scope_creep: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requirement_details: Vec<RequirementDetail>,
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
    let summary = score_alignment(&extraction.items, &index);

    tracing::info!(
        requirements = summary.total,
        met = summary.met,
        partial = summary.partial,
        score = summary.score,
        "alignment check complete"
    );

    let result = AlignmentCheckResult {
        check_kind: CHECK_KIND,
        total_requirements: summary.total,
        requirements_met: summary.met,
        requirements_partial: summary.partial,
        requirements_unmet: summary.unmet,
        alignment_score: summary.score,
        gaps: summary.gaps,
        scope_creep: index.scope_creep,
        requirement_details: summary.details,
        requirements_file: args.requirements,
        work_item_directories: directories,
        read_errors: index.read_errors,
        parse_warnings: extraction.parse_warnings,
    };
    emit(&result, mode, render_text);
}

fn render_text(result: &AlignmentCheckResult) {
    println!("ALIGNMENT_CHECK:");
    println!("  Requirements: {}", result.requirements_file);
    println!("  Work item directories: {}", result.work_item_directories.join(", "));
    println!("  Total requirements: {}", result.total_requirements);
    println!(
        "  Met: {}  Partial: {}  Unmet: {}",
        result.requirements_met, result.requirements_partial, result.requirements_unmet
    );
    println!("  Alignment score: {:.1}%", result.alignment_score);

    if !result.gaps.is_empty() {
        println!("  Gaps:");
        for gap in &result.gaps {
            if gap.description.is_empty() {
                println!("    - {} [{}]: {}", gap.requirement_id, gap.status, gap.reason);
            } else {
                println!(
                    "    - {} [{}] {}: {}",
                    gap.requirement_id, gap.status, gap.description, gap.reason
                );
            }
        }
    }
    print_list_block("Scope creep (no requirement references)", &result.scope_creep);
    print_list_block("Read errors", &result.read_errors);
    print_list_block("Parse warnings", &result.parse_warnings);
}
