use super::WorkItemDirs;
use crate::support::{OutputMode, emit, fail_or_exit, print_list_block, read_input_or_exit};
use plantrace_kernel::{IdDomain, RiskDetail, Rules, extract, resolve_coverage, score_risks};
use serde::Serialize;

const CHECK_KIND: &str = "plantrace.validate_risks.v1";

pub struct Args {
    pub design: String,
    pub dirs: WorkItemDirs,
}

#[derive(Debug, Serialize)]
struct ValidateRisksResult {
    check_kind: &'static str,
    risks_identified: usize,
    risks_addressed: usize,
    risks_unaddressed: Vec<String>,
    coverage_percentage: f64,
    risk_details: Vec<RiskDetail>,
    design_file: String,
    work_item_directories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    read_errors: Vec<String>,
}

pub fn run(args: Args, rules: &Rules, mode: OutputMode) {
    let directories = args.dirs.validated_or_exit();
    if directories.is_empty() {
        fail_or_exit(
            "validate-risks needs at least one of --stories, --tasks, --acceptance-criteria",
        );
    }
    let text = read_input_or_exit("design file", &args.design);

    let extraction = extract(&rules.ids, IdDomain::Risk, &text);
    let index = resolve_coverage(&rules.ids, IdDomain::Risk, &directories, &extraction.universe());
    let summary = score_risks(&extraction.items, &index);

    tracing::info!(
        risks = summary.identified,
        addressed = summary.addressed,
        percentage = summary.percentage,
        "risk validation complete"
    );

    let result = ValidateRisksResult {
        check_kind: CHECK_KIND,
        risks_identified: summary.identified,
        risks_addressed: summary.addressed,
        risks_unaddressed: summary.unaddressed,
        coverage_percentage: summary.percentage,
        risk_details: summary.details,
        design_file: args.design,
        work_item_directories: directories,
        read_errors: index.read_errors,
    };
    emit(&result, mode, render_text);
}

fn render_text(result: &ValidateRisksResult) {
    println!("RISK_VALIDATION:");
    println!("  Design: {}", result.design_file);
    println!("  Work item directories: {}", result.work_item_directories.join(", "));
    println!(
        "  Addressed: {}/{} ({:.1}%)",
        result.risks_addressed, result.risks_identified, result.coverage_percentage
    );
    if result.risks_identified == 0 {
        println!("  No risks found under a Risk Analysis or Potential Risks heading");
    }
    for detail in &result.risk_details {
        let marker = if detail.covered { "ok" } else { "MISSING" };
        if detail.covered_by.is_empty() {
            println!("    - {} [{marker}] {}", detail.id, detail.description);
        } else {
            println!(
                "    - {} [{marker}] {} <- {}",
                detail.id,
                detail.description,
                detail.covered_by.join(", ")
            );
        }
    }
    print_list_block("Unaddressed risks", &result.risks_unaddressed);
    print_list_block("Read errors", &result.read_errors);
}
