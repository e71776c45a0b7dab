use crate::support::{OutputMode, emit, fail_or_exit, read_input_or_exit};
use plantrace_kernel::Rules;
use plantrace_tdd::{
    CommitRange, TddCompliance, assess_compliance, classify_commits, parse_commit_log,
};
use serde::Serialize;

const CHECK_KIND: &str = "plantrace.tdd_compliance.v1";

pub struct Args {
    pub content: Option<String>,
    pub log_file: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TddComplianceResult {
    check_kind: &'static str,
    #[serde(flatten)]
    compliance: TddCompliance,
    skipped_lines: usize,
}

pub fn run(args: Args, rules: &Rules, mode: OutputMode) {
    let range = CommitRange::parse(args.since.as_deref(), args.until.as_deref(), args.count)
        .unwrap_or_else(|err| fail_or_exit(&err.to_string()));
    let content = match (args.content, args.log_file) {
        (Some(content), _) => content,
        (None, Some(path)) => read_input_or_exit("log file", &path),
        (None, None) => fail_or_exit("tdd-compliance needs --content or --log-file"),
    };

    let log = parse_commit_log(&content);
    if log.skipped_lines > 0 {
        tracing::warn!(skipped = log.skipped_lines, "skipped malformed commit log lines");
    }
    let commits = range.apply(log.commits);
    let classified = classify_commits(&commits, &rules.files);
    let compliance = assess_compliance(&classified, &rules.files);

    let result = TddComplianceResult {
        check_kind: CHECK_KIND,
        compliance,
        skipped_lines: log.skipped_lines,
    };
    emit(&result, mode, render_text);
}

fn render_text(result: &TddComplianceResult) {
    let compliance = &result.compliance;
    let breakdown = &compliance.breakdown;
    println!("TDD_COMPLIANCE:");
    println!("  Total commits: {}", compliance.total_commits);
    println!("  Code commits: {}", compliance.total_code_commits);
    println!(
        "  Compliance score: {:.1} (grade {})",
        compliance.compliance_score, compliance.compliance_grade
    );
    if let Some(message) = &compliance.message {
        println!("  Note: {message}");
    }
    println!("  Breakdown:");
    println!("    test-first: {}", breakdown.test_first);
    println!("    test-with:  {}", breakdown.test_with);
    println!("    test-after: {}", breakdown.test_after);
    println!("    test-only:  {}", breakdown.test_only);
    println!("    no-test:    {}", breakdown.no_test);
    println!("    non-code:   {}", breakdown.non_code);
    if result.skipped_lines > 0 {
        println!("  Skipped malformed lines: {}", result.skipped_lines);
    }

    if !compliance.violations.is_empty() {
        println!("  Violations ({}):", compliance.violations_count);
        for violation in &compliance.violations {
            let short_hash = violation.commit_hash.get(..7).unwrap_or(&violation.commit_hash);
            println!(
                "    - [{}] {short_hash} {} ({}, {}): {}",
                violation.severity,
                violation.classification,
                violation.author,
                violation.date,
                violation.message
            );
            println!("      {}", violation.remediation);
        }
    }
}
