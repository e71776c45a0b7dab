pub mod alignment_check;
pub mod coverage_report;
pub mod tdd_compliance;
pub mod validate_risks;

/// Work-item directory flags shared by the traceability commands.
pub struct WorkItemDirs {
    pub stories: Option<String>,
    pub tasks: Option<String>,
    pub acceptance_criteria: Option<String>,
}

impl WorkItemDirs {
    /// Validated directories in scan order: stories, tasks, acceptance criteria.
    pub fn validated_or_exit(&self) -> Vec<String> {
        crate::support::work_dirs_or_exit(&[
            ("stories", self.stories.as_deref()),
            ("tasks", self.tasks.as_deref()),
            ("acceptance criteria", self.acceptance_criteria.as_deref()),
        ])
    }
}
