//! Lint issue records and run accumulation.

use serde::{Deserialize, Serialize};

/// Element id recorded when an issue cannot be attributed to an element.
pub const FILE_LEVEL_SENTINEL: &str = "FileLevel";

/// Element id recorded for issues raised by a per-file processing failure.
pub const FATAL_SENTINEL: &str = "Fatal";

/// Rule attribution for issues raised by a per-file processing failure.
pub const INTERNAL_RULE: &str = "linter-internal";

/// Classification of a lint issue.
///
/// The counting rule is substring-based on the wire form: any category
/// containing `error` counts against the error total, everything else
/// against the warning total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    /// Rule violation at error severity
    Error,
    /// Rule violation at warning severity
    Warning,
    /// Recoverable problem reported by the model importer
    ImportWarning,
    /// Per-file processing failure (read, parse, or engine crash)
    InternalError,
}

impl IssueCategory {
    /// Wire form of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::ImportWarning => "import-warning",
            Self::InternalError => "internal-error",
        }
    }

    /// Whether this category counts against the error total.
    pub fn counts_as_error(self) -> bool {
        self.as_str().contains("error")
    }
}

/// A single issue produced while linting one file.
///
/// Immutable once created; collected into an ordered sequence for the run's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintIssue {
    /// Path of the linted file, as enumerated.
    pub file: String,
    /// Name of the rule (or importer/internal attribution) that raised this.
    pub rule: String,
    /// Id of the offending element, a sentinel, or absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Issue classification.
    pub category: IssueCategory,
}

/// Derived run totals, recomputed from the issue sequence at report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Number of files linted.
    pub total_files: usize,
    /// Issues whose category counts as an error.
    pub total_errors: usize,
    /// All remaining issues.
    pub total_warnings: usize,
}

/// Append-only issue sequence plus running counters for one run.
#[derive(Debug, Default)]
pub struct LintRun {
    /// Issues in the order they were produced.
    pub issues: Vec<LintIssue>,
    /// Running error count.
    pub total_errors: usize,
    /// Running warning count.
    pub total_warnings: usize,
}

impl LintRun {
    /// Record an issue and bump the matching counter.
    pub fn push(&mut self, issue: LintIssue) {
        if issue.category.counts_as_error() {
            self.total_errors += 1;
        } else {
            self.total_warnings += 1;
        }
        self.issues.push(issue);
    }

    /// Summary over `total_files` linted files.
    pub fn summary(&self, total_files: usize) -> RunSummary {
        RunSummary {
            total_files,
            total_errors: self.total_errors,
            total_warnings: self.total_warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(category: IssueCategory) -> LintIssue {
        LintIssue {
            file: "/tmp/order.bpmn".to_string(),
            rule: "label-required".to_string(),
            element_id: Some("Task_1".to_string()),
            message: "Element is missing label/name".to_string(),
            category,
        }
    }

    #[test]
    fn error_counting_is_substring_based() {
        assert!(IssueCategory::Error.counts_as_error());
        assert!(IssueCategory::InternalError.counts_as_error());
        assert!(!IssueCategory::Warning.counts_as_error());
        assert!(!IssueCategory::ImportWarning.counts_as_error());
    }

    #[test]
    fn run_counters_track_pushed_issues() {
        let mut run = LintRun::default();
        run.push(issue(IssueCategory::Error));
        run.push(issue(IssueCategory::Warning));
        run.push(issue(IssueCategory::ImportWarning));
        run.push(issue(IssueCategory::InternalError));

        let summary = run.summary(3);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.total_errors, 2);
        assert_eq!(summary.total_warnings, 2);
    }

    #[test]
    fn issue_serializes_with_wire_field_names() {
        let value = serde_json::to_value(issue(IssueCategory::ImportWarning)).unwrap();
        assert_eq!(value["elementId"], "Task_1");
        assert_eq!(value["category"], "import-warning");
        assert_eq!(value["file"], "/tmp/order.bpmn");
    }

    #[test]
    fn absent_element_id_is_omitted() {
        let mut without_id = issue(IssueCategory::Warning);
        without_id.element_id = None;
        let value = serde_json::to_value(without_id).unwrap();
        assert!(value.get("elementId").is_none());
    }
}
