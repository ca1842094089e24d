//! File enumeration and the sequential lint executor.

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::{debug, error, info, warn};

use crate::core::config::LinterKind;
use crate::core::errors::{DiaglintError, Result};
use crate::core::issues::{
    IssueCategory, LintIssue, LintRun, FATAL_SENTINEL, FILE_LEVEL_SENTINEL, INTERNAL_RULE,
};
use crate::engine::linter::Linter;
use crate::model::parser;

/// Expand `pattern` into an absolute, sorted list of files to lint.
///
/// Path separators are normalized and dot-files are matched. An empty result
/// is a warning, not an error.
pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>> {
    debug!("Searching for files matching: \"{pattern}\"");
    let normalized = pattern.replace('\\', "/");

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let entries = glob::glob_with(&normalized, options)
        .map_err(|err| DiaglintError::pattern(format!("invalid glob pattern \"{pattern}\": {err}")))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(absolute_path(path)),
            Ok(_) => {}
            Err(err) => warn!("Skipping unreadable path while matching \"{pattern}\": {err}"),
        }
    }
    files.sort();
    files.dedup();

    if files.is_empty() {
        warn!("No files found matching the pattern: \"{pattern}\"");
    } else {
        debug!("Found {} files to lint.", files.len());
    }
    Ok(files)
}

fn absolute_path(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lint every file sequentially, one at a time.
///
/// Parse warnings are recorded as `import-warning` issues; any read or parse
/// failure is downgraded to a single `internal-error` issue for that file and
/// the run continues with the next one.
pub async fn lint_files(files: &[PathBuf], linter: &Linter, kind: LinterKind) -> LintRun {
    let mut run = LintRun::default();

    for file in files {
        let file_path = file.display().to_string();
        let file_name = file_label(file);

        debug!("- Parsing diagram: {file_name}");
        let content = match tokio::fs::read_to_string(file).await {
            Ok(content) => content,
            Err(err) => {
                record_internal_error(&mut run, &file_path, &file_name, &err.to_string());
                continue;
            }
        };

        let (model, parse_warnings) = match parser::parse(kind, &content) {
            Ok(parsed) => parsed,
            Err(err) => {
                record_internal_error(&mut run, &file_path, &file_name, &err.to_string());
                continue;
            }
        };

        for warning in &parse_warnings {
            let element_id = warning
                .element_id
                .clone()
                .unwrap_or_else(|| FILE_LEVEL_SENTINEL.to_string());
            debug!(
                "    - [import-warning] ({}) {element_id}: {}",
                kind.model_name(),
                warning.message
            );
            run.push(LintIssue {
                file: file_path.clone(),
                rule: kind.model_name().to_string(),
                element_id: Some(element_id),
                message: warning.message.clone(),
                category: IssueCategory::ImportWarning,
            });
        }

        info!(" - Linting diagram: {file_name}...");
        let report = linter.lint(&model);
        if report.is_empty() && parse_warnings.is_empty() {
            debug!("  No issues found.");
        }

        for (rule_name, findings) in report {
            for finding in findings {
                debug!(
                    "- [{}] ({rule_name}) {}: {}",
                    finding.category.as_str(),
                    finding.element_id.as_deref().unwrap_or("N/A"),
                    finding.message
                );
                run.push(LintIssue {
                    file: file_path.clone(),
                    rule: rule_name.clone(),
                    element_id: finding.element_id,
                    message: finding.message,
                    category: finding.category,
                });
            }
        }
    }

    run
}

fn record_internal_error(run: &mut LintRun, file_path: &str, file_name: &str, message: &str) {
    error!("A critical error occurred while processing [{file_name}]: {message}");
    run.push(LintIssue {
        file: file_path.to_string(),
        rule: INTERNAL_RULE.to_string(),
        element_id: Some(FATAL_SENTINEL.to_string()),
        message: message.to_string(),
        category: IssueCategory::InternalError,
    });
}
