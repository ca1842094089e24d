//! Console report display.

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

use diaglint::core::issues::LintRun;

/// Print the per-issue lines (when enabled) and the footer summary.
pub fn print_console_report(run: &LintRun, files: &[PathBuf], show_console_table: bool) {
    if show_console_table && !run.issues.is_empty() {
        for issue in &run.issues {
            let label = if issue.category.counts_as_error() {
                format!("{}", " \u{274c} Error".bright_red())
            } else {
                format!("{}", " \u{26a0}\u{fe0f} Warning".bright_yellow())
            };
            let file = file_label(Path::new(&issue.file));
            println!(
                "{label} {} \u{203a} {}: {} {}",
                file.cyan(),
                issue.element_id.as_deref().unwrap_or("N/A"),
                issue.message,
                format!("({})", issue.rule).bright_black()
            );
        }
    }

    println!("{}", "-".repeat(60).bright_black());
    println!(
        "{} | Files: {} | Errors: {} | Warnings: {}",
        "LINT RESULTS".bold(),
        files.len(),
        run.total_errors.bright_red().bold(),
        run.total_warnings.bright_yellow().bold()
    );
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
