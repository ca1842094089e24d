//! Report generation with template engine support.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use handlebars::Handlebars;
use serde::Serialize;

use crate::core::config::{LinterKind, ReportFormat};
use crate::core::issues::{LintIssue, LintRun, RunSummary};
use crate::io::reports::error::ReportError;
use crate::io::reports::junit;

const HTML_TEMPLATE_NAME: &str = "lint_report";

/// Working-directory template that overrides the embedded default.
const TEMPLATE_OVERRIDE_PATH: &str = "templates/lint_report.hbs";

/// Wire shape of the JSON report.
#[derive(Serialize)]
struct JsonReport<'a> {
    summary: RunSummary,
    issues: &'a [LintIssue],
}

#[derive(Serialize)]
struct HtmlIssue<'a> {
    severity_label: String,
    severity_class: &'static str,
    icon: &'static str,
    file: &'a str,
    element_id: &'a str,
    rule: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct HtmlReport<'a> {
    title: &'static str,
    generated_at: String,
    summary: RunSummary,
    issue_count: usize,
    has_issues: bool,
    issues: Vec<HtmlIssue<'a>>,
}

/// Renders the aggregated issues into exactly one report file.
#[derive(Debug)]
pub struct ReportGenerator {
    handlebars: Handlebars<'static>,
    kind: LinterKind,
}

impl ReportGenerator {
    /// Build a generator for the given linter type, registering the embedded
    /// HTML template and, when present, the working-directory override.
    pub fn new(kind: LinterKind) -> Self {
        let mut handlebars = Handlebars::new();
        if let Err(err) = handlebars
            .register_template_string(HTML_TEMPLATE_NAME, include_str!("./lint_report.hbs"))
        {
            eprintln!("Failed to register fallback HTML template: {}", err);
        }

        let override_path = Path::new(TEMPLATE_OVERRIDE_PATH);
        if override_path.exists() {
            if let Err(err) = handlebars.register_template_file(HTML_TEMPLATE_NAME, override_path)
            {
                eprintln!("Failed to load external template: {}", err);
            }
        }

        Self { handlebars, kind }
    }

    /// Final report path for an output stem: `<stem>.<ext>`, resolved against
    /// the working directory.
    pub fn output_path(stem: &Path, format: ReportFormat) -> PathBuf {
        let mut name = OsString::from(stem.as_os_str());
        name.push(".");
        name.push(format.extension());
        let path = PathBuf::from(name);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&path))
                .unwrap_or(path)
        }
    }

    /// Write the report for `run` to `output_path`, creating the parent
    /// directory if absent.
    pub fn generate(
        &self,
        run: &LintRun,
        files: &[PathBuf],
        format: ReportFormat,
        output_path: &Path,
    ) -> Result<(), ReportError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = match format {
            ReportFormat::Json => self.render_json(run, files)?.into_bytes(),
            ReportFormat::Html => self.render_html(run, files)?.into_bytes(),
            ReportFormat::Junit => junit::render(self.kind, run, files)?,
        };
        fs::write(output_path, content)?;
        Ok(())
    }

    fn render_json(&self, run: &LintRun, files: &[PathBuf]) -> Result<String, ReportError> {
        let report = JsonReport {
            summary: run.summary(files.len()),
            issues: &run.issues,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn render_html(&self, run: &LintRun, files: &[PathBuf]) -> Result<String, ReportError> {
        let issues: Vec<HtmlIssue<'_>> = run.issues.iter().map(html_issue).collect();
        let report = HtmlReport {
            title: self.kind.report_title(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            summary: run.summary(files.len()),
            issue_count: run.issues.len(),
            has_issues: !run.issues.is_empty(),
            issues,
        };
        Ok(self.handlebars.render(HTML_TEMPLATE_NAME, &report)?)
    }
}

/// Two-level severity classification for the HTML table.
fn html_issue(issue: &LintIssue) -> HtmlIssue<'_> {
    let category = issue.category.as_str();
    let (severity_label, severity_class, icon) = if category.contains("error") {
        ("Error".to_string(), "severity-error", "\u{274c}")
    } else if category.contains("warn") {
        ("Warning".to_string(), "severity-warning", "\u{26a0}\u{fe0f}")
    } else {
        (category.to_string(), "", "")
    };

    HtmlIssue {
        severity_label,
        severity_class,
        icon,
        file: &issue.file,
        element_id: issue.element_id.as_deref().unwrap_or("N/A"),
        rule: &issue.rule,
        message: &issue.message,
    }
}
