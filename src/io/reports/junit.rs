//! JUnit XML report emission.
//!
//! One test-suite per run, one test-case per linted file. A file with at
//! least one issue carries a single failure element concatenating all of its
//! issue messages; a clean file yields a passing test-case.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::config::LinterKind;
use crate::core::issues::{LintIssue, LintRun};
use crate::io::reports::error::ReportError;

/// Render the run as JUnit XML.
pub fn render(kind: LinterKind, run: &LintRun, files: &[PathBuf]) -> Result<Vec<u8>, ReportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let failing = files
        .iter()
        .filter(|file| !issues_for(run, file).is_empty())
        .count();

    let mut suites = BytesStart::new("testsuites");
    suites.push_attribute(("tests", files.len().to_string().as_str()));
    suites.push_attribute(("failures", failing.to_string().as_str()));
    writer.write_event(Event::Start(suites))?;

    let mut suite = BytesStart::new("testsuite");
    suite.push_attribute(("name", format!("{kind}-lint-report").as_str()));
    suite.push_attribute(("tests", files.len().to_string().as_str()));
    suite.push_attribute(("failures", failing.to_string().as_str()));
    suite.push_attribute(("time", "0"));
    writer.write_event(Event::Start(suite))?;

    let case_name = format!("{} Linting", kind.prefix().to_uppercase());
    for file in files {
        let issues = issues_for(run, file);

        let mut case = BytesStart::new("testcase");
        case.push_attribute(("classname", file.display().to_string().as_str()));
        case.push_attribute(("name", case_name.as_str()));

        if issues.is_empty() {
            writer.write_event(Event::Empty(case))?;
        } else {
            writer.write_event(Event::Start(case))?;

            let mut failure = BytesStart::new("failure");
            failure.push_attribute(("message", format!("{} lint issue(s)", issues.len()).as_str()));
            writer.write_event(Event::Start(failure))?;

            let details: Vec<String> = issues
                .iter()
                .map(|issue| {
                    format!(
                        "[{}] ({}) {}: {}",
                        issue.category.as_str(),
                        issue.rule,
                        issue.element_id.as_deref().unwrap_or("N/A"),
                        issue.message
                    )
                })
                .collect();
            writer.write_event(Event::Text(BytesText::new(&details.join("\n"))))?;

            writer.write_event(Event::End(BytesEnd::new("failure")))?;
            writer.write_event(Event::End(BytesEnd::new("testcase")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    Ok(writer.into_inner())
}

fn issues_for<'a>(run: &'a LintRun, file: &Path) -> Vec<&'a LintIssue> {
    let file = file.display().to_string();
    run.issues.iter().filter(|issue| issue.file == file).collect()
}
