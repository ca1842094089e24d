//! CLI Argument Structures
//!
//! All CLI argument definitions and the value enums mapping onto the
//! library's configuration types.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use diaglint::core::config::{LinterKind, ReportFormat, Severity};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BPMN/DMN lint automation runner
#[derive(Parser)]
#[command(name = "diaglint")]
#[command(version = VERSION)]
#[command(about = "Lint BPMN/DMN diagram files and emit CI-friendly reports")]
#[command(long_about = "
Lint BPMN and DMN diagram files matching a glob pattern and write a report
for CI/CD pipelines.

Common Usage:

  # Lint every BPMN diagram under ./diagrams with the default config
  diaglint \"diagrams/**/*.bpmn\" --type bpmn

  # DMN diagrams with an explicit config and a JUnit report
  diaglint \"decisions/*.dmn\" -t dmn -c config/.dmnlintrc -f junit

  # Stage custom rules and install their dependencies
  diaglint \"diagrams/*.bpmn\" -t bpmn -r ./my-rules -i -s error

The exit code is non-zero when any lint error was found, so the command can
gate a pipeline directly.
")]
pub struct Cli {
    /// Glob pattern of files to lint (e.g. "diagrams/*.bpmn")
    pub pattern: String,

    /// Type of linter to use
    #[arg(short = 't', long = "type", value_enum)]
    pub linter_type: LinterType,

    /// Path to the lintrc configuration file (default: .bpmnlintrc/.dmnlintrc)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path stem for the report file; the extension is added automatically
    #[arg(short, long, default_value = "lint-report", env = "REPORT_FILEPATH")]
    pub output: PathBuf,

    /// Format for the report
    #[arg(short, long, value_enum, default_value = "json", env = "REPORT_FORMAT")]
    pub format: ReportFormatArg,

    /// Directory containing custom rule files to stage for this run
    #[arg(short = 'r', long)]
    pub custom_rules_path: Option<PathBuf>,

    /// Severity applied to the dynamically loaded custom rules
    #[arg(short = 's', long, value_enum, default_value = "warn")]
    pub custom_rules_severity: CustomRuleSeverity,

    /// Automatically install dependencies declared by the custom rules.
    /// Use with caution in untrusted environments.
    #[arg(short = 'i', long)]
    pub install_custom_deps: bool,

    /// Enable detailed logging for each step
    #[arg(short, long, env = "VERBOSE")]
    pub verbose: bool,

    /// Show one line per issue on the console
    #[arg(
        long,
        alias = "table",
        env = "CONSOLE_TABLE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub show_console_table: bool,
}

/// Linter type selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LinterType {
    /// BPMN process diagrams
    Bpmn,
    /// DMN decision diagrams
    Dmn,
}

impl LinterType {
    /// The library-side linter kind.
    pub fn kind(self) -> LinterKind {
        match self {
            Self::Bpmn => LinterKind::Bpmn,
            Self::Dmn => LinterKind::Dmn,
        }
    }
}

/// Report format selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormatArg {
    /// Pretty-printed JSON report
    Json,
    /// Static HTML report
    Html,
    /// JUnit XML report (written with the xml extension)
    Junit,
}

impl ReportFormatArg {
    /// The library-side report format.
    pub fn report_format(self) -> ReportFormat {
        match self {
            Self::Json => ReportFormat::Json,
            Self::Html => ReportFormat::Html,
            Self::Junit => ReportFormat::Junit,
        }
    }
}

/// Severity option for dynamically loaded custom rules.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CustomRuleSeverity {
    /// Disable custom rules
    Off,
    /// Report custom-rule violations as warnings
    Warn,
    /// Report custom-rule violations as errors
    Error,
}

impl CustomRuleSeverity {
    /// The library-side severity.
    pub fn severity(self) -> Severity {
        match self {
            Self::Off => Severity::Off,
            Self::Warn => Severity::Warn,
            Self::Error => Severity::Error,
        }
    }
}
