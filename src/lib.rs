//! # Diaglint: BPMN/DMN Lint Automation Runner
//!
//! A CI/CD automation wrapper that lints BPMN and DMN diagram files and
//! emits formatted reports. The crate provides:
//!
//! - **Model Import**: XML diagram import into an element tree, with
//!   recoverable import warnings for malformed constructs
//! - **Rule Engine**: named ruleset resolution and rule evaluation, including
//!   dynamically staged custom rules
//! - **Plugin Staging**: translation of lintrc plugin references into
//!   package-manager dependency declarations, staging, and cleanup
//! - **Report Generation**: JSON, HTML, and JUnit XML reports plus a console
//!   summary for pipeline logs
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        CLI Layer                          │
//! ├───────────────────────────────────────────────────────────┤
//! │  Core          │  Model     │  Engine     │  I/O          │
//! │                │            │             │               │
//! │ • Config       │ • Element  │ • Linter    │ • Reports     │
//! │ • Runner       │ • Parser   │ • Rulesets  │               │
//! │ • Issues       │            │ • Dynamic   │  Plugin       │
//! │ • Errors       │            │             │ • Staging     │
//! │                │            │             │ • Install     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diaglint::core::config::{LinterKind, LintrcConfig};
//! use diaglint::core::runner::{find_files, lint_files};
//! use diaglint::engine::linter::{Linter, ResolveOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LintrcConfig::load(".bpmnlintrc".as_ref())?;
//!     let linter = Linter::from_config(LinterKind::Bpmn, &config, &ResolveOptions::default())?;
//!     let files = find_files("diagrams/**/*.bpmn")?;
//!     let run = lint_files(&files, &linter, LinterKind::Bpmn).await;
//!     println!("{} error(s)", run.total_errors);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

// Core orchestration modules
pub mod core {
    //! Configuration, error taxonomy, issue collection, and the lint runner.

    pub mod config;
    pub mod errors;
    pub mod issues;
    pub mod runner;
}

// Diagram object model
pub mod model {
    //! XML diagram import and the in-memory element tree.

    pub mod element;
    pub mod parser;
}

// Rule engine
pub mod engine {
    //! Ruleset resolution and rule evaluation.

    pub mod dynamic;
    pub mod linter;
    pub mod rules;
}

// Dynamic plugin preparation
pub mod plugin {
    //! Custom-rule staging, manifest handling, and dependency installation.

    pub mod install;
    pub mod manifest;
    pub mod staging;
}

// I/O and reporting
pub mod io {
    //! Report file generation.

    pub mod reports;
}

// Re-export primary types for convenience
pub use crate::core::config::{LinterKind, LintrcConfig, ReportFormat, Severity};
pub use crate::core::errors::{DiaglintError, Result};
pub use crate::core::issues::{IssueCategory, LintIssue, LintRun, RunSummary};
pub use crate::engine::linter::Linter;
pub use crate::io::reports::ReportGenerator;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
