//! Linter types and lintrc configuration handling.
//!
//! The linter type is an enumerated variant carrying every per-type default
//! (engine name, config file name, report title, default plugin
//! dependencies), so no component dispatches on strings. The lintrc file is
//! the standard JSON rule-configuration format: an ordered `extends` list of
//! ruleset/plugin identifiers plus a `rules` map of per-rule severity
//! overrides.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::core::errors::{DiaglintError, Result};

/// Identifier of the built-in dynamic rules plugin in `extends` entries.
pub const DYNAMIC_PLUGIN_NAME: &str = "dynamic-rules";

/// Suffix of a revised configuration file that takes precedence over the
/// configured path when present next to it.
const REVISED_SUFFIX: &str = "Revised";

/// The linter type selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinterKind {
    /// BPMN 2.0 process diagrams
    Bpmn,
    /// DMN decision diagrams
    Dmn,
}

impl LinterKind {
    /// Namespace prefix used for canonical element type names.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Bpmn => "bpmn",
            Self::Dmn => "dmn",
        }
    }

    /// Name of the rule engine this type selects.
    pub fn engine_name(self) -> &'static str {
        match self {
            Self::Bpmn => "bpmnlint",
            Self::Dmn => "dmnlint",
        }
    }

    /// Rule attribution used for import warnings emitted by the model layer.
    pub fn model_name(self) -> &'static str {
        match self {
            Self::Bpmn => "bpmn-model",
            Self::Dmn => "dmn-model",
        }
    }

    /// Default rule-configuration file name for this type.
    pub fn default_config_file(self) -> &'static str {
        match self {
            Self::Bpmn => ".bpmnlintrc",
            Self::Dmn => ".dmnlintrc",
        }
    }

    /// Title used by the HTML report.
    pub fn report_title(self) -> &'static str {
        match self {
            Self::Bpmn => "BPMN Lint Report",
            Self::Dmn => "DMN Lint Report",
        }
    }

    /// Default dependency declarations staged into the dynamic plugin
    /// manifest when the custom rules directory carries none of its own.
    pub fn default_dependencies(self) -> IndexMap<String, String> {
        let pairs: &[(&str, &str)] = match self {
            Self::Bpmn => &[("bpmnlint", "^11.6.0"), ("bpmnlint-utils", "^1.1.1")],
            Self::Dmn => &[("dmnlint", "*"), ("dmnlint-utils", "*")],
        };
        pairs
            .iter()
            .map(|(name, version)| (name.to_string(), version.to_string()))
            .collect()
    }
}

impl fmt::Display for LinterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Severity assigned to a rule.
///
/// Lintrc files express severities either as strings (`"off"`, `"warn"`,
/// `"error"`) or as the numeric levels `0`/`1`/`2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Rule is disabled and excluded from the run.
    Off,
    /// Violations are reported as warnings.
    Warn,
    /// Violations are reported as errors and drive the exit code.
    Error,
}

impl Severity {
    /// Canonical string form, matching the lintrc convention.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SeverityVisitor;

        impl Visitor<'_> for SeverityVisitor {
            type Value = Severity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"off\", \"warn\", \"error\", or a level 0-2")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Severity, E> {
                match value {
                    "off" => Ok(Severity::Off),
                    "warn" | "warning" => Ok(Severity::Warn),
                    "error" => Ok(Severity::Error),
                    other => Err(E::custom(format!("invalid severity \"{other}\""))),
                }
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Severity, E> {
                match value {
                    0 => Ok(Severity::Off),
                    1 => Ok(Severity::Warn),
                    2 => Ok(Severity::Error),
                    other => Err(E::custom(format!("invalid severity level {other}"))),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Severity, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("invalid severity level {value}")))
                    .and_then(|v| self.visit_u64(v))
            }
        }

        deserializer.deserialize_any(SeverityVisitor)
    }
}

/// A loaded lintrc rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintrcConfig {
    /// Ordered ruleset/plugin identifiers to extend.
    #[serde(default)]
    pub extends: Vec<String>,

    /// Per-rule severity overrides, in file order.
    #[serde(default)]
    pub rules: IndexMap<String, Severity>,
}

impl LintrcConfig {
    /// Load a lintrc configuration from `path`.
    ///
    /// A sibling file named `<path>Revised` takes precedence when present.
    /// Any load or parse failure is a fatal configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let resolved = resolve_config_path(path);
        debug!("Loading configuration from: {}", resolved.display());

        let content = std::fs::read_to_string(&resolved).map_err(|err| {
            DiaglintError::config(format!(
                "Could not load the configuration file at \"{}\": {err}",
                resolved.display()
            ))
        })?;

        serde_json::from_str(&content).map_err(|err| {
            DiaglintError::config(format!(
                "Could not parse the configuration file at \"{}\": {err}",
                resolved.display()
            ))
        })
    }

    /// Ensure the dynamic plugin ruleset is extended.
    ///
    /// Appends `plugin:dynamic-rules/all` unless an entry for the dynamic
    /// plugin is already present (prefix match, so an explicit
    /// `plugin:dynamic-rules/recommended` also counts).
    pub fn ensure_dynamic_plugin(&mut self) {
        let marker = format!("plugin:{DYNAMIC_PLUGIN_NAME}");
        if !self.extends.iter().any(|entry| entry.starts_with(&marker)) {
            self.extends.push(format!("plugin:{DYNAMIC_PLUGIN_NAME}/all"));
        }
    }

    /// Force `severity` onto every dynamic rule override in the `rules` map.
    pub fn apply_custom_rule_severity(&mut self, severity: Severity) {
        let prefix = format!("{DYNAMIC_PLUGIN_NAME}/");
        for (name, value) in self.rules.iter_mut() {
            if name.starts_with(&prefix) {
                *value = severity;
            }
        }
    }
}

/// Prefer `<path>Revised` over `path` when it exists.
fn resolve_config_path(path: &Path) -> PathBuf {
    let mut revised = path.as_os_str().to_os_string();
    revised.push(REVISED_SUFFIX);
    let revised = PathBuf::from(revised);
    if revised.exists() {
        debug!("Using revised configuration file: {}", revised.display());
        revised
    } else {
        path.to_path_buf()
    }
}

/// Output format for the generated report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Pretty-printed `{ summary, issues }` JSON
    Json,
    /// Static HTML page with a summary block and issue table
    Html,
    /// JUnit XML with one test-case per linted file
    Junit,
}

impl ReportFormat {
    /// File extension of the report (`junit` reports use `xml`).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Junit => "xml",
        }
    }

    /// Format name as spelled on the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Junit => "junit",
        }
    }
}
