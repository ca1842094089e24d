//! Dynamically staged rules.
//!
//! Custom rules are declarative JSON specs discovered in a staged plugin
//! directory. Each file contributes one rule named `<plugin>/<file-stem>`,
//! interpreted against the element tree. A spec that fails to parse or
//! validate is a fatal configuration error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::core::config::Severity;
use crate::core::errors::{DiaglintError, Result};
use crate::engine::rules::{Rule, RuleReporter};
use crate::model::element::DiagramModel;

/// Check performed by a declarative rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// Matching elements must not appear anywhere in the diagram.
    Forbidden,
    /// At least one matching element must appear in the diagram.
    Required,
    /// Matching elements must carry a non-blank attribute.
    AttributeRequired,
}

/// A declarative rule specification, as staged on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRuleSpec {
    /// Element type names the rule applies to, e.g. `bpmn:ManualTask`.
    pub applies_to: Vec<String>,
    /// The check to perform.
    pub check: CheckKind,
    /// Attribute name for `attribute-required` checks.
    #[serde(default)]
    pub attribute: Option<String>,
    /// Custom violation message.
    #[serde(default)]
    pub message: Option<String>,
}

impl DynamicRuleSpec {
    fn validate(&self, origin: &Path) -> Result<()> {
        if self.applies_to.is_empty() {
            return Err(DiaglintError::config(format!(
                "dynamic rule {} has an empty \"appliesTo\" list",
                origin.display()
            )));
        }
        if self.check == CheckKind::AttributeRequired && self.attribute.is_none() {
            return Err(DiaglintError::config(format!(
                "dynamic rule {} uses \"attribute-required\" without an \"attribute\"",
                origin.display()
            )));
        }
        Ok(())
    }
}

/// A rule interpreted from a [`DynamicRuleSpec`].
pub struct DynamicRule {
    spec: DynamicRuleSpec,
}

impl DynamicRule {
    fn applies_to(&self, type_name: &str) -> bool {
        self.spec.applies_to.iter().any(|t| t == type_name)
    }
}

impl Rule for DynamicRule {
    fn check(&self, model: &DiagramModel, reporter: &mut RuleReporter) {
        match self.spec.check {
            CheckKind::Forbidden => {
                for element in model.elements().filter(|el| self.applies_to(el.type_name())) {
                    let message = self.spec.message.clone().unwrap_or_else(|| {
                        format!("Element of type <{}> is not allowed", element.type_name())
                    });
                    reporter.report(element.id(), message);
                }
            }
            CheckKind::Required => {
                let present = model.elements().any(|el| self.applies_to(el.type_name()));
                if !present {
                    let message = self.spec.message.clone().unwrap_or_else(|| {
                        format!(
                            "Required element <{}> is missing",
                            self.spec.applies_to.join(", ")
                        )
                    });
                    reporter.report(None, message);
                }
            }
            CheckKind::AttributeRequired => {
                let attribute = self.spec.attribute.as_deref().unwrap_or_default();
                for element in model.elements().filter(|el| self.applies_to(el.type_name())) {
                    let missing = element
                        .attribute(attribute)
                        .map_or(true, |value| value.trim().is_empty());
                    if missing {
                        let message = self.spec.message.clone().unwrap_or_else(|| {
                            format!("Element is missing required attribute <{attribute}>")
                        });
                        reporter.report(element.id(), message);
                    }
                }
            }
        }
    }
}

/// Load every declarative rule under `rules_dir`, naming each
/// `<prefix>/<file-stem>` with the given severity.
///
/// Returns an empty set when the directory does not exist; a rule file that
/// fails to parse is a fatal configuration error.
pub fn load_rules(
    rules_dir: &Path,
    prefix: &str,
    severity: Severity,
) -> Result<Vec<(String, Severity, Box<dyn Rule>)>> {
    if !rules_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(rules_dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some("json")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut rules = Vec::with_capacity(files.len());
    for file in files {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| DiaglintError::io(format!("failed to read dynamic rule {}", file.display()), err))?;
        let spec: DynamicRuleSpec = serde_json::from_str(&content).map_err(|err| {
            DiaglintError::config(format!(
                "invalid dynamic rule file {}: {err}",
                file.display()
            ))
        })?;
        spec.validate(&file)?;

        let stem = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        rules.push((
            format!("{prefix}/{stem}"),
            severity,
            Box::new(DynamicRule { spec }) as Box<dyn Rule>,
        ));
    }

    Ok(rules)
}
