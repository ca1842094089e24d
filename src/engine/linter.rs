//! Ruleset resolution and rule evaluation.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::config::{LinterKind, LintrcConfig, Severity, DYNAMIC_PLUGIN_NAME};
use crate::core::errors::{DiaglintError, Result};
use crate::core::issues::IssueCategory;
use crate::engine::dynamic;
use crate::engine::rules::{self, Rule, RuleReporter};
use crate::model::element::DiagramModel;

/// A finding emitted by [`Linter::lint`], already classified by the rule's
/// resolved severity.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFinding {
    /// Id of the offending element, when attributable.
    pub element_id: Option<String>,
    /// Description of the violation.
    pub message: String,
    /// Classification derived from the rule's severity.
    pub category: IssueCategory,
}

/// Resolution context for [`Linter::from_config`].
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Root of the dynamic plugin staging area, when one was prepared.
    pub plugin_dir: Option<PathBuf>,
    /// Severity assigned to dynamic rules (wins over lintrc overrides).
    pub dynamic_severity: Option<Severity>,
}

struct ResolvedRule {
    name: String,
    severity: Severity,
    rule: Box<dyn Rule>,
}

/// The rule engine: a fully resolved, severity-annotated rule list for one
/// linter type.
pub struct Linter {
    kind: LinterKind,
    rules: Vec<ResolvedRule>,
}

impl Linter {
    /// Resolve the `extends` entries and `rules` overrides of `config` into
    /// an executable rule list.
    pub fn from_config(
        kind: LinterKind,
        config: &LintrcConfig,
        options: &ResolveOptions,
    ) -> Result<Self> {
        let mut resolved: IndexMap<String, (Severity, Box<dyn Rule>)> = IndexMap::new();
        let dynamic_severity = options.dynamic_severity.unwrap_or(Severity::Warn);

        for entry in &config.extends {
            if let Some(ruleset) = entry.strip_prefix(&format!("{}:", kind.engine_name())) {
                if ruleset != "recommended" && ruleset != "all" {
                    return Err(DiaglintError::config_field(
                        format!("unknown ruleset \"{entry}\""),
                        "extends",
                    ));
                }
                for (name, severity, rule) in rules::recommended(kind) {
                    resolved.insert(name, (severity, rule));
                }
            } else if let Some(reference) = entry.strip_prefix("plugin:") {
                let plugin_name = reference
                    .rsplit_once('/')
                    .map(|(name, _)| name)
                    .unwrap_or(reference);

                if plugin_name == DYNAMIC_PLUGIN_NAME {
                    let Some(plugin_dir) = options.plugin_dir.as_deref() else {
                        warn!("Dynamic rules plugin referenced but no staging area is present; skipping");
                        continue;
                    };
                    let rules_dir = plugin_dir.join("rules");
                    for (name, severity, rule) in
                        dynamic::load_rules(&rules_dir, DYNAMIC_PLUGIN_NAME, dynamic_severity)?
                    {
                        resolved.insert(name, (severity, rule));
                    }
                } else {
                    load_installed_plugin(kind, options.plugin_dir.as_deref(), plugin_name, &mut resolved)?;
                }
            } else {
                return Err(DiaglintError::config_field(
                    format!("unknown ruleset \"{entry}\""),
                    "extends",
                ));
            }
        }

        // lintrc overrides by rule name
        for (name, severity) in &config.rules {
            match resolved.get_mut(name) {
                Some(slot) => slot.0 = *severity,
                None => warn!("Rule \"{name}\" is configured but not provided by any ruleset; ignoring"),
            }
        }

        // the custom-rules severity option wins for every dynamic rule
        if options.dynamic_severity.is_some() {
            let prefix = format!("{DYNAMIC_PLUGIN_NAME}/");
            for (name, slot) in resolved.iter_mut() {
                if name.starts_with(&prefix) {
                    slot.0 = dynamic_severity;
                }
            }
        }

        let rules: Vec<ResolvedRule> = resolved
            .into_iter()
            .filter(|(_, (severity, _))| *severity != Severity::Off)
            .map(|(name, (severity, rule))| ResolvedRule {
                name,
                severity,
                rule,
            })
            .collect();

        debug!(
            "Initialized {} linter with {} rule(s)",
            kind.engine_name(),
            rules.len()
        );

        Ok(Self { kind, rules })
    }

    /// The linter type this engine was resolved for.
    pub fn kind(&self) -> LinterKind {
        self.kind
    }

    /// Evaluate every resolved rule against `model`, returning findings
    /// grouped by rule name in resolution order. Rules without findings are
    /// omitted.
    pub fn lint(&self, model: &DiagramModel) -> IndexMap<String, Vec<RuleFinding>> {
        let mut report = IndexMap::new();

        for resolved in &self.rules {
            let mut reporter = RuleReporter::default();
            resolved.rule.check(model, &mut reporter);

            let category = match resolved.severity {
                Severity::Error => IssueCategory::Error,
                _ => IssueCategory::Warning,
            };
            let findings: Vec<RuleFinding> = reporter
                .into_entries()
                .into_iter()
                .map(|entry| RuleFinding {
                    element_id: entry.element_id,
                    message: entry.message,
                    category,
                })
                .collect();

            if !findings.is_empty() {
                report.insert(resolved.name.clone(), findings);
            }
        }

        report
    }
}

/// Resolve an external plugin reference against the staged `node_modules`.
///
/// Installed packages may ship declarative rules under `rules/`; anything
/// else was installed for side effects only and resolves empty.
fn load_installed_plugin(
    kind: LinterKind,
    plugin_dir: Option<&Path>,
    plugin_name: &str,
    resolved: &mut IndexMap<String, (Severity, Box<dyn Rule>)>,
) -> Result<()> {
    let Some(plugin_dir) = plugin_dir else {
        warn!("Plugin \"{plugin_name}\" referenced but no staging area is present; skipping");
        return Ok(());
    };

    let package = format!("{}-plugin-{plugin_name}", kind.engine_name());
    let rules_dir = plugin_dir.join("node_modules").join(&package).join("rules");
    if !rules_dir.is_dir() {
        warn!("Plugin package \"{package}\" provides no interpretable rules; skipping");
        return Ok(());
    }

    for (name, severity, rule) in dynamic::load_rules(&rules_dir, plugin_name, Severity::Warn)? {
        resolved.insert(name, (severity, rule));
    }
    Ok(())
}
