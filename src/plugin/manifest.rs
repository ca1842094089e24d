//! Plugin manifest handling and dependency-declaration rewriting.
//!
//! Lintrc `extends` entries can reference plugin packages using the
//! double-underscore encoding that survives rule-name restrictions:
//!
//! - `__scope__name__0.0.1` or `__scope__name__^0.0.1` → `npm:@scope/name@^0.0.1`
//! - `__scope__name__~0.0.1` → `npm:@scope/name@~0.0.1`
//! - `__scope__name` → `npm:@scope/name`
//! - bare `name` → the engine-prefixed registry package
//!
//! The rewritten references are merged into the staged manifest so the
//! package manager resolves them before the engine runs.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::config::{LinterKind, DYNAMIC_PLUGIN_NAME};
use crate::core::errors::{DiaglintError, Result};

/// File name of the staged manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// The staged plugin's package manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Marks the staging area as non-publishable.
    pub private: bool,
    /// Dependency declarations handed to the package manager.
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

/// The manifest written when the staging area is (re)initialized.
pub fn default_manifest(kind: LinterKind) -> PluginManifest {
    PluginManifest {
        name: format!("diaglint-{DYNAMIC_PLUGIN_NAME}"),
        version: "0.0.0".to_string(),
        private: true,
        dependencies: kind.default_dependencies(),
    }
}

/// Write `manifest` to `path` as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &PluginManifest) -> Result<()> {
    let content = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, content)
        .map_err(|err| DiaglintError::io(format!("failed to write {}", path.display()), err))
}

/// Dependencies declared by the custom rules source directory, when its own
/// manifest carries a `dependencies` table.
pub fn read_source_dependencies(source_dir: &Path) -> Result<Option<IndexMap<String, String>>> {
    let path = source_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }

    #[derive(Deserialize)]
    struct SourceManifest {
        dependencies: Option<IndexMap<String, String>>,
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|err| DiaglintError::io(format!("failed to read {}", path.display()), err))?;
    let manifest: SourceManifest = serde_json::from_str(&content).map_err(|err| {
        DiaglintError::config(format!("invalid manifest at {}: {err}", path.display()))
    })?;

    Ok(manifest.dependencies)
}

/// Rewrite a raw plugin name into its package-manager reference.
pub fn npm_package_name(kind: LinterKind, raw: &str) -> String {
    let mut result = if let Some(rest) = raw.strip_prefix("__") {
        match rest.split_once("__") {
            Some((scope, tail)) => format!("@{scope}/{tail}"),
            None => format!("@{rest}"),
        }
    } else {
        format!("{}-plugin-{raw}", kind.engine_name())
    };

    // remaining separator carries the version, with an implied caret
    if let Some(idx) = result.find("__~") {
        result.replace_range(idx..idx + 3, "@~");
    } else if let Some(idx) = result.find("__^") {
        result.replace_range(idx..idx + 3, "@^");
    } else if let Some(idx) = result.find("__") {
        result.replace_range(idx..idx + 2, "@^");
    }

    result
}

/// Translate every plugin reference in `extends` into a dependency
/// declaration, keyed by the engine-prefixed package alias. The built-in
/// dynamic plugin is skipped: it is staged, not installed.
pub fn plugin_dependencies(kind: LinterKind, extends: &[String]) -> IndexMap<String, String> {
    let mut dependencies = IndexMap::new();

    for entry in extends {
        let Some(reference) = entry.strip_prefix("plugin:") else {
            continue;
        };
        let name = reference
            .rsplit_once('/')
            .map(|(name, _)| name)
            .unwrap_or(reference);
        if name == DYNAMIC_PLUGIN_NAME {
            continue;
        }

        let package = npm_package_name(kind, name);
        dependencies.insert(
            format!("{}-plugin-{name}", kind.engine_name()),
            format!("npm:{package}"),
        );
    }

    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_names_with_versions_are_rewritten() {
        assert_eq!(
            npm_package_name(LinterKind::Bpmn, "__acme__bpmn-rules__0.0.1"),
            "@acme/bpmn-rules@^0.0.1"
        );
        assert_eq!(
            npm_package_name(LinterKind::Bpmn, "__acme__bpmn-rules__^0.0.1"),
            "@acme/bpmn-rules@^0.0.1"
        );
        assert_eq!(
            npm_package_name(LinterKind::Bpmn, "__acme__bpmn-rules__~0.0.1"),
            "@acme/bpmn-rules@~0.0.1"
        );
    }

    #[test]
    fn scoped_names_without_versions_pass_through() {
        assert_eq!(
            npm_package_name(LinterKind::Bpmn, "__acme__bpmn-rules"),
            "@acme/bpmn-rules"
        );
    }

    #[test]
    fn bare_names_get_the_engine_prefix() {
        assert_eq!(
            npm_package_name(LinterKind::Bpmn, "camunda-compat"),
            "bpmnlint-plugin-camunda-compat"
        );
        assert_eq!(
            npm_package_name(LinterKind::Dmn, "custom"),
            "dmnlint-plugin-custom"
        );
    }

    #[test]
    fn plugin_references_become_dependency_declarations() {
        let extends = vec![
            "bpmnlint:recommended".to_string(),
            "plugin:__acme__bpmn-rules__0.0.1/recommended".to_string(),
            "plugin:dynamic-rules/all".to_string(),
        ];

        let deps = plugin_dependencies(LinterKind::Bpmn, &extends);
        assert_eq!(deps.len(), 1);
        assert_eq!(
            deps["bpmnlint-plugin-__acme__bpmn-rules__0.0.1"],
            "npm:@acme/bpmn-rules@^0.0.1"
        );
    }

    #[test]
    fn source_manifest_dependencies_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name":"my-rules","dependencies":{"bpmnlint-utils":"^1.1.1"}}"#,
        )
        .unwrap();

        let deps = read_source_dependencies(dir.path()).unwrap().unwrap();
        assert_eq!(deps["bpmnlint-utils"], "^1.1.1");
    }

    #[test]
    fn missing_source_manifest_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_source_dependencies(dir.path()).unwrap().is_none());
    }

    #[test]
    fn empty_dependency_table_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name":"my-rules","dependencies":{}}"#,
        )
        .unwrap();

        let deps = read_source_dependencies(dir.path()).unwrap().unwrap();
        assert!(deps.is_empty());
    }
}
