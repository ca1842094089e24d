//! Dynamic plugin staging area lifecycle.
//!
//! User-supplied rule files are copied into a staging directory the rule
//! engine discovers, a manifest is assembled from the source's own
//! dependency declarations (or a per-type default set) plus rewritten
//! lintrc plugin references, and dependencies are installed when the caller
//! permitted it. The area is transient: it is created and destroyed within
//! one run, and cleanup is guaranteed once staging occurred.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::config::{LinterKind, LintrcConfig};
use crate::core::errors::{DiaglintError, Result};
use crate::plugin::install::DependencyInstaller;
use crate::plugin::manifest::{self, PluginManifest, MANIFEST_FILE};

/// Default staging location, relative to the working directory.
pub const DEFAULT_STAGING_DIR: &str = ".diaglint/dynamic-rules";

/// Environment variable overriding the staging location.
pub const STAGING_DIR_ENV: &str = "DIAGLINT_PLUGIN_DIR";

/// Extension of stageable rule files.
const RULE_FILE_EXT: &str = "json";

/// Resolve the staging root from the environment, falling back to the
/// default working-directory location.
pub fn staging_root_from_env() -> PathBuf {
    std::env::var_os(STAGING_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR))
}

/// Handle on the dynamic plugin staging area.
#[derive(Debug)]
pub struct PluginStaging {
    root: PathBuf,
    kind: LinterKind,
}

impl PluginStaging {
    /// Create a handle rooted at `root` for the given linter type. No
    /// filesystem changes happen until [`prepare`](Self::prepare) or
    /// [`cleanup`](Self::cleanup) run.
    pub fn new(root: impl Into<PathBuf>, kind: LinterKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    /// Root directory of the staging area.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory staged rule files are copied into.
    pub fn rules_dir(&self) -> PathBuf {
        self.root.join("rules")
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Stage custom rules from `source_dir` and install their dependencies.
    ///
    /// Mirrors the preparation contract: reset stale artifacts, assemble the
    /// manifest (source dependencies or defaults, plus rewritten lintrc
    /// plugin references), copy rule files, then install — or fail fast when
    /// installation is needed but not permitted. A missing source directory
    /// propagates as a filesystem error.
    pub fn prepare(
        &self,
        source_dir: &Path,
        lintrc: &LintrcConfig,
        install_deps: bool,
        installer: &dyn DependencyInstaller,
    ) -> Result<()> {
        self.cleanup(false)?;

        let mut dependencies = match manifest::read_source_dependencies(source_dir)? {
            Some(deps) => deps,
            None => self.kind.default_dependencies(),
        };
        dependencies.extend(manifest::plugin_dependencies(self.kind, &lintrc.extends));

        let staged_manifest = PluginManifest {
            dependencies: dependencies.clone(),
            ..manifest::default_manifest(self.kind)
        };
        manifest::write_manifest(&self.manifest_path(), &staged_manifest)?;

        let copied = self.copy_rule_files(source_dir)?;
        debug!("Copied {copied} rule file(s).");

        if !dependencies.is_empty() {
            if install_deps {
                info!("Installing dependencies for dynamic plugin...");
                installer.install(&self.root)?;
                info!("Dependencies installed successfully.");
            } else {
                return Err(DiaglintError::config(
                    "Custom rules require dependencies, but they are not installed. \
                     Please use the '-i' or '--install-custom-deps' flag.",
                ));
            }
        }

        Ok(())
    }

    /// Copy rule files from `source_dir` into the staged `rules/` directory,
    /// preserving relative paths and skipping `node_modules` and `.git`.
    fn copy_rule_files(&self, source_dir: &Path) -> Result<usize> {
        let rules_dir = self.rules_dir();
        debug!(
            "Copying rules from {} to {}",
            source_dir.display(),
            rules_dir.display()
        );

        let mut copied = 0usize;
        for entry in WalkDir::new(source_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RULE_FILE_EXT) {
                continue;
            }

            let relative = path
                .strip_prefix(source_dir)
                .map_err(|_| DiaglintError::internal("staged file outside the source directory"))?;
            if relative.components().any(|component| {
                matches!(component.as_os_str().to_str(), Some("node_modules" | ".git"))
            }) {
                continue;
            }

            let destination = rules_dir.join(relative);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    DiaglintError::io(format!("failed to create {}", parent.display()), err)
                })?;
            }
            std::fs::copy(path, &destination).map_err(|err| {
                DiaglintError::io(format!("failed to copy {}", path.display()), err)
            })?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Remove staged artifacts, recreating an empty `rules/` directory.
    ///
    /// With `reset_manifest`, the manifest's dependency table is also
    /// restored to the linter type's default set.
    pub fn cleanup(&self, reset_manifest: bool) -> Result<()> {
        debug!("Cleaning up dynamic plugin staging area...");

        let rules_dir = self.rules_dir();
        let node_modules = self.root.join("node_modules");

        if rules_dir.exists() {
            std::fs::remove_dir_all(&rules_dir).map_err(|err| {
                DiaglintError::io(format!("failed to remove {}", rules_dir.display()), err)
            })?;
        }
        if node_modules.exists() {
            std::fs::remove_dir_all(&node_modules).map_err(|err| {
                DiaglintError::io(format!("failed to remove {}", node_modules.display()), err)
            })?;
        }
        std::fs::create_dir_all(&rules_dir).map_err(|err| {
            DiaglintError::io(format!("failed to create {}", rules_dir.display()), err)
        })?;

        if reset_manifest {
            manifest::write_manifest(&self.manifest_path(), &manifest::default_manifest(self.kind))?;
        }

        Ok(())
    }
}
