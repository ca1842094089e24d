//! Dependency installation.
//!
//! Installation is modeled as an injected capability so the blocking
//! package-manager shell-out can be faked in tests. The production
//! implementation invokes `npm install` synchronously in the staging
//! directory; failure is fatal and never retried.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::errors::{DiaglintError, Result};

/// Capability to install the staged plugin's declared dependencies.
pub trait DependencyInstaller {
    /// Install dependencies for the manifest at `plugin_dir`.
    fn install(&self, plugin_dir: &Path) -> Result<()>;
}

/// Production installer shelling out to `npm install`.
#[derive(Debug, Default)]
pub struct NpmInstaller;

impl DependencyInstaller for NpmInstaller {
    fn install(&self, plugin_dir: &Path) -> Result<()> {
        let output = Command::new("npm")
            .arg("install")
            .current_dir(plugin_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| {
                DiaglintError::install(format!("failed to run 'npm install': {err}"))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DiaglintError::install(format!(
                "'npm install' failed in {}: {}",
                plugin_dir.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! Installer fakes shared by plugin tests.

    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::DependencyInstaller;
    use crate::core::errors::{DiaglintError, Result};

    /// Records install invocations instead of spawning a process.
    #[derive(Debug, Default)]
    pub struct RecordingInstaller {
        /// Directories install was requested for.
        pub calls: RefCell<Vec<PathBuf>>,
        /// When set, every call fails with this message.
        pub fail_with: Option<String>,
    }

    impl DependencyInstaller for RecordingInstaller {
        fn install(&self, plugin_dir: &Path) -> Result<()> {
            self.calls.borrow_mut().push(plugin_dir.to_path_buf());
            match &self.fail_with {
                Some(message) => Err(DiaglintError::install(message.clone())),
                None => Ok(()),
            }
        }
    }
}
