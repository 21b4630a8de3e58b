//! Disposable, isolated package environments.
//!
//! An [`IsolatedEnv`] owns a temporary directory holding a freshly created
//! virtual environment. The directory and everything inside it is removed
//! when the value is dropped, whichever way the lookup ends.

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use tempfile::TempDir;

/// Variable pointing the installer at the active environment
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";

/// Variable controlling whether pip/setuptools get seeded into new environments
pub const UV_VENV_SEED: &str = "UV_VENV_SEED";

/// Name of the environment folder inside the temporary directory
const VENV_FOLDER: &str = ".venv";

/// A throwaway virtual environment scoped to a single lookup
#[derive(Debug)]
pub struct IsolatedEnv {
    installer: PathBuf,
    runner: CommandRunner,
    // Dropped last: removes the whole tree
    _tmpdir: TempDir,
}

impl IsolatedEnv {
    /// Create a new environment targeting `python` (installer default when `None`)
    pub fn create(installer: impl Into<PathBuf>, python: Option<&str>) -> Result<Self> {
        let installer = installer.into();
        let tmpdir = tempfile::Builder::new().prefix("uv-metadata-").tempdir()?;
        let venv = tmpdir.path().join(VENV_FOLDER);

        // An inherited VIRTUAL_ENV must not leak into the new environment
        let base = CommandRunner::new()
            .env(UV_VENV_SEED, "0")
            .env_remove(VIRTUAL_ENV)
            .current_dir(tmpdir.path());

        let mut args: Vec<OsString> = vec!["venv".into()];
        if let Some(python) = python {
            args.push(format!("-p{python}").into());
        }
        args.push(venv.clone().into_os_string());
        base.run(&installer, &args)?;
        tracing::debug!("Created environment in {}", venv.display());

        let runner = base.env(VIRTUAL_ENV, venv.as_os_str());
        Ok(Self {
            installer,
            runner,
            _tmpdir: tmpdir,
        })
    }

    /// Run `<installer> pip <args>` against this environment
    pub fn pip<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut full: Vec<OsString> = vec!["pip".into()];
        full.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self.runner.run(&self.installer, &full)
    }
}
