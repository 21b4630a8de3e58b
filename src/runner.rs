//! Synchronous execution of external programs.
//!
//! Every invocation blocks until the child exits and captures its standard
//! output, standard error and exit code as text. Environment overrides are
//! carried by the [`CommandRunner`] itself and applied to each child process,
//! so the calling process environment is never touched.
//!
//! # Examples
//!
//! ```no_run
//! use uv_metadata::runner::CommandRunner;
//!
//! fn main() -> uv_metadata::Result<()> {
//!     let runner = CommandRunner::new().env("UV_VENV_SEED", "0");
//!     let output = runner.run("uv", ["--version"])?;
//!     println!("{}", output.stdout.trim());
//!     Ok(())
//! }
//! ```

use crate::error::{MetadataError, Result};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Exit code reported when a child was terminated without one (e.g. by a signal)
const NO_EXIT_CODE: i32 = -1;

/// Captured result of one external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external programs with a fixed set of environment overrides
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// `None` removes the variable from the child environment
    env: BTreeMap<OsString, Option<OsString>>,
    current_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` for every child process
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.insert(key.into(), Some(value.into()));
        self
    }

    /// Hide `key` from every child process, even if the caller has it set
    pub fn env_remove(mut self, key: impl Into<OsString>) -> Self {
        self.env.insert(key.into(), None);
        self
    }

    /// Run children from `dir` instead of the caller's working directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Value a child process will see for `key`, if overridden
    #[cfg(test)]
    fn env_override(&self, key: impl AsRef<OsStr>) -> Option<Option<&OsStr>> {
        self.env.get(key.as_ref()).map(|value| value.as_deref())
    }

    /// Run `exe` with `args`, failing on a non-zero exit code
    pub fn run<I, S>(&self, exe: impl AsRef<OsStr>, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run_with(exe, args, true)
    }

    /// Run `exe` with `args`
    ///
    /// When `fatal` is true a non-zero exit code becomes
    /// [`MetadataError::CommandFailed`], carrying the command line and the
    /// captured stderr. Otherwise the output is returned for inspection.
    pub fn run_with<I, S>(
        &self,
        exe: impl AsRef<OsStr>,
        args: I,
        fatal: bool,
    ) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let exe = exe.as_ref();
        let path = which::which(exe).map_err(|source| MetadataError::ExecutableNotFound {
            name: exe.to_string_lossy().into_owned(),
            source,
        })?;
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let description = describe(&path, &args);
        tracing::info!("Running: {}", description);

        let mut command = Command::new(&path);
        command.args(&args);
        for (key, value) in &self.env {
            match value {
                Some(value) => command.env(key, value),
                None => command.env_remove(key),
            };
        }
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let output = command.output()?;
        let result = CommandOutput {
            code: output.status.code().unwrap_or(NO_EXIT_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!("'{}' exited with {}", description, result.code);
            if fatal {
                return Err(MetadataError::CommandFailed {
                    command: description,
                    code: result.code,
                    stderr: result.stderr,
                });
            }
        }

        Ok(result)
    }
}

/// Printable command line, used in logs and error messages
fn describe(exe: &Path, args: &[OsString]) -> String {
    let mut description = exe.display().to_string();
    for arg in args {
        description.push(' ');
        description.push_str(&arg.to_string_lossy());
    }
    description
}
