//! Runtime settings resolved from command-line flags and the environment.

use crate::runner::CommandRunner;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Installer used when nothing else is configured
pub const DEFAULT_INSTALLER: &str = "uv";

/// Environment variable overriding the installer executable
pub const INSTALLER_ENV: &str = "UV_METADATA_INSTALLER";

/// Interpreter probed for the default `--python` value
const SYSTEM_PYTHON: &str = "python3";

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Python\s+(\d+)\.(\d+)").expect("static regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub installer: PathBuf,
    pub python: Option<String>,
}

impl Settings {
    /// Fill in the interpreter version when the command line left it out
    pub fn resolve(installer: PathBuf, python: Option<String>) -> Self {
        let python = python.or_else(detect_python_version);
        Self { installer, python }
    }
}

/// `major.minor` of the `python3` found on PATH, if any
pub fn detect_python_version() -> Option<String> {
    let output = CommandRunner::new()
        .run_with(SYSTEM_PYTHON, ["--version"], false)
        .ok()?;
    if !output.success() {
        return None;
    }
    // Python 2 printed its version on stderr
    let text = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    let version = parse_major_minor(text);
    if version.is_none() {
        tracing::debug!("Could not parse interpreter version from {:?}", text);
    }
    version
}

/// `"Python 3.12.4"` -> `"3.12"`
fn parse_major_minor(text: &str) -> Option<String> {
    let captures = PYTHON_VERSION.captures(text.trim())?;
    Some(format!("{}.{}", &captures[1], &captures[2]))
}

/// Turn local paths into absolute ones; anything else is passed through
///
/// Specs starting with `.`, `/` or `~` are paths, and so is anything with a
/// path separator that exists on disk (`dist/pkg-1.0-py3-none-any.whl`).
/// `~` expands to the home directory. Names and VCS URLs are left untouched.
pub fn resolve_package_spec(spec: &str) -> std::io::Result<OsString> {
    let path_like = spec.starts_with(['.', '/', '~'])
        || (spec.contains(['/', std::path::MAIN_SEPARATOR]) && Path::new(spec).exists());
    if !path_like {
        return Ok(OsString::from(spec));
    }

    let path = expand_home(spec);
    Ok(std::path::absolute(&path)?.into_os_string())
}

fn expand_home(spec: &str) -> PathBuf {
    let rest = if spec == "~" {
        Some("")
    } else {
        spec.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(spec).to_path_buf(),
    }
}
