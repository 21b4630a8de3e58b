//! Metadata lookup for a single package specification.
//!
//! A lookup provisions an [`IsolatedEnv`], installs the package without its
//! dependencies, asks the installer which distribution landed and where,
//! then reads that distribution's dist-info directory:
//!
//! 1. `<installer> venv -p<python> <tmp>/.venv`
//! 2. `<installer> pip install --no-deps <package>`
//! 3. `<installer> pip freeze` (exactly one line expected)
//! 4. `<installer> pip show <name>` (name, version and location)
//! 5. parse `METADATA`, `entry_points.txt` and `top_level.txt`
//!
//! # Examples
//!
//! ```no_run
//! use uv_metadata::metadata::{get_metadata, LookupRequest};
//! use std::path::Path;
//!
//! fn main() -> uv_metadata::Result<()> {
//!     let request = LookupRequest::new("requests", Some("3.12".to_string()));
//!     let fields = get_metadata(Path::new("uv"), &request)?;
//!     println!("{:?}", fields.get("version"));
//!     Ok(())
//! }
//! ```

use crate::dist_info::{self, ENTRY_POINTS_FILE, METADATA_FILE, TOP_LEVEL_FILES};
use crate::entry_points::{self, EntryPoints};
use crate::error::{MetadataError, Result};
use crate::headers::HeaderBlock;
use crate::venv::IsolatedEnv;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Normalized metadata key -> value
pub type Fields = BTreeMap<String, MetadataValue>;

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Scalar(String),
    /// Header that occurred more than once, or a line listing
    List(Vec<String>),
    /// Entry points, grouped by category
    Table(EntryPoints),
}

impl MetadataValue {
    /// Add another occurrence of the same header
    pub(crate) fn push(&mut self, value: String) {
        match self {
            MetadataValue::Scalar(first) => {
                let first = std::mem::take(first);
                *self = MetadataValue::List(vec![first, value]);
            }
            MetadataValue::List(values) => values.push(value),
            MetadataValue::Table(_) => {
                tracing::warn!("Ignoring header value {:?} for a table field", value);
            }
        }
    }
}

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Name, local path or VCS URL, passed verbatim to `pip install`
    pub package: OsString,
    /// Interpreter version for the environment; installer default when `None`
    pub python: Option<String>,
}

impl LookupRequest {
    pub fn new(package: impl Into<OsString>, python: Option<String>) -> Self {
        Self {
            package: package.into(),
            python,
        }
    }
}

/// Distribution identity as reported by `pip show`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledDistribution {
    pub name: String,
    pub version: String,
    pub location: PathBuf,
}

impl InstalledDistribution {
    /// Extract name, version and location from `pip show` output
    pub fn from_show_output(package: &str, output: &str) -> Result<Self> {
        let block = HeaderBlock::parse(output);
        let field = |field: &str| {
            block
                .get(field)
                .map(str::to_string)
                .ok_or_else(|| MetadataError::MissingShowField {
                    field: field.to_string(),
                    package: package.to_string(),
                })
        };

        Ok(Self {
            name: field("Name")?,
            version: field("Version")?,
            location: PathBuf::from(field("Location")?),
        })
    }

    pub fn dist_info(&self) -> Result<PathBuf> {
        dist_info::locate(&self.location, &self.name, &self.version)
    }
}

/// Install `request` into a throwaway environment and report its metadata
///
/// The temporary environment is removed before this returns, on success
/// and on error alike.
pub fn get_metadata(installer: &Path, request: &LookupRequest) -> Result<Fields> {
    let env = IsolatedEnv::create(installer, request.python.as_deref())?;

    env.pip([
        OsString::from("install"),
        OsString::from("--no-deps"),
        request.package.clone(),
    ])?;

    let frozen = env.pip(["freeze"])?;
    let package_name = canonical_name(&frozen.stdout)?;

    let show = env.pip(["show", package_name.as_str()])?;
    let installed = InstalledDistribution::from_show_output(&package_name, &show.stdout)?;
    let dist_info = installed.dist_info()?;
    tracing::debug!("Reading {}", dist_info.display());

    read_dist_info(&dist_info)
}

/// Package name from `pip freeze` output holding exactly one distribution
///
/// `name==1.0` gives `name`; direct references (`name @ git+https://...`)
/// give the part before `@`.
pub fn canonical_name(freeze_output: &str) -> Result<String> {
    let lines: Vec<&str> = freeze_output.lines().collect();
    let [line] = lines[..] else {
        return Err(MetadataError::UnexpectedFreezeOutput(
            freeze_output.to_string(),
        ));
    };

    let name = match line.split_once('@') {
        Some((name, _)) => name,
        None => line.split('=').next().unwrap_or(line),
    };
    Ok(name.trim().to_string())
}

/// Merge everything a dist-info directory has to say into one mapping
pub fn read_dist_info(dist_info: &Path) -> Result<Fields> {
    let metadata_path = dist_info.join(METADATA_FILE);
    let mut fields = if metadata_path.exists() {
        let content = std::fs::read_to_string(&metadata_path)?;
        HeaderBlock::parse(&content).into_fields()
    } else {
        tracing::warn!("No {} in {}", METADATA_FILE, dist_info.display());
        Fields::new()
    };

    if let Some(eps) = entry_points::read(&dist_info.join(ENTRY_POINTS_FILE))? {
        if !eps.is_empty() {
            tracing::debug!("Found {} entry point groups", eps.len());
            fields.insert("entry_points".to_string(), MetadataValue::Table(eps));
        }
    }

    for (file, key) in TOP_LEVEL_FILES {
        if let Some(modules) = dist_info::read_lines(&dist_info.join(file))? {
            fields.insert(key.to_string(), MetadataValue::List(modules));
        }
    }

    Ok(fields)
}
