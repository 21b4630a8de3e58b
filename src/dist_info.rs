//! Locating and reading `*.dist-info` directories.
//!
//! Installers write one `{name}-{version}.dist-info` directory per installed
//! distribution, next to the package itself:
//!
//! ```text
//! .venv/lib/python3.12/site-packages/
//!   requests/
//!   requests-2.32.3.dist-info/
//!     METADATA           # header block, see `headers`
//!     entry_points.txt   # optional, see `entry_points`
//!     top_level.txt      # optional, one module per line
//! ```

use crate::error::{MetadataError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DIST_INFO_SUFFIX: &str = ".dist-info";

pub const METADATA_FILE: &str = "METADATA";
pub const ENTRY_POINTS_FILE: &str = "entry_points.txt";

/// Module listings, paired with the key they are reported under
pub const TOP_LEVEL_FILES: [(&str, &str); 2] = [
    ("top_level.txt", "top_level"),
    ("top_levels.txt", "top_levels"),
];

static WHEEL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("static regex is valid"));

/// Standardized wheel basename: `Foo.Bar--baz` -> `foo_bar_baz`
pub fn standardize_name(name: &str) -> String {
    WHEEL_SEPARATORS.replace_all(name.trim(), "_").to_lowercase()
}

/// Expected directory name for a distribution
pub fn dist_info_name(name: &str, version: &str) -> String {
    format!("{}-{}{}", standardize_name(name), version, DIST_INFO_SUFFIX)
}

/// Find the dist-info directory of `name` `version` under `location`
///
/// The standardized name is tried first. Wheels that kept their original
/// spelling (e.g. `PyYAML-6.0.1.dist-info`) are found by scanning `location`.
pub fn locate(location: &Path, name: &str, version: &str) -> Result<PathBuf> {
    let expected = location.join(dist_info_name(name, version));
    if expected.is_dir() {
        return Ok(expected);
    }

    let wanted = standardize_name(name);
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(entries) = fs::read_dir(location) {
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(stem) = file_name.strip_suffix(DIST_INFO_SUFFIX) else {
                continue;
            };
            let Some((dist, dist_version)) = stem.rsplit_once('-') else {
                continue;
            };
            if standardize_name(dist) == wanted && dist_version == version {
                candidates.push(entry.path());
            }
        }
    }
    candidates.sort();

    match candidates.into_iter().find(|path| path.is_dir()) {
        Some(found) => {
            tracing::debug!("Resolved dist-info by scanning: {}", found.display());
            Ok(found)
        }
        None => Err(MetadataError::DistInfoNotFound {
            name: name.to_string(),
            version: version.to_string(),
            location: location.to_path_buf(),
        }),
    }
}

/// Every line of `path`, in order; a missing file yields `None`
pub fn read_lines(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(content.lines().map(String::from).collect()))
}
