//! Parser for `entry_points.txt`.
//!
//! The file is ini-style: `[group]` headers followed by `name = target`
//! lines. Comments start with `#` or `;`. Group and entry point names keep
//! their case.

use crate::error::{MetadataError, Result};
use configparser::ini::Ini;
use std::collections::BTreeMap;
use std::path::Path;

/// Entry points grouped by category, e.g. `console_scripts` -> `{"foo": "pkg:main"}`
pub type EntryPoints = BTreeMap<String, BTreeMap<String, String>>;

pub fn parse(text: &str) -> Result<EntryPoints> {
    // cs == case-sensitive
    let mut config = Ini::new_cs();
    config
        .read(text.to_string())
        .map_err(MetadataError::InvalidEntryPoints)?;

    let groups = config
        .get_map_ref()
        .iter()
        .map(|(section, entries)| {
            let entries = entries
                .iter()
                .map(|(name, target)| (name.clone(), target.clone().unwrap_or_default()))
                .collect();
            (section.clone(), entries)
        })
        .collect();
    Ok(groups)
}

/// Read and parse `path`; a missing file yields `None`
pub fn read(path: &Path) -> Result<Option<EntryPoints>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    parse(&content).map(Some)
}
