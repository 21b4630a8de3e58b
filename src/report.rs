//! Rendering of looked-up metadata.

use crate::error::{MetadataError, Result};
use crate::metadata::{Fields, MetadataValue};
use serde::Serialize;

const INDENT: &[u8] = b"    ";

/// Whole mapping as JSON: sorted keys, 4-space indent, trailing newline
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| MetadataError::Other(e.into()))
}

/// A single field as plain text
///
/// Scalars are printed verbatim, lists one element per line, entry point
/// tables as JSON.
pub fn render_key(fields: &Fields, key: &str) -> Result<String> {
    let value = fields
        .get(key)
        .ok_or_else(|| MetadataError::KeyNotFound(key.to_string()))?;

    match value {
        MetadataValue::Scalar(text) => Ok(format!("{text}\n")),
        MetadataValue::List(items) => Ok(items.iter().map(|item| format!("{item}\n")).collect()),
        MetadataValue::Table(table) => render_json(table),
    }
}

/// Render `fields`, or only `key` when given
pub fn render(fields: &Fields, key: Option<&str>) -> Result<String> {
    match key {
        Some(key) => render_key(fields, key),
        None => render_json(fields),
    }
}
