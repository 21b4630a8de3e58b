//! RFC 822 style header blocks.
//!
//! Both the `METADATA` file of an installed distribution and the output of
//! `pip show` are a run of `Key: value` lines. Parsing stops at the first
//! empty line, so the long description that usually follows in `METADATA`
//! is never looked at.
//!
//! ```
//! use uv_metadata::headers::HeaderBlock;
//! use uv_metadata::MetadataValue;
//!
//! let block = HeaderBlock::parse("Name: demo\nRequires-Dist: a\nRequires-Dist: b\n");
//! let fields = block.into_fields();
//! assert_eq!(fields["name"], MetadataValue::Scalar("demo".into()));
//! assert_eq!(fields["requires_dist"], MetadataValue::List(vec!["a".into(), "b".into()]));
//! ```

use crate::metadata::{Fields, MetadataValue};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Header whose values are never reported
const DYNAMIC: &str = "Dynamic";

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("static regex is valid"));

/// Normalize a header name into a metadata key: `Requires-Dist` -> `requires_dist`
pub fn normalize_key(key: &str) -> String {
    NON_WORD.replace_all(key, "_").to_lowercase()
}

/// Ordered `(name, value)` pairs read from a header block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    headers: Vec<(String, String)>,
}

impl HeaderBlock {
    pub fn parse(text: &str) -> Self {
        let mut headers: Vec<(String, String)> = Vec::new();

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                break;
            }

            // Folded value
            if line.starts_with([' ', '\t']) {
                match headers.last_mut() {
                    Some((_, value)) => {
                        value.push('\n');
                        value.push_str(line);
                    }
                    None => tracing::debug!("Ignoring continuation without header: {:?}", line),
                }
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                tracing::debug!("Header block ended at non-header line: {:?}", line);
                break;
            };
            if name.is_empty() || name.contains(char::is_whitespace) {
                tracing::debug!("Header block ended at malformed header: {:?}", line);
                break;
            }

            headers.push((name.to_string(), value.trim_start_matches([' ', '\t']).to_string()));
        }

        Self { headers }
    }

    /// First value of `name`, compared case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.headers.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold repeated headers into lists and normalize their names
    ///
    /// The first occurrence of a header gives a scalar, the second turns it
    /// into a two element list, later ones append. `Dynamic` is dropped.
    pub fn into_fields(self) -> Fields {
        let mut raw: Vec<(String, MetadataValue)> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();

        for (name, value) in self.headers {
            if name == DYNAMIC {
                continue;
            }
            match index.get(&name) {
                Some(&i) => raw[i].1.push(value),
                None => {
                    index.insert(name.clone(), raw.len());
                    raw.push((name, MetadataValue::Scalar(value)));
                }
            }
        }

        raw.into_iter()
            .map(|(name, value)| (normalize_key(&name), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Metadata-Version: 2.1
Name: uv-metadata
Version: 0.1.0
Summary: Show the metadata of a package
Requires-Dist: requests>=2
Requires-Dist: tomli; python_version < \"3.11\"
Dynamic: license
Dynamic: summary
License: MIT
        Copyright (c) someone
Project-URL: Source, https://example.org

Long description
Name: not-a-header
";

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Requires-Dist"), "requires_dist");
        assert_eq!(normalize_key("Metadata-Version"), "metadata_version");
        assert_eq!(normalize_key("Name"), "name");
        assert_eq!(normalize_key("Foo--Bar.Baz"), "foo_bar_baz");
        assert_eq!(normalize_key("already_snake"), "already_snake");
    }

    #[test]
    fn test_repeated_headers_become_lists() {
        let fields = HeaderBlock::parse(SAMPLE).into_fields();
        assert_eq!(
            fields["requires_dist"],
            MetadataValue::List(vec![
                "requests>=2".to_string(),
                "tomli; python_version < \"3.11\"".to_string(),
            ])
        );
        assert_eq!(
            fields["summary"],
            MetadataValue::Scalar("Show the metadata of a package".to_string())
        );
    }

    #[test]
    fn test_dynamic_is_dropped() {
        let fields = HeaderBlock::parse(SAMPLE).into_fields();
        assert!(!fields.contains_key("dynamic"));
    }

    #[test]
    fn test_three_occurrences_append() {
        let fields = HeaderBlock::parse("Classifier: a\nClassifier: b\nClassifier: c\n").into_fields();
        assert_eq!(
            fields["classifier"],
            MetadataValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_body_is_ignored() {
        let block = HeaderBlock::parse(SAMPLE);
        assert_eq!(block.get("name"), Some("uv-metadata"));
        assert_eq!(block.iter().filter(|(k, _)| *k == "Name").count(), 1);
    }

    #[test]
    fn test_continuation_lines() {
        let block = HeaderBlock::parse(SAMPLE);
        assert_eq!(block.get("License"), Some("MIT\n        Copyright (c) someone"));
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let block = HeaderBlock::parse(SAMPLE);
        assert_eq!(block.get("Project-URL"), Some("Source, https://example.org"));
    }

    #[test]
    fn test_crlf_input() {
        let block = HeaderBlock::parse("Name: demo\r\nVersion: 1.0\r\n\r\nbody");
        assert_eq!(block.len(), 2);
        assert_eq!(block.get("version"), Some("1.0"));
    }

    #[test]
    fn test_pip_show_output() {
        let show = "Name: Foo.Bar\nVersion: 2.0\nLocation: /tmp/x/site-packages\nRequires: \nRequired-by: \n";
        let block = HeaderBlock::parse(show);
        assert_eq!(block.get("Name"), Some("Foo.Bar"));
        assert_eq!(block.get("Location"), Some("/tmp/x/site-packages"));
        assert_eq!(block.get("Requires"), Some(""));
    }

    #[test]
    fn test_empty_input() {
        assert!(HeaderBlock::parse("").is_empty());
        assert!(HeaderBlock::parse("").into_fields().is_empty());
    }
}
