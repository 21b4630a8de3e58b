//! Library interface for uv-metadata
//!
//! Installs a single package specification into a throwaway virtual
//! environment and reports the metadata of the resulting distribution.

pub mod colors;
pub mod config;
pub mod dist_info;
pub mod entry_points;
pub mod error;
pub mod headers;
pub mod metadata;
pub mod report;
pub mod runner;
pub mod venv;

// Re-export commonly used items
pub use error::{MetadataError, Result};
pub use metadata::{Fields, LookupRequest, MetadataValue, get_metadata};
