use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Executable not found: {name}")]
    ExecutableNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("'{command}' failed with exit code {code}:\n{stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Unexpected pip freeze output:\n{0}")]
    UnexpectedFreezeOutput(String),

    #[error("'{field}' missing from 'pip show' output for {package}")]
    MissingShowField { field: String, package: String },

    #[error("No dist-info folder found for {name} {version} in {}", location.display())]
    DistInfoNotFound {
        name: String,
        version: String,
        location: PathBuf,
    },

    #[error("Invalid entry points: {0}")]
    InvalidEntryPoints(String),

    #[error("'{0}' not found in metadata")]
    KeyNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
