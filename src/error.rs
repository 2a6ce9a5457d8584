//! Error types.
//!
//! There is no error for conflicting value kinds during a merge: the overlay
//! value always wins.

use std::path::PathBuf;
use thiserror::Error;

/// LoadError is returned when an input document cannot be turned into a tree.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid HCL: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("document root must be a map, got {kind}")]
    NotAMap { kind: &'static str },

    #[error("document nesting depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },
}

impl LoadError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// StructureError reports a missing or misshapen top-level section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("document has no '{section}' section")]
    MissingSection { section: String },

    #[error("'{section}' must be a map, got {kind}")]
    NotAMap {
        section: String,
        kind: &'static str,
    },

    #[error("endpoint {endpoint} not found in either document")]
    UnknownEndpoint { endpoint: String },
}

impl StructureError {
    /// Creates a missing section error.
    pub fn missing_section(section: impl Into<String>) -> Self {
        StructureError::MissingSection {
            section: section.into(),
        }
    }

    /// Creates a wrong-kind error for a section.
    pub fn not_a_map(section: impl Into<String>, kind: &'static str) -> Self {
        StructureError::NotAMap {
            section: section.into(),
            kind,
        }
    }

    /// Creates an unknown endpoint error.
    pub fn unknown_endpoint(endpoint: impl Into<String>) -> Self {
        StructureError::UnknownEndpoint {
            endpoint: endpoint.into(),
        }
    }
}

/// ConfigError is returned when a configuration file cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Error is the crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize output: {0}")]
    Serialize(String),

    #[error("failed to render resource blocks: {0}")]
    Render(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl From<hcl::Error> for Error {
    fn from(err: hcl::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
