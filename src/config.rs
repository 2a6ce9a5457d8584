//! Configuration for the processing passes.
//!
//! A single [`Exclusions`] value feeds both the endpoint pruner and the
//! field-mode comparator.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default limit on document nesting accepted by the loader.
pub const DEFAULT_MAX_DEPTH: usize = 256;

const DEFAULT_EXCLUDED_ENDPOINTS: &[&str] = &[
    "/alarms/mask",
    "/backups",
    "/changesets",
    "/config",
    "/readmode",
    "/request",
    "/snmp",
    "/syslog",
    "/timetraveler",
];

const DEFAULT_EXCLUDED_PATH_PREFIXES: &[&str] = &["/config"];

/// Endpoints and path prefixes that are not part of the generated SDK surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exclusions {
    /// Endpoints removed by the pruner and skipped by the comparator.
    pub excluded_endpoints: BTreeSet<String>,
    /// Paths starting with any of these prefixes are left alone by the
    /// property-to-map transform.
    pub excluded_path_prefixes: BTreeSet<String>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Exclusions {
            excluded_endpoints: DEFAULT_EXCLUDED_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_path_prefixes: DEFAULT_EXCLUDED_PATH_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Exclusions {
    /// Returns true if the endpoint is listed as excluded.
    pub fn is_excluded_endpoint(&self, endpoint: &str) -> bool {
        self.excluded_endpoints.contains(endpoint)
    }

    /// Returns true if the path starts with an excluded prefix.
    pub fn has_excluded_prefix(&self, path: &str) -> bool {
        self.excluded_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Config holds every tunable of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exclusions: Exclusions,
    /// Maximum nesting depth accepted when loading a document.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exclusions: Exclusions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Parses a config from YAML or JSON text. Missing keys take defaults.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Loads a config file. JSON files are accepted as YAML.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
