//! Parsing documents from text and files.

use super::Document;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::LoadError;
use crate::value::{self, Value};
use std::path::Path;

/// Format of a serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    /// HCL configuration, as used by infrastructure fixtures.
    Hcl,
}

impl Format {
    /// Picks a format from a file extension. Anything that is not YAML or
    /// HCL is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            Some("tf") | Some("hcl") => Format::Hcl,
            _ => Format::Json,
        }
    }
}

impl Document {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Document::parse(text, Format::Json)
    }

    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
        Document::parse(text, Format::Yaml)
    }

    /// Parses a document with the default depth limit.
    pub fn parse(text: &str, format: Format) -> Result<Self, LoadError> {
        Document::parse_with_limit(text, format, DEFAULT_MAX_DEPTH)
    }

    /// Parses a document, rejecting trees nested deeper than `max_depth`.
    pub fn parse_with_limit(text: &str, format: Format, max_depth: usize) -> Result<Self, LoadError> {
        let tree = match format {
            Format::Json => value::from_json(text)?,
            Format::Yaml => value::from_yaml(text)?,
            Format::Hcl => value::from_hcl(text)?,
        };
        Document::from_value(tree, max_depth)
    }

    /// Validates an already parsed tree.
    pub fn from_value(tree: Value, max_depth: usize) -> Result<Self, LoadError> {
        let depth = tree.depth();
        if depth > max_depth {
            return Err(LoadError::TooDeep {
                depth,
                limit: max_depth,
            });
        }
        match tree {
            Value::Map(root) => Ok(Document::new(root)),
            other => Err(LoadError::NotAMap { kind: other.kind() }),
        }
    }

    /// Reads and parses a file, choosing the format from its extension.
    pub fn load_file(path: &Path, max_depth: usize) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let doc = Document::parse_with_limit(&text, Format::from_path(path), max_depth)?;
        tracing::debug!(path = %path.display(), endpoints = doc.path_count(), "loaded document");
        Ok(doc)
    }
}
