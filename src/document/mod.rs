//! Document module - The root of an API specification tree.
//!
//! A [`Document`] is loaded once, mutated in place by sequential passes and
//! then serialized back out.

mod loader;

pub use loader::*;

use crate::value::{self, Map, Value};

/// Name of the endpoint collection.
pub const PATHS: &str = "paths";
/// Name of the shared-definitions collection.
pub const COMPONENTS: &str = "components";
/// Name of the server list.
pub const SERVERS: &str = "servers";

/// Document is an API specification whose root is always a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    root: Map,
}

impl Document {
    /// Creates a document from an already validated root map.
    pub fn new(root: Map) -> Self {
        Document { root }
    }

    /// Returns the root map.
    pub fn root(&self) -> &Map {
        &self.root
    }

    /// Returns the root map mutably.
    pub fn root_mut(&mut self) -> &mut Map {
        &mut self.root
    }

    /// Consumes the document and returns its root map.
    pub fn into_root(self) -> Map {
        self.root
    }

    /// Returns the endpoint collection, if present and a map.
    pub fn paths(&self) -> Option<&Map> {
        self.root.get_map(PATHS)
    }

    /// Returns the endpoint collection mutably, if present and a map.
    pub fn paths_mut(&mut self) -> Option<&mut Map> {
        self.root.get_map_mut(PATHS)
    }

    /// Returns the shared-definitions collection, if present and a map.
    pub fn components(&self) -> Option<&Map> {
        self.root.get_map(COMPONENTS)
    }

    /// Returns the shared-definitions collection mutably.
    pub fn components_mut(&mut self) -> Option<&mut Map> {
        self.root.get_map_mut(COMPONENTS)
    }

    /// Returns the number of endpoints.
    pub fn path_count(&self) -> usize {
        self.paths().map_or(0, Map::len)
    }

    /// Serializes the document to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        value::to_json_pretty(&Value::Map(self.root.clone()))
    }

    /// Serializes the document to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        value::to_yaml(&Value::Map(self.root.clone()))
    }

    /// Serializes the document in the given format.
    pub fn to_text(&self, format: Format) -> crate::error::Result<String> {
        Ok(match format {
            Format::Json => self.to_json_pretty()?,
            Format::Yaml => self.to_yaml()?,
            Format::Hcl => hcl::to_string(&self.root)?,
        })
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Map(doc.root)
    }
}
