//! Fixture module - Partial resource overrides for infrastructure fixtures.
//!
//! Fixtures are read from `.tf` files or from the equivalent parsed block
//! form `{"resource": [{"<type>": {"<name>": {attributes}}}]}`. A partial
//! overlay only carries the attributes it changes; [`merge_resources`] folds
//! it into a complete base and [`render_resources`] writes the result back
//! out as resource blocks.

mod render;

pub use render::*;

use crate::document::Document;
use crate::error::StructureError;
use crate::value::{Map, Value};
use indexmap::IndexMap;

/// Name of the resource block list.
pub const RESOURCE: &str = "resource";

/// ResourceKey identifies a resource by type and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub resource_type: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        ResourceKey {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

/// ResourceSet holds resource attributes in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    pub resources: IndexMap<ResourceKey, Map>,
}

impl ResourceSet {
    /// Collects the resources of a parsed fixture document.
    ///
    /// `resource` may be a list of blocks or a single block. Entries that are
    /// not maps are skipped. A resource seen twice keeps its first position
    /// and its later attributes.
    pub fn from_document(doc: &Document) -> Self {
        let blocks: Vec<&Map> = match doc.root().get(RESOURCE) {
            Some(Value::List(items)) => items.iter().filter_map(Value::as_map).collect(),
            Some(Value::Map(block)) => vec![block],
            Some(other) => {
                tracing::warn!(kind = other.kind(), "ignoring malformed resource section");
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut set = ResourceSet::default();
        for block in blocks {
            for (resource_type, named) in block.iter() {
                let Some(named) = named.as_map() else {
                    tracing::warn!(resource_type = %resource_type, "resource type is not a map");
                    continue;
                };
                for (name, attributes) in named.iter() {
                    let Some(attributes) = attributes.as_map() else {
                        tracing::warn!(resource_type = %resource_type, name = %name, "resource body is not a map");
                        continue;
                    };
                    set.resources
                        .insert(ResourceKey::new(resource_type.clone(), name.clone()), attributes.clone());
                }
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, resource_type: &str, name: &str) -> Option<&Map> {
        self.resources.get(&ResourceKey::new(resource_type, name))
    }
}

/// Merges overlay attributes into base attributes.
///
/// Only a map meeting a map is merged recursively. Lists and scalars are
/// replaced by the overlay, never unioned.
pub fn merge_attributes(base: &mut Map, overlay: &Map) {
    for (key, value) in overlay.iter() {
        if let (Some(Value::Map(existing)), Value::Map(incoming)) = (base.get_mut(key), value) {
            merge_attributes(existing, incoming);
            continue;
        }
        base.set(key.clone(), value.clone());
    }
}

/// Applies a partial overlay to a base fixture.
///
/// Resources present in both are merged with [`merge_attributes`]; resources
/// only in the overlay are appended after the base ones. Fails if the base
/// declares no resources.
pub fn merge_resources(base: &Document, overlay: &Document) -> Result<ResourceSet, StructureError> {
    let mut merged = ResourceSet::from_document(base);
    if merged.is_empty() {
        return Err(StructureError::missing_section(RESOURCE));
    }

    for (key, attributes) in ResourceSet::from_document(overlay).resources {
        match merged.resources.get_mut(&key) {
            Some(existing) => {
                tracing::debug!(resource_type = %key.resource_type, name = %key.name, "merging partial resource");
                merge_attributes(existing, &attributes);
            }
            None => {
                tracing::debug!(resource_type = %key.resource_type, name = %key.name, "adding overlay resource");
                merged.resources.insert(key, attributes);
            }
        }
    }

    Ok(merged)
}
