//! Field classification types.

use crate::schema::{SchemaNode, SchemaType};
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

static EMPTY: Map = Map::new();

/// Mode is one of the two deployment variants being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Datacenter,
    Campus,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Datacenter => "datacenter",
            Mode::Campus => "campus",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FieldMode says whether a field exists in both modes or only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldMode {
    Common,
    Only(Mode),
}

impl FieldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldMode::Common => "common",
            FieldMode::Only(Mode::Datacenter) => "datacenter_only",
            FieldMode::Only(Mode::Campus) => "campus_only",
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// FieldInfo describes one request-body field and its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: SchemaType,
    pub default: Option<Value>,
    /// Always true for integer and number fields.
    pub nullable: bool,
    pub description: String,
    pub mode: FieldMode,
    /// Dotted path from the request body root; array levels end in `[]`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_fields: Option<BTreeMap<String, FieldInfo>>,
}

impl FieldInfo {
    /// Builds the info for a field and, recursively, its nested fields, all
    /// tagged with `mode`.
    pub fn extract(name: &str, schema: &Value, mode: FieldMode, parent_path: &str) -> FieldInfo {
        let node = SchemaNode::new(schema_map(schema));
        let field_type = node.schema_type();
        let path = join_path(parent_path, name);

        let nested = match field_type {
            SchemaType::Array => node
                .items()
                .filter(|items| items.schema_type() == SchemaType::Object)
                .and_then(|items| items.properties())
                .map(|props| (props, format!("{}[]", path))),
            SchemaType::Object => node.properties().map(|props| (props, path.clone())),
            SchemaType::String
            | SchemaType::Integer
            | SchemaType::Number
            | SchemaType::Boolean
            | SchemaType::Null
            | SchemaType::Unknown => None,
        };
        let nested_fields = nested
            .filter(|(props, _)| !props.is_empty())
            .map(|(props, parent)| {
                props
                    .iter()
                    .map(|(child, child_schema)| {
                        (child.clone(), FieldInfo::extract(child, child_schema, mode, &parent))
                    })
                    .collect()
            });

        FieldInfo {
            name: name.to_string(),
            field_type,
            default: node.default_value().cloned(),
            nullable: field_type.is_numeric() || node.is_nullable(),
            description: node.description().to_string(),
            mode,
            path,
            nested_fields,
        }
    }
}

/// Returns the map behind a schema value, or an empty map.
pub(crate) fn schema_map(schema: &Value) -> &Map {
    schema.as_map().unwrap_or(&EMPTY)
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}
