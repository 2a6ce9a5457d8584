//! Typed view over a schema node stored in a [`Map`].

use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SchemaType is the type discriminator of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Unknown,
}

impl SchemaType {
    /// Parses a `type` keyword. Unrecognised names read as `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            "string" => SchemaType::String,
            "integer" => SchemaType::Integer,
            "number" => SchemaType::Number,
            "boolean" => SchemaType::Boolean,
            "null" => SchemaType::Null,
            _ => SchemaType::Unknown,
        }
    }

    /// Reads the type of a node. A missing or non-string `type` is `Unknown`.
    pub fn of(node: &Map) -> Self {
        node.get_str("type").map_or(SchemaType::Unknown, SchemaType::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Unknown => "unknown",
        }
    }

    /// Returns true for `integer` and `number`.
    pub fn is_numeric(&self) -> bool {
        match self {
            SchemaType::Integer | SchemaType::Number => true,
            SchemaType::Object
            | SchemaType::Array
            | SchemaType::String
            | SchemaType::Boolean
            | SchemaType::Null
            | SchemaType::Unknown => false,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SchemaNode borrows a map and exposes the schema keywords the passes use.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    node: &'a Map,
}

impl<'a> SchemaNode<'a> {
    pub fn new(node: &'a Map) -> Self {
        SchemaNode { node }
    }

    /// Wraps a value if it is a map.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_map().map(SchemaNode::new)
    }

    pub fn schema_type(&self) -> SchemaType {
        SchemaType::of(self.node)
    }

    /// Returns the `properties` map, if any.
    pub fn properties(&self) -> Option<&'a Map> {
        self.node.get_map("properties")
    }

    /// Returns the `items` node, if it is a map.
    pub fn items(&self) -> Option<SchemaNode<'a>> {
        self.node.get("items").and_then(SchemaNode::from_value)
    }

    /// Returns the `additionalProperties` node, if it is a map.
    pub fn additional_properties(&self) -> Option<SchemaNode<'a>> {
        self.node
            .get("additionalProperties")
            .and_then(SchemaNode::from_value)
    }

    /// Returns true only when `nullable` is literally `true`.
    pub fn is_nullable(&self) -> bool {
        self.node.get("nullable").and_then(Value::as_bool) == Some(true)
    }

    pub fn default_value(&self) -> Option<&'a Value> {
        self.node.get("default")
    }

    pub fn description(&self) -> &'a str {
        self.node.get_str("description").unwrap_or("")
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &'a Map {
        self.node
    }
}
