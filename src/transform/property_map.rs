//! Turning single-key nested objects into dynamic maps.
//!
//! Vendor documents describe a keyed collection such as
//! `{"gateway": {"properties": {"gateway_name": {...}}}}` with one example
//! key. SDK generators need `additionalProperties` instead, so each
//! request-body property with exactly one inner property is rewritten to
//! `{"properties": {}, "additionalProperties": {...}}`.

use crate::config::Exclusions;
use crate::document::{Document, PATHS};
use crate::error::StructureError;
use crate::value::{Map, Value};
use serde::Serialize;

const WRITE_METHODS: [&str; 2] = ["put", "patch"];
const JSON_MEDIA_TYPE: &str = "application/json";

/// MapConversion identifies one rewritten request-body property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapConversion {
    pub path: String,
    pub method: String,
    pub property: String,
}

/// Rewrites single-property request-body objects of `put`/`patch` operations.
///
/// Paths starting with an excluded prefix are skipped. Properties with zero
/// or several inner properties are left alone, which also makes a second run
/// a no-op. Fails if the document has no `paths` map.
pub fn convert_single_property_objects(
    doc: &mut Document,
    exclusions: &Exclusions,
) -> Result<Vec<MapConversion>, StructureError> {
    let paths = match doc.root_mut().get_mut(PATHS) {
        Some(Value::Map(paths)) => paths,
        Some(other) => return Err(StructureError::not_a_map(PATHS, other.kind())),
        None => return Err(StructureError::missing_section(PATHS)),
    };

    let mut conversions = Vec::new();

    for (path, item) in paths.iter_mut() {
        if exclusions.has_excluded_prefix(path) {
            continue;
        }
        let Some(methods) = item.as_map_mut() else {
            continue;
        };

        for method in WRITE_METHODS {
            let Some(properties) = methods
                .get_map_mut(method)
                .and_then(body_schema_properties)
            else {
                continue;
            };

            for (property, node) in properties.iter_mut() {
                let Some(node) = node.as_map_mut() else {
                    continue;
                };
                if collapse_single_property(node) {
                    tracing::debug!(path = %path, method, property = %property, "converted to additionalProperties");
                    conversions.push(MapConversion {
                        path: path.clone(),
                        method: method.to_string(),
                        property: property.clone(),
                    });
                }
            }
        }
    }

    tracing::info!(count = conversions.len(), "converted single-property objects");
    Ok(conversions)
}

fn body_schema_properties(operation: &mut Map) -> Option<&mut Map> {
    operation
        .get_map_mut("requestBody")?
        .get_map_mut("content")?
        .get_map_mut(JSON_MEDIA_TYPE)?
        .get_map_mut("schema")?
        .get_map_mut("properties")
}

/// Moves the only inner property of `node` into `additionalProperties`.
///
/// Returns false, leaving the node unchanged, unless `properties` holds
/// exactly one entry.
pub fn collapse_single_property(node: &mut Map) -> bool {
    let inner = match node.get_map("properties") {
        Some(properties) if properties.len() == 1 => properties.values().next().cloned(),
        _ => None,
    };
    let Some(inner) = inner else {
        return false;
    };

    node.set("additionalProperties", inner);
    node.set("properties", Map::new());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn request_doc(path: &str, method: &str, properties: &str) -> Document {
        Document::from_json(&format!(
            r#"{{"paths":{{"{}":{{"{}":{{"requestBody":{{"content":{{"application/json":
                {{"schema":{{"type":"object","properties":{}}}}}}}}}}}}}}}}}"#,
            path, method, properties
        ))
        .unwrap()
    }

    fn property<'a>(doc: &'a Document, path: &str, method: &str, name: &str) -> &'a Map {
        doc.paths()
            .and_then(|p| p.get_map(path))
            .and_then(|e| e.get_map(method))
            .and_then(body_schema_properties_ref)
            .and_then(|props| props.get_map(name))
            .unwrap()
    }

    fn body_schema_properties_ref(operation: &Map) -> Option<&Map> {
        operation
            .get_map("requestBody")?
            .get_map("content")?
            .get_map(JSON_MEDIA_TYPE)?
            .get_map("schema")?
            .get_map("properties")
    }

    const GATEWAYS: &str = r#"{
        "gateway": {"type":"object","properties":{"gateway_name":{"type":"object","properties":{"enable":{"type":"boolean"}}}}},
        "pair": {"type":"object","properties":{"a":{"type":"string"},"b":{"type":"string"}}},
        "empty": {"type":"object","properties":{}}
    }"#;

    #[test]
    fn test_arity_guard() {
        let mut doc = request_doc("/gateways", "put", GATEWAYS);
        let conversions = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap();

        assert_eq!(
            conversions,
            vec![MapConversion {
                path: "/gateways".into(),
                method: "put".into(),
                property: "gateway".into(),
            }]
        );
        assert_eq!(
            Value::Map(property(&doc, "/gateways", "put", "gateway").clone()),
            from_json(
                r#"{"type":"object","properties":{},
                    "additionalProperties":{"type":"object","properties":{"enable":{"type":"boolean"}}}}"#
            )
            .unwrap()
        );
        assert_eq!(property(&doc, "/gateways", "put", "pair").get_map("properties").unwrap().len(), 2);
        assert!(!property(&doc, "/gateways", "put", "pair").has("additionalProperties"));
        assert!(!property(&doc, "/gateways", "put", "empty").has("additionalProperties"));
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut doc = request_doc("/gateways", "patch", GATEWAYS);
        let first = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap();
        assert_eq!(first.len(), 1);

        let snapshot = doc.clone();
        let second = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap();
        assert!(second.is_empty());
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_other_methods_untouched() {
        let mut doc = request_doc("/gateways", "post", GATEWAYS);
        let conversions = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap();
        assert!(conversions.is_empty());
    }

    #[test]
    fn test_excluded_prefix_untouched() {
        let mut doc = request_doc("/config/gateways", "put", GATEWAYS);
        let conversions = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap();
        assert!(conversions.is_empty());

        let mut exclusions = Exclusions::default();
        exclusions.excluded_path_prefixes.clear();
        let conversions = convert_single_property_objects(&mut doc, &exclusions).unwrap();
        assert_eq!(conversions.len(), 1);
    }

    #[test]
    fn test_missing_paths_is_structure_error() {
        let mut doc = Document::from_json(r#"{"components":{}}"#).unwrap();
        let err = convert_single_property_objects(&mut doc, &Exclusions::default()).unwrap_err();
        assert_eq!(err, StructureError::missing_section("paths"));
    }
}
