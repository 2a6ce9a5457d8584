//! Forcing numeric schema fields to accept null.

use crate::document::Document;
use crate::schema::{SchemaNode, SchemaType};
use crate::value::{Map, Value};

/// Fields with this name are never made nullable, at any depth.
pub const NON_NULLABLE_FIELD: &str = "index";

/// Marks every `integer` and `number` schema node as `nullable: true`.
///
/// Covers each operation's request body, responses and parameters, and every
/// schema under `components.schemas`. A node's field name is the map key it
/// sits under; list elements inherit the name of their list. Returns the
/// number of nodes changed, so a second run returns 0.
pub fn normalize_nullability(doc: &mut Document) -> usize {
    let mut count = 0;

    if let Some(paths) = doc.paths_mut() {
        for (endpoint, item) in paths.iter_mut() {
            let Some(methods) = item.as_map_mut() else {
                continue;
            };
            for (method, operation) in methods.iter_mut() {
                let Some(operation) = operation.as_map_mut() else {
                    continue;
                };
                let changed = normalize_operation(operation);
                if changed > 0 {
                    tracing::debug!(endpoint = %endpoint, method = %method, changed, "made numeric fields nullable");
                }
                count += changed;
            }
        }
    }

    if let Some(schemas) = doc
        .components_mut()
        .and_then(|components| components.get_map_mut("schemas"))
    {
        for (_, schema) in schemas.iter_mut() {
            count += normalize_value(schema, "");
        }
    }

    tracing::info!(count, "numeric fields made nullable");
    count
}

fn normalize_operation(operation: &mut Map) -> usize {
    let mut count = 0;

    if let Some(body) = operation.get_mut("requestBody") {
        count += normalize_value(body, "");
    }
    if let Some(responses) = operation.get_map_mut("responses") {
        for (_, response) in responses.iter_mut() {
            count += normalize_value(response, "");
        }
    }
    if let Some(parameters) = operation.get_mut("parameters") {
        count += normalize_value(parameters, "");
    }

    count
}

/// Normalizes a subtree whose root sits under `field_name`.
pub fn normalize_value(value: &mut Value, field_name: &str) -> usize {
    match value {
        Value::Map(node) => {
            let mut count = 0;
            if needs_nullable(node, field_name) {
                node.set("nullable", true);
                count += 1;
            }
            for (key, child) in node.iter_mut() {
                if child.is_container() {
                    count += normalize_value(child, key);
                }
            }
            count
        }
        Value::List(items) => items
            .iter_mut()
            .map(|item| normalize_value(item, field_name))
            .sum(),
        _ => 0,
    }
}

fn needs_nullable(node: &Map, field_name: &str) -> bool {
    let schema = SchemaNode::new(node);
    match schema.schema_type() {
        SchemaType::Integer | SchemaType::Number => {
            field_name != NON_NULLABLE_FIELD && !schema.is_nullable()
        }
        SchemaType::Object
        | SchemaType::Array
        | SchemaType::String
        | SchemaType::Boolean
        | SchemaType::Null
        | SchemaType::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn body_doc(properties: &str) -> Document {
        Document::from_json(&format!(
            r#"{{"paths":{{"/ports":{{"put":{{"requestBody":{{"content":{{"application/json":
                {{"schema":{{"type":"object","properties":{}}}}}}}}}}}}}}}}}"#,
            properties
        ))
        .unwrap()
    }

    fn body_properties(doc: &Document) -> &Map {
        doc.paths()
            .and_then(|p| p.get_map("/ports"))
            .and_then(|e| e.get_map("put"))
            .and_then(|o| o.get_map("requestBody"))
            .and_then(|b| b.get_map("content"))
            .and_then(|c| c.get_map("application/json"))
            .and_then(|j| j.get_map("schema"))
            .and_then(|s| s.get_map("properties"))
            .unwrap()
    }

    #[test]
    fn test_index_field_stays_non_nullable() {
        let mut doc = body_doc(
            r#"{"index":{"type":"integer"},"mtu":{"type":"integer"},"ratio":{"type":"number"},"name":{"type":"string"}}"#,
        );
        assert_eq!(normalize_nullability(&mut doc), 2);

        let props = body_properties(&doc);
        assert_eq!(props.get_map("index").unwrap().get("nullable"), None);
        assert_eq!(props.get_map("mtu").unwrap().get("nullable"), Some(&Value::Bool(true)));
        assert_eq!(props.get_map("ratio").unwrap().get("nullable"), Some(&Value::Bool(true)));
        assert_eq!(props.get_map("name").unwrap().get("nullable"), None);
    }

    #[test]
    fn test_index_exception_applies_at_any_depth() {
        let mut doc = body_doc(
            r#"{"ports":{"type":"array","items":{"type":"object","properties":{
                "index":{"type":"integer"},"speed":{"type":"integer"}}}}}"#,
        );
        assert_eq!(normalize_nullability(&mut doc), 1);

        let item_props = body_properties(&doc)
            .get_map("ports")
            .and_then(|p| p.get_map("items"))
            .and_then(|i| i.get_map("properties"))
            .unwrap();
        assert_eq!(item_props.get_map("index").unwrap().get("nullable"), None);
        assert_eq!(
            item_props.get_map("speed").unwrap().get("nullable"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut doc = body_doc(r#"{"a":{"type":"integer"},"b":{"type":"number","nullable":false}}"#);
        assert_eq!(normalize_nullability(&mut doc), 2);
        let snapshot = doc.clone();
        assert_eq!(normalize_nullability(&mut doc), 0);
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_responses_parameters_and_components_are_covered() {
        let mut doc = Document::from_json(
            r#"{"paths":{"/a":{"get":{
                   "parameters":[{"name":"limit","in":"query","schema":{"type":"integer"}}],
                   "responses":{"200":{"content":{"application/json":{"schema":{"type":"number"}}}}}}}},
                "components":{"schemas":{"Count":{"type":"integer"},
                   "Obj":{"type":"object","properties":{"n":{"type":"number","nullable":true}}}}}}"#,
        )
        .unwrap();

        assert_eq!(normalize_nullability(&mut doc), 3);
        assert_eq!(
            doc.components().unwrap().get_map("schemas").unwrap().get("Count"),
            Some(&from_json(r#"{"type":"integer","nullable":true}"#).unwrap())
        );
    }

    #[test]
    fn test_list_elements_inherit_field_name() {
        let mut value = from_json(r#"{"index":[{"type":"integer"}],"other":[{"type":"integer"}]}"#).unwrap();
        assert_eq!(normalize_value(&mut value, ""), 1);
        assert_eq!(
            value,
            from_json(r#"{"index":[{"type":"integer"}],"other":[{"type":"integer","nullable":true}]}"#).unwrap()
        );
    }
}
