//! Merging of the endpoint collection.
//!
//! Endpoints and methods missing from the base are copied wholesale. When an
//! operation exists on both sides its `parameters` and `security` lists get
//! their own dedup rules, and every other list field uses plain membership
//! ([`append_missing`]) instead of the sorted union of [`super::union_lists`].

use super::deep;
use crate::value::{Map, Value};
use std::collections::HashSet;

const PARAMETERS: &str = "parameters";
const SECURITY: &str = "security";

/// Merges the overlay endpoint collection into the base one.
pub fn merge_paths(base: &mut Map, overlay: &Map) {
    for (endpoint, item) in overlay.iter() {
        match base.get_mut(endpoint) {
            Some(existing) => merge_path_item(existing, item),
            None => {
                tracing::debug!(endpoint = %endpoint, "adding endpoint from overlay");
                base.set(endpoint.clone(), item.clone());
            }
        }
    }
}

fn merge_path_item(existing: &mut Value, overlay: &Value) {
    let (base, overlay) = match (existing, overlay) {
        (Value::Map(base), Value::Map(overlay)) => (base, overlay),
        (slot, value) => {
            *slot = value.clone();
            return;
        }
    };

    for (method, operation) in overlay.iter() {
        let Some(slot) = base.get_mut(method) else {
            base.set(method.clone(), operation.clone());
            continue;
        };
        match (slot, operation) {
            (Value::Map(base_op), Value::Map(overlay_op)) => merge_operation(base_op, overlay_op),
            // Path-level parameter lists share the operation-level identity rule.
            (Value::List(base_list), Value::List(overlay_list)) if method == PARAMETERS => {
                merge_parameters(base_list, overlay_list)
            }
            (slot, value) => deep::merge_value(slot, value),
        }
    }
}

/// Merges two operations that share an endpoint and method.
pub fn merge_operation(base: &mut Map, overlay: &Map) {
    for (key, value) in overlay.iter() {
        let Some(existing) = base.get_mut(key) else {
            base.set(key.clone(), value.clone());
            continue;
        };
        match (key.as_str(), existing, value) {
            (PARAMETERS, Value::List(base_list), Value::List(overlay_list)) => {
                merge_parameters(base_list, overlay_list)
            }
            (SECURITY, Value::List(base_list), Value::List(overlay_list)) => {
                merge_security(base_list, overlay_list)
            }
            (PARAMETERS | SECURITY, slot, value) => *slot = value.clone(),
            (_, Value::Map(base_map), Value::Map(overlay_map)) => {
                deep::merge_into(base_map, overlay_map)
            }
            (_, Value::List(base_list), Value::List(overlay_list)) => {
                append_missing(base_list, overlay_list)
            }
            (_, slot, value) => *slot = value.clone(),
        }
    }
}

/// Returns the (name, location) identity of a parameter.
pub fn parameter_identity(param: &Value) -> Option<(String, String)> {
    let param = param.as_map()?;
    let name = param.get_str("name")?;
    let location = param.get_str("in")?;
    Some((name.to_string(), location.to_string()))
}

/// Appends overlay parameters whose (name, location) is not yet present.
///
/// Parameters without a full identity, such as `$ref` entries, are compared
/// structurally instead.
pub fn merge_parameters(base: &mut Vec<Value>, overlay: &[Value]) {
    let mut seen: HashSet<(String, String)> = base.iter().filter_map(parameter_identity).collect();

    for param in overlay {
        match parameter_identity(param) {
            Some(identity) => {
                if seen.insert(identity) {
                    base.push(param.clone());
                }
            }
            None => {
                if !base.contains(param) {
                    base.push(param.clone());
                }
            }
        }
    }
}

/// Combines security requirement lists: base entries first, then novel
/// overlay entries, with structurally equal requirements kept once.
pub fn merge_security(base: &mut Vec<Value>, overlay: &[Value]) {
    let mut merged: Vec<Value> = Vec::with_capacity(base.len() + overlay.len());
    for requirement in base.iter().chain(overlay) {
        if !merged.contains(requirement) {
            merged.push(requirement.clone());
        }
    }
    *base = merged;
}

/// Appends each overlay item that is not already in the list.
///
/// Unlike [`super::union_lists`], scalar lists are never sorted and
/// duplicates already in the base are left alone.
pub fn append_missing(base: &mut Vec<Value>, overlay: &[Value]) {
    for item in overlay {
        if !base.contains(item) {
            base.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn list(json: &str) -> Vec<Value> {
        match from_json(json).unwrap() {
            Value::List(l) => l,
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn test_parameter_dedup_by_name_and_location() {
        let mut base = list(r#"[{"name":"id","in":"query"}]"#);
        merge_parameters(
            &mut base,
            &list(r#"[{"name":"id","in":"query","required":true},{"name":"id","in":"path"}]"#),
        );
        assert_eq!(
            base,
            list(r#"[{"name":"id","in":"query"},{"name":"id","in":"path"}]"#)
        );
    }

    #[test]
    fn test_parameter_without_identity_dedup_structurally() {
        let mut base = list(r##"[{"$ref":"#/components/parameters/Id"}]"##);
        merge_parameters(
            &mut base,
            &list(r##"[{"$ref":"#/components/parameters/Id"},{"$ref":"#/components/parameters/Name"}]"##),
        );
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_overlay_duplicates_collapse() {
        let mut base = Vec::new();
        merge_parameters(
            &mut base,
            &list(r#"[{"name":"a","in":"query"},{"name":"a","in":"query"}]"#),
        );
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_security_dedup_keeps_base_first() {
        let mut base = list(r#"[{"bearer":[]},{"basic":[]},{"bearer":[]}]"#);
        merge_security(&mut base, &list(r#"[{"apiKey":[]},{"basic":[]}]"#));
        assert_eq!(base, list(r#"[{"bearer":[]},{"basic":[]},{"apiKey":[]}]"#));
    }

    #[test]
    fn test_operation_lists_use_membership_not_sorting() {
        let mut base = from_json(r#"{"tags":["z","a","z"]}"#).unwrap();
        let overlay = from_json(r#"{"tags":["b","a"]}"#).unwrap();
        merge_operation(base.as_map_mut().unwrap(), overlay.as_map().unwrap());
        assert_eq!(base, from_json(r#"{"tags":["z","a","z","b"]}"#).unwrap());
    }

    #[test]
    fn test_operation_maps_deep_merge() {
        let mut base = from_json(
            r#"{"responses":{"200":{"description":"ok"}},"summary":"dc","parameters":[{"name":"a","in":"query"}]}"#,
        )
        .unwrap();
        let overlay = from_json(
            r#"{"responses":{"404":{"description":"missing"}},"summary":"campus","parameters":[{"name":"b","in":"query"}]}"#,
        )
        .unwrap();
        merge_operation(base.as_map_mut().unwrap(), overlay.as_map().unwrap());
        assert_eq!(
            base,
            from_json(
                r#"{"responses":{"200":{"description":"ok"},"404":{"description":"missing"}},
                    "summary":"campus",
                    "parameters":[{"name":"a","in":"query"},{"name":"b","in":"query"}]}"#
            )
            .unwrap()
        );
    }

    #[test]
    fn test_merge_paths_copies_missing_endpoints_and_methods() {
        let mut base = from_json(r#"{"/a":{"get":{"summary":"a"}}}"#).unwrap();
        let overlay = from_json(
            r#"{"/a":{"put":{"summary":"put a"}},"/b":{"get":{"summary":"b"}}}"#,
        )
        .unwrap();
        merge_paths(base.as_map_mut().unwrap(), overlay.as_map().unwrap());
        assert_eq!(
            base,
            from_json(
                r#"{"/a":{"get":{"summary":"a"},"put":{"summary":"put a"}},"/b":{"get":{"summary":"b"}}}"#
            )
            .unwrap()
        );
    }

    #[test]
    fn test_path_level_parameters_dedup_by_identity() {
        let mut base = from_json(r#"{"/a":{"parameters":[{"name":"id","in":"path"}]}}"#).unwrap();
        let overlay = from_json(
            r#"{"/a":{"parameters":[{"name":"id","in":"path","description":"x"},{"name":"q","in":"query"}]}}"#,
        )
        .unwrap();
        merge_paths(base.as_map_mut().unwrap(), overlay.as_map().unwrap());
        let params = base.as_map().unwrap().get_map("/a").unwrap().get("parameters").unwrap();
        assert_eq!(params.as_list().unwrap().len(), 2);
    }
}
