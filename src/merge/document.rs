//! Whole-document merge driver.

use super::{components, deep, paths, servers};
use crate::document::{Document, COMPONENTS, PATHS, SERVERS};
use crate::value::Value;

/// Merges `overlay` into `base` in place.
///
/// `paths`, `components` and `servers` use their dedicated mergers. Other
/// top-level keys missing from the base are copied; maps and lists follow
/// the deep merge rules; scalars present on both sides keep the base value.
pub fn merge_documents(base: &mut Document, overlay: &Document) {
    let root = base.root_mut();

    for (key, value) in overlay.root().iter() {
        let Some(existing) = root.get_mut(key) else {
            root.set(key.clone(), value.clone());
            continue;
        };

        match (key.as_str(), existing, value) {
            (PATHS, Value::Map(base_paths), Value::Map(overlay_paths)) => {
                paths::merge_paths(base_paths, overlay_paths)
            }
            (COMPONENTS, Value::Map(base_components), Value::Map(overlay_components)) => {
                components::merge_components(base_components, overlay_components)
            }
            (SERVERS, Value::List(base_servers), Value::List(overlay_servers)) => {
                servers::merge_servers(base_servers, overlay_servers)
            }
            (PATHS | COMPONENTS | SERVERS, existing, value) => {
                tracing::warn!(
                    section = %key,
                    base = existing.kind(),
                    overlay = value.kind(),
                    "section has an unexpected shape, keeping the overlay value"
                );
                *existing = value.clone();
            }
            (_, Value::Map(base_map), Value::Map(overlay_map)) => {
                deep::merge_into(base_map, overlay_map)
            }
            (_, Value::List(base_list), Value::List(overlay_list)) => {
                deep::union_lists(base_list, overlay_list)
            }
            _ => {}
        }
    }
}

/// Folds every overlay into `base`, left to right.
pub fn merge_all<'a>(mut base: Document, overlays: impl IntoIterator<Item = &'a Document>) -> Document {
    for (i, overlay) in overlays.into_iter().enumerate() {
        merge_documents(&mut base, overlay);
        tracing::info!(
            overlay = i + 1,
            endpoints = base.path_count(),
            "merged overlay document"
        );
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(json: &str) -> Document {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_top_level_scalars_keep_base() {
        let mut base = doc(r#"{"openapi":"3.0.0","info":{"title":"dc"}}"#);
        merge_documents(
            &mut base,
            &doc(r#"{"openapi":"3.1.0","info":{"version":"6.5"},"x-extra":true}"#),
        );
        assert_eq!(
            base,
            doc(r#"{"openapi":"3.0.0","info":{"title":"dc","version":"6.5"},"x-extra":true}"#)
        );
    }

    #[test]
    fn test_missing_sections_created() {
        let mut base = doc(r#"{"openapi":"3.0.0"}"#);
        merge_documents(
            &mut base,
            &doc(r#"{"paths":{"/a":{}},"components":{"schemas":{}},"servers":[{"url":"u"}]}"#),
        );
        assert_eq!(base.path_count(), 1);
        assert!(base.components().is_some());
        assert!(base.root().get(SERVERS).unwrap().is_list());
    }

    #[test]
    fn test_top_level_lists_union() {
        let mut base = doc(r#"{"tags":["b"],"security":[{"bearer":[]}]}"#);
        merge_documents(
            &mut base,
            &doc(r#"{"tags":["a","b"],"security":[{"bearer":[]},{"basic":[]}]}"#),
        );
        assert_eq!(
            base,
            doc(r#"{"tags":["a","b"],"security":[{"bearer":[]},{"basic":[]}]}"#)
        );
    }

    #[test]
    fn test_merge_all_folds_in_order() {
        let base = doc(r#"{"paths":{"/a":{"get":{"summary":"1"}}}}"#);
        let second = doc(r#"{"paths":{"/a":{"get":{"summary":"2"}},"/b":{}}}"#);
        let third = doc(r#"{"paths":{"/a":{"get":{"summary":"3"}},"/c":{}}}"#);

        let merged = merge_all(base, [&second, &third]);
        assert_eq!(merged.path_count(), 3);
        assert_eq!(
            merged.paths().unwrap().get_map("/a").unwrap().get_map("get").unwrap().get_str("summary"),
            Some("3")
        );
    }
}
