//! Merging of the shared-definitions collection.

use super::deep;
use crate::value::{Map, Value};

/// Merges `components` sections: section name, then definition name.
///
/// Sections and definitions missing from the base are copied; definitions
/// present on both sides are deep merged.
pub fn merge_components(base: &mut Map, overlay: &Map) {
    for (section, definitions) in overlay.iter() {
        let Some(existing) = base.get_mut(section) else {
            base.set(section.clone(), definitions.clone());
            continue;
        };
        match (existing, definitions) {
            (Value::Map(base_defs), Value::Map(overlay_defs)) => {
                merge_section(section, base_defs, overlay_defs)
            }
            (slot, value) => *slot = value.clone(),
        }
    }
}

fn merge_section(section: &str, base: &mut Map, overlay: &Map) {
    for (name, definition) in overlay.iter() {
        match base.get_mut(name) {
            Some(existing) => {
                tracing::trace!(section, name = %name, "merging shared definition");
                deep::merge_value(existing, definition);
            }
            None => base.set(name.clone(), definition.clone()),
        }
    }
}
