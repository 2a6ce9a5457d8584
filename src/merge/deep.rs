//! Generic recursive merge of two trees.

use crate::value::{Map, Value};

/// Merges `overlay` into a copy of `base` and returns the result.
///
/// For each key of the overlay:
/// - keys missing from the base are copied,
/// - two maps are merged recursively,
/// - two lists are combined with [`union_lists`],
/// - anything else is replaced by the overlay value.
///
/// Mismatched value kinds are never an error; the overlay wins.
pub fn merge(base: &Map, overlay: &Map) -> Map {
    let mut result = base.clone();
    merge_into(&mut result, overlay);
    result
}

/// In-place form of [`merge`].
pub fn merge_into(base: &mut Map, overlay: &Map) {
    for (key, value) in overlay.iter() {
        match base.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => base.set(key.clone(), value.clone()),
        }
    }
}

/// Merges a single overlay value into an existing base value.
pub fn merge_value(existing: &mut Value, overlay: &Value) {
    match (existing, overlay) {
        (Value::Map(base), Value::Map(overlay)) => merge_into(base, overlay),
        (Value::List(base), Value::List(overlay)) => union_lists(base, overlay),
        (slot, value) => *slot = value.clone(),
    }
}

/// Combines two lists.
///
/// When neither list holds a list or map, the result is the sorted set of
/// all elements (ascending by [`Value`]'s ordering). Otherwise the base
/// list is kept as is and each overlay element is appended unless an equal
/// element is already present.
pub fn union_lists(base: &mut Vec<Value>, overlay: &[Value]) {
    let all_scalars = base.iter().chain(overlay).all(|item| !item.is_container());

    if all_scalars {
        base.extend(overlay.iter().cloned());
        base.sort();
        base.dedup();
        return;
    }

    for item in overlay {
        if !base.contains(item) {
            base.push(item.clone());
        }
    }
}
