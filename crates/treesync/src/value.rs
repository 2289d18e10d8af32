//! Live-tree primitives: structural equality and path-addressed
//! access/creation/removal over `serde_json::Value`.
//!
//! `set` and `remove` are the only mutation primitives in the engine;
//! watcher callbacks and the patch applier both go through them.

use serde_json::{Map, Value};
use treesync_path::{access_key, parse_index, split_path};

/// Recursive, shape-sensitive structural equality.
///
/// Object comparison ignores key order. Numbers compare by value, so `1`
/// and `1.0` are equal even though their serde representations differ.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(u, v)| deep_equal(u, v))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| deep_equal(v, w)))
        }
        (Value::Number(x), Value::Number(y)) => {
            x == y
                || matches!((x.as_f64(), y.as_f64()), (Some(u), Some(v)) if u == v)
        }
        _ => a == b,
    }
}

/// Read the value at a `/`-joined path. The empty path addresses the root.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    treesync_path::get(root, &split_path(path))
}

/// Write `value` at `path`, creating intermediate containers on demand.
///
/// Never fails. An intermediate container is created as an Array when the
/// *next* segment (marker-stripped) parses as a non-negative integer,
/// otherwise as an Object. An existing non-container value at an
/// intermediate segment is treated as absent and overwritten. Array index
/// writes past the end pad the array with `Null`.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let segments = split_path(path);
    let Some((final_seg, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for (i, segment) in parents.iter().enumerate() {
        let next_is_index = parse_index(&segments[i + 1]).is_some();
        current = ensure_child(current, access_key(segment), next_is_index);
    }

    let key = access_key(final_seg);
    match current {
        Value::Array(arr) => {
            if let Ok(idx) = key.parse::<usize>() {
                if idx < arr.len() {
                    arr[idx] = value;
                } else {
                    while arr.len() < idx {
                        arr.push(Value::Null);
                    }
                    arr.push(value);
                }
            }
            // A non-numeric key cannot land in an array; the op is dropped.
        }
        Value::Object(map) => {
            map.insert(key.to_string(), value);
        }
        other => {
            // Primitive at the parent position: treated as absent.
            if let Ok(idx) = key.parse::<usize>() {
                let mut arr = vec![Value::Null; idx];
                arr.push(value);
                *other = Value::Array(arr);
            } else {
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                *other = Value::Object(map);
            }
        }
    }
}

/// Remove the value at `path`. A missing parent silently no-ops.
pub fn remove(root: &mut Value, path: &str) {
    let segments = split_path(path);
    let Some((final_seg, parents)) = segments.split_last() else {
        return;
    };
    let Some(parent) = treesync_path::get_mut(root, parents) else {
        return;
    };

    let key = access_key(final_seg);
    match parent {
        Value::Array(arr) => {
            if let Ok(idx) = key.parse::<usize>() {
                if idx < arr.len() {
                    arr.remove(idx);
                }
            }
        }
        Value::Object(map) => {
            // shift_remove keeps the insertion order of the remaining keys;
            // plain remove is a swap_remove under preserve_order.
            map.shift_remove(key);
        }
        _ => {}
    }
}

/// Walk into (or create) the child of `parent` at `key`, normalizing any
/// non-container encountered along the way.
fn ensure_child<'a>(parent: &'a mut Value, key: &str, next_is_index: bool) -> &'a mut Value {
    let idx = match parent {
        Value::Array(_) => key.parse::<usize>().ok(),
        _ => None,
    };
    // An array addressed by a non-numeric key, or a primitive, is treated
    // as absent and replaced by an object.
    if idx.is_none() && !parent.is_object() {
        *parent = Value::Object(Map::new());
    }

    match (parent, idx) {
        (Value::Array(arr), Some(idx)) => {
            while arr.len() <= idx {
                arr.push(Value::Null);
            }
            if !arr[idx].is_object() && !arr[idx].is_array() {
                arr[idx] = new_container(next_is_index);
            }
            &mut arr[idx]
        }
        (Value::Object(map), _) => {
            let slot = map
                .entry(key.to_string())
                .or_insert_with(|| new_container(next_is_index));
            if !slot.is_object() && !slot.is_array() {
                *slot = new_container(next_is_index);
            }
            slot
        }
        (normalized, _) => normalized,
    }
}

fn new_container(array: bool) -> Value {
    if array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}
