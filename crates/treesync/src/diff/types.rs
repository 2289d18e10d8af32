//! Core diff types and the wire codec.
//!
//! A diff is an ordered list of `[path, value]` pairs; the reserved string
//! sentinel `"__DELETE__"` in the value position marks removal of the path.
//! The serde representation is exactly the wire shape:
//! `{"edited": [["a/b", 1], ["c", "__DELETE__"]]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved value marking deletion of a path within a diff.
///
/// Callers owning the schema are responsible for ensuring this literal
/// never occurs as legitimate data.
pub const DELETE_SENTINEL: &str = "__DELETE__";

/// The sentinel as a `Value`, for building deletion ops.
pub fn delete_sentinel() -> Value {
    Value::String(DELETE_SENTINEL.to_string())
}

/// Check whether a value is the deletion sentinel.
pub fn is_delete_sentinel(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == DELETE_SENTINEL)
}

/// A single diff operation: a path and the new value (or the deletion
/// sentinel). Serializes as a two-element `[path, value]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffOp(pub String, pub Value);

impl DiffOp {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        DiffOp(path.into(), value)
    }

    /// A deletion op for the given path.
    pub fn delete(path: impl Into<String>) -> Self {
        DiffOp(path.into(), delete_sentinel())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    pub fn value(&self) -> &Value {
        &self.1
    }

    pub fn is_delete(&self) -> bool {
        is_delete_sentinel(&self.1)
    }
}

/// An ordered sequence of diff operations.
///
/// Order matters only for deletions (the applier re-sorts them); duplicate
/// non-deletion paths are last-writer-wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diff {
    pub edited: Vec<DiffOp>,
}

impl Diff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, value: Value) {
        self.edited.push(DiffOp::new(path, value));
    }

    pub fn push_delete(&mut self, path: impl Into<String>) {
        self.edited.push(DiffOp::delete(path));
    }

    pub fn is_empty(&self) -> bool {
        self.edited.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edited.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffOp> {
        self.edited.iter()
    }
}

impl FromIterator<DiffOp> for Diff {
    fn from_iter<I: IntoIterator<Item = DiffOp>>(iter: I) -> Self {
        Diff {
            edited: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diff {
    type Item = DiffOp;
    type IntoIter = std::vec::IntoIter<DiffOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.edited.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a DiffOp;
    type IntoIter = std::slice::Iter<'a, DiffOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.edited.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sentinel_detection() {
        assert!(is_delete_sentinel(&delete_sentinel()));
        assert!(!is_delete_sentinel(&json!("__DELETE__ ")));
        assert!(!is_delete_sentinel(&json!(null)));
        assert!(DiffOp::delete("a").is_delete());
        assert!(!DiffOp::new("a", json!(1)).is_delete());
    }

    #[test]
    fn wire_shape_serialize() {
        let mut diff = Diff::new();
        diff.push("user/name", json!("Alice"));
        diff.push_delete("items/2[]");

        let encoded = serde_json::to_value(&diff).unwrap();
        assert_eq!(
            encoded,
            json!({"edited": [["user/name", "Alice"], ["items/2[]", "__DELETE__"]]})
        );
    }

    #[test]
    fn wire_shape_deserialize() {
        let diff: Diff =
            serde_json::from_value(json!({"edited": [["x", 5], ["y", "__DELETE__"]]})).unwrap();
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.edited[0], DiffOp::new("x", json!(5)));
        assert!(diff.edited[1].is_delete());
    }

    #[test]
    fn wire_roundtrip() {
        let mut diff = Diff::new();
        diff.push("a/0[]", json!({"nested": [1, 2]}));
        diff.push_delete("b");
        let text = serde_json::to_string(&diff).unwrap();
        let back: Diff = serde_json::from_str(&text).unwrap();
        assert_eq!(back, diff);
    }
}
