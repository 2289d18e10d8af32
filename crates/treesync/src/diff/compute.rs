//! Diff computation: walk two snapshots and emit the minimal set of ops
//! that transforms the first into the second.
//!
//! Subtrees that have drifted too far apart (salvage ratio below the
//! threshold) are replaced wholesale instead of being diffed granularly,
//! which keeps diffs small when two subtrees are structurally unrelated.
//!
//! Snapshots are compared level by level; the path grammar has no segment
//! for the root itself, so both roots are expected to be containers of the
//! same kind.

use indexmap::IndexSet;
use serde_json::Value;
use treesync_path::ARRAY_MARKER;

use crate::diff::types::{Diff, DiffOp};
use crate::value::deep_equal;

/// Diff two snapshots with the default salvage threshold.
pub fn diff(before: &Value, after: &Value) -> Diff {
    Differ::default().diff(before, after)
}

/// Snapshot differ with a configurable salvage threshold.
#[derive(Debug, Clone, Copy)]
pub struct Differ {
    /// Similarity cutoff in `[0, 1]`. A subtree pair scoring below it is
    /// replaced wholesale instead of diffed granularly.
    pub salvage_threshold: f64,
}

impl Default for Differ {
    fn default() -> Self {
        Differ {
            salvage_threshold: 0.5,
        }
    }
}

impl Differ {
    pub fn new(salvage_threshold: f64) -> Self {
        Differ { salvage_threshold }
    }

    /// Produce the diff that transforms `before` into `after`.
    pub fn diff(&self, before: &Value, after: &Value) -> Diff {
        let mut out = Diff::new();
        self.diff_level(before, after, &mut out);
        out
    }

    fn diff_level(&self, before: &Value, after: &Value, out: &mut Diff) {
        let marker = if before.is_array() { ARRAY_MARKER } else { "" };
        for key in union_keys(before, after) {
            let segment = format!("{key}{marker}");
            match (child(before, &key), child(after, &key)) {
                (None, Some(after_val)) => out.push(segment, after_val.clone()),
                (Some(_), None) => out.push_delete(segment),
                (Some(before_val), Some(after_val)) => {
                    if !deep_equal(before_val, after_val) {
                        self.diff_subtree(before_val, after_val, &segment, out);
                    }
                }
                (None, None) => {}
            }
        }
    }

    fn diff_subtree(&self, before: &Value, after: &Value, prefix: &str, out: &mut Diff) {
        let same_kind = (before.is_object() && after.is_object())
            || (before.is_array() && after.is_array());
        if !same_kind || salvage_ratio(before, after) < self.salvage_threshold {
            out.push(prefix, after.clone());
            return;
        }
        for DiffOp(path, value) in self.diff(before, after) {
            out.push(format!("{prefix}/{path}"), value);
        }
    }
}

/// Similarity score in `[0, 1]` between two values.
///
/// Kind mismatch scores 0; equal primitives (and two nulls) score 1.
/// Arrays average elementwise scores over the longer length, out-of-range
/// indices contributing 0. Objects sum scores over keys present in both
/// sides and divide by the size of the key *union*, so one-sided keys
/// penalize the score without contributing to it.
pub fn salvage_ratio(a: &Value, b: &Value) -> f64 {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            let max_len = x.len().max(y.len());
            if max_len == 0 {
                return 1.0;
            }
            let total: f64 = x.iter().zip(y).map(|(u, v)| salvage_ratio(u, v)).sum();
            total / max_len as f64
        }
        (Value::Object(x), Value::Object(y)) => {
            let union: IndexSet<&String> = x.keys().chain(y.keys()).collect();
            if union.is_empty() {
                return 1.0;
            }
            let total: f64 = x
                .iter()
                .filter_map(|(k, u)| y.get(k).map(|v| salvage_ratio(u, v)))
                .sum();
            total / union.len() as f64
        }
        (Value::Array(_), _)
        | (_, Value::Array(_))
        | (Value::Object(_), _)
        | (_, Value::Object(_)) => 0.0,
        _ => {
            if deep_equal(a, b) {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Keys (objects) or indices (arrays) of both sides, before-side order
/// first, after-only entries appended.
fn union_keys(before: &Value, after: &Value) -> Vec<String> {
    let mut keys: IndexSet<String> = IndexSet::new();
    for side in [before, after] {
        match side {
            Value::Object(map) => keys.extend(map.keys().cloned()),
            Value::Array(arr) => keys.extend((0..arr.len()).map(|i| i.to_string())),
            _ => {}
        }
    }
    keys.into_iter().collect()
}

fn child<'a>(parent: &'a Value, key: &str) -> Option<&'a Value> {
    match parent {
        Value::Object(map) => map.get(key),
        Value::Array(arr) => arr.get(key.parse::<usize>().ok()?),
        _ => None,
    }
}
