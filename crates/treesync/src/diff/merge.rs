//! Merging two sequential diffs into one net diff.
//!
//! Merging enforces strict sequential consistency: the second diff must be
//! applicable to a tree that already absorbed the first. Combinations that
//! cannot be sequenced (editing under a deleted subtree, adding a child to
//! a path that became a primitive) are rejected, never resolved.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use treesync_path::{ancestors, is_strict_descendant};

use crate::diff::types::{is_delete_sentinel, Diff, DiffOp};

/// A logically impossible combination of two sequential diffs.
///
/// Callers must treat this as a sequencing bug and reject the operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MergeConflict {
    #[error("cannot change '{path}': parent '{parent}' was deleted by the earlier diff")]
    DeletedParent { path: String, parent: String },
    #[error("cannot change '{path}': parent '{parent}' was replaced with a primitive by the earlier diff")]
    PrimitiveParent { path: String, parent: String },
}

/// Merge two sequential diffs into a single net diff.
///
/// Same-path ops keep the first diff's position with the second diff's
/// value. An op in `b` on a parent path obsoletes any ops of `a` on its
/// strict descendants (a valid override, not a conflict).
pub fn merge(a: &Diff, b: &Diff) -> Result<Diff, MergeConflict> {
    if a.is_empty() {
        return Ok(b.clone());
    }
    if b.is_empty() {
        return Ok(a.clone());
    }

    let mut merged: IndexMap<String, Value> = IndexMap::new();
    for op in a {
        merged.insert(op.path().to_string(), op.value().clone());
    }

    for op in b {
        for parent in ancestors(op.path()) {
            let Some(parent_value) = merged.get(parent) else {
                continue;
            };
            if is_delete_sentinel(parent_value) {
                return Err(MergeConflict::DeletedParent {
                    path: op.path().to_string(),
                    parent: parent.to_string(),
                });
            }
            // Null counts as an absent slot, not a primitive: a later
            // child write materializes containers over it.
            let is_primitive = !parent_value.is_object()
                && !parent_value.is_array()
                && !parent_value.is_null();
            if is_primitive {
                return Err(MergeConflict::PrimitiveParent {
                    path: op.path().to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        merged.retain(|existing, _| !is_strict_descendant(existing, op.path()));
        merged.insert(op.path().to_string(), op.value().clone());
    }

    Ok(merged.into_iter().map(|(p, v)| DiffOp(p, v)).collect())
}
