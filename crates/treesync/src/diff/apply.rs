//! Patch application: assignments first, then deletions in an order that
//! keeps array indices valid.

use std::cmp::Ordering;

use serde_json::Value;
use treesync_path::{last_segment, parent_path, parse_index};

use crate::diff::types::{Diff, DiffOp};
use crate::value;

/// Apply a diff to a live tree in place.
///
/// Assignments are applied first, in diff order (last-writer-wins for
/// duplicate paths). Deletions follow, sorted so that within one array the
/// highest index is removed first and a removal never shifts a
/// not-yet-processed lower index. Deletions whose parent is missing
/// silently no-op.
pub fn apply(target: &mut Value, diff: &Diff) {
    let mut assignments: Vec<&DiffOp> = Vec::new();
    let mut deletions: Vec<&DiffOp> = Vec::new();
    for op in diff {
        if op.is_delete() {
            deletions.push(op);
        } else {
            assignments.push(op);
        }
    }

    deletions.sort_by(|a, b| deletion_order(a.path(), b.path()));

    for op in assignments {
        value::set(target, op.path(), op.value().clone());
    }
    for op in deletions {
        value::remove(target, op.path());
    }
}

/// Total ordering for deletion paths.
///
/// Keyed comparison: parent path descending (a deeper parent sorts first,
/// so a subtree is spliced before any ancestor containing it), then the
/// final segment: index segments before key segments, indices numeric
/// descending within one array, keys reverse-lexicographic. Every pair
/// goes through the same key, which keeps the comparator a total order as
/// `sort_by` requires.
fn deletion_order(a: &str, b: &str) -> Ordering {
    let parents = parent_path(b).cmp(parent_path(a));
    if parents != Ordering::Equal {
        return parents;
    }
    match (parse_index(last_segment(a)), parse_index(last_segment(b))) {
        (Some(index_a), Some(index_b)) => index_b.cmp(&index_a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => last_segment(b).cmp(last_segment(a)),
    }
}
