//! Reconciliation: apply an incoming diff, let watchers react to a bounded
//! fixpoint, and report the net change and the watcher-only change
//! separately.

use indexmap::IndexSet;
use serde_json::Value;

use crate::diff::apply::apply;
use crate::diff::compute::Differ;
use crate::diff::types::Diff;
use crate::watch::{MatchCursor, WatcherRegistry};

/// Upper bound on watcher fixpoint rounds per reconciliation.
pub const MAX_ITERATIONS: usize = 10;

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// Total net change since the call began (for broadcast to all other
    /// consumers).
    pub final_diff: Diff,
    /// Change attributable to watchers only (for the originator, which
    /// already has the part it sent).
    pub extra_diff: Diff,
}

/// True iff the diff is guaranteed to have no effect when applied.
pub fn is_pointless(diff: &Diff) -> bool {
    diff.is_empty()
}

/// One logical tree: the live root value plus its registered watchers.
///
/// Created once per tree instance and passed explicitly to every
/// operation; distinct contexts are fully independent. Reconciliation
/// takes `&mut self`, so at most one run can be in flight per context.
#[derive(Debug)]
pub struct ReconcileContext {
    root: Value,
    watchers: WatcherRegistry,
    differ: Differ,
}

impl ReconcileContext {
    pub fn new(root: Value) -> Self {
        Self::with_differ(root, Differ::default())
    }

    pub fn with_differ(root: Value, differ: Differ) -> Self {
        ReconcileContext {
            root,
            watchers: WatcherRegistry::new(),
            differ,
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Direct mutable access to the live tree, for seeding and for callers
    /// that edit outside a reconciliation run.
    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Register a watcher on this tree.
    pub fn watch<F>(&mut self, pattern: &str, callback: F)
    where
        F: FnMut(&mut MatchCursor) + 'static,
    {
        self.watchers.watch(pattern, callback);
    }

    /// Apply an incoming diff, run watchers to a bounded fixpoint, and
    /// split the net change from the watcher-only change.
    ///
    /// Each round notifies watchers with the pending diff's paths expanded
    /// to every descendant reachable inside newly-assigned container
    /// values, measures what the callbacks changed, re-applies that
    /// measurement (idempotent normalization, keeps the diff
    /// representation canonical), and feeds it into the next round.
    /// Hitting the iteration cap logs a warning and returns the
    /// best-effort result; watcher panics propagate to the caller.
    pub fn process_incoming_diff(&mut self, client_diff: &Diff) -> ReconcileOutcome {
        let before = self.root.clone();
        apply(&mut self.root, client_diff);
        let after_client = self.root.clone();

        let mut pending = client_diff.clone();
        for round in 0..MAX_ITERATIONS {
            if pending.is_empty() {
                break;
            }
            let round_before = self.root.clone();
            let changed = expand_changed_paths(&pending);
            self.watchers.notify(&mut self.root, &changed);

            let round_diff = self.differ.diff(&round_before, &self.root);
            apply(&mut self.root, &round_diff);
            pending = round_diff;

            if round == MAX_ITERATIONS - 1 && !pending.is_empty() {
                tracing::warn!(
                    rounds = MAX_ITERATIONS,
                    pending_ops = pending.len(),
                    "watcher fixpoint did not settle; possible watcher cycle"
                );
            }
        }

        ReconcileOutcome {
            final_diff: self.differ.diff(&before, &self.root),
            extra_diff: self.differ.diff(&after_client, &self.root),
        }
    }
}

/// The diff's paths plus every descendant path reachable inside its
/// newly-assigned container values, deduplicated in first-seen order.
///
/// The expansion is what lets a watcher registered on a nested path fire
/// even when an ancestor was replaced wholesale.
fn expand_changed_paths(diff: &Diff) -> Vec<String> {
    let mut paths: IndexSet<String> = IndexSet::new();
    for op in diff {
        paths.insert(op.path().to_string());
        if !op.is_delete() {
            collect_sub_paths(op.path(), op.value(), &mut paths);
        }
    }
    paths.into_iter().collect()
}

fn collect_sub_paths(base: &str, value: &Value, paths: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = format!("{base}/{key}");
                paths.insert(path.clone());
                collect_sub_paths(&path, child, paths);
            }
        }
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                let path = format!("{base}/{idx}[]");
                paths.insert(path.clone());
                collect_sub_paths(&path, child, paths);
            }
        }
        _ => {}
    }
}
