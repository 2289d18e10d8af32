//! treesync - path-based structural diff/patch/merge for JSON-like trees.
//!
//! Keeps a shared, arbitrarily-nested `serde_json::Value` tree consistent
//! across sequential edits from different sources:
//!
//! - [`diff::compute`] produces minimal diffs between two snapshots, with a
//!   salvage-ratio heuristic that falls back to whole-subtree replacement
//!   when two subtrees have drifted too far apart;
//! - [`diff::apply`] applies diffs in place, with array-index-aware
//!   deletion ordering;
//! - [`diff::merge`] collapses two sequential diffs into one net diff,
//!   rejecting logically impossible combinations;
//! - [`watch`] matches changed paths against registered patterns and hands
//!   callbacks a live cursor into the tree;
//! - [`reconcile`] orchestrates apply → notify → fixpoint and splits the
//!   net change from the watcher-only change.

pub mod diff;
pub mod reconcile;
pub mod value;
pub mod watch;

pub use diff::apply::apply;
pub use diff::compute::{diff, salvage_ratio, Differ};
pub use diff::merge::{merge, MergeConflict};
pub use diff::types::{delete_sentinel, is_delete_sentinel, Diff, DiffOp, DELETE_SENTINEL};
pub use reconcile::{is_pointless, ReconcileContext, ReconcileOutcome, MAX_ITERATIONS};
pub use watch::{MatchCursor, WatcherRegistry};
