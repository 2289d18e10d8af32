//! Pattern-triggered watchers over changed tree paths.
//!
//! A watcher pairs a path pattern with a callback. Patterns are
//! `/`-joined segments where `*` matches exactly one concrete segment;
//! pattern length must equal the concrete path's length (no
//! recursive-descent wildcards). Concrete segments compare with the `[]`
//! array marker stripped, so a pattern `items/2` fires for the generated
//! path `items/2[]`.
//!
//! Callbacks receive a [`MatchCursor`] instead of raw references into the
//! tree: the cursor re-resolves the matched path through the live root on
//! every access, which lets callbacks both read the matched chain and
//! mutate the tree through the same `set`/`remove` primitives the engine
//! uses.

use serde_json::Value;
use treesync_path::{access_key, join_path, split_path};

use crate::value;

/// Callback invoked on a pattern match.
pub type WatchCallback = Box<dyn FnMut(&mut MatchCursor)>;

struct Watcher {
    pattern: Vec<String>,
    callback: WatchCallback,
}

/// Registered watchers for one tree.
#[derive(Default)]
pub struct WatcherRegistry {
    watchers: Vec<Watcher>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for a path pattern. There is no unregistration.
    pub fn watch<F>(&mut self, pattern: &str, callback: F)
    where
        F: FnMut(&mut MatchCursor) + 'static,
    {
        self.watchers.push(Watcher {
            pattern: split_path(pattern),
            callback: Box::new(callback),
        });
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Run every watcher whose pattern matches one of the changed paths.
    ///
    /// A match fails silently on length mismatch, on a non-wildcard
    /// segment mismatch, or on a missing intermediate node. Callbacks may
    /// mutate the tree through the cursor; later matches in the same
    /// notification see those mutations.
    pub fn notify(&mut self, root: &mut Value, changed_paths: &[String]) {
        for path in changed_paths {
            let segments = split_path(path);
            for watcher in &mut self.watchers {
                let Some(resolved) = match_pattern(root, &watcher.pattern, &segments) else {
                    continue;
                };
                let mut cursor = MatchCursor {
                    root: &mut *root,
                    path: resolved,
                };
                (watcher.callback)(&mut cursor);
            }
        }
    }
}

impl std::fmt::Debug for WatcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherRegistry")
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

/// Match a concrete path against a pattern, walking the live tree.
///
/// Returns the resolved (marker-stripped) segments on success.
fn match_pattern(root: &Value, pattern: &[String], path: &[String]) -> Option<Vec<String>> {
    if pattern.len() != path.len() {
        return None;
    }
    let mut node = root;
    let mut resolved = Vec::with_capacity(path.len());
    for (pattern_seg, path_seg) in pattern.iter().zip(path) {
        let key = access_key(path_seg);
        if pattern_seg != "*" && access_key(pattern_seg) != key {
            return None;
        }
        node = match node {
            Value::Object(map) => map.get(key)?,
            Value::Array(arr) => arr.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
        resolved.push(key.to_string());
    }
    Some(resolved)
}

/// A matched path into the live tree, handed to watcher callbacks.
///
/// Depth 0 is the root; depth `i` is the node reached after consuming `i`
/// path segments; the deepest node is the matched value itself. Every
/// accessor re-resolves through the root, so reads stay valid across the
/// callback's own mutations.
pub struct MatchCursor<'t> {
    root: &'t mut Value,
    path: Vec<String>,
}

impl MatchCursor<'_> {
    /// The resolved concrete segments of the matched path.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The matched path as a `/`-joined string.
    pub fn matched_path(&self) -> String {
        join_path(&self.path)
    }

    pub fn root(&self) -> &Value {
        self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        self.root
    }

    /// The node after consuming `depth` segments (0 = root).
    pub fn node(&self, depth: usize) -> Option<&Value> {
        if depth > self.path.len() {
            return None;
        }
        treesync_path::get(self.root, &self.path[..depth])
    }

    /// The matched value (the deepest node).
    pub fn value(&self) -> Option<&Value> {
        self.node(self.path.len())
    }

    /// Write through the live root; same primitive the patch applier uses,
    /// so the write is picked up by the next reconciliation round.
    pub fn set(&mut self, path: &str, value: Value) {
        value::set(self.root, path, value);
    }

    pub fn remove(&mut self, path: &str) {
        value::remove(self.root, path);
    }

    /// Write a sibling of the matched value (same parent, different key).
    pub fn set_sibling(&mut self, key: &str, value: Value) {
        let Some((_, parents)) = self.path.split_last() else {
            return;
        };
        let path = if parents.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", join_path(parents), key)
        };
        value::set(self.root, &path, value);
    }
}
