//! Slash-delimited tree path utilities.
//!
//! Paths address nodes in a JSON-like tree as `/`-joined segment strings,
//! e.g. `users/alice/name`. A segment that addresses an array element may
//! carry a trailing `[]` marker (`items/2[]`); the marker is informational
//! and must be stripped before the segment is used as an access key.
//!
//! # Example
//!
//! ```
//! use treesync_path::{split_path, join_path, access_key, has_array_marker};
//!
//! let segments = split_path("items/2[]/name");
//! assert_eq!(segments, vec!["items", "2[]", "name"]);
//!
//! assert!(has_array_marker(&segments[1]));
//! assert_eq!(access_key(&segments[1]), "2");
//!
//! assert_eq!(join_path(&segments), "items/2[]/name");
//! ```

use serde_json::Value;

/// The suffix marking a path segment as an array element.
pub const ARRAY_MARKER: &str = "[]";

/// Split a path string into raw segments (markers preserved).
///
/// The empty string splits into no segments.
///
/// # Example
///
/// ```
/// use treesync_path::split_path;
///
/// assert_eq!(split_path(""), Vec::<String>::new());
/// assert_eq!(split_path("a"), vec!["a"]);
/// assert_eq!(split_path("a/b/0[]"), vec!["a", "b", "0[]"]);
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').map(str::to_string).collect()
}

/// Join segments back into a path string.
pub fn join_path(segments: &[String]) -> String {
    segments.join("/")
}

/// Strip the `[]` array-element marker from a segment, if present.
///
/// # Example
///
/// ```
/// use treesync_path::access_key;
///
/// assert_eq!(access_key("2[]"), "2");
/// assert_eq!(access_key("name"), "name");
/// ```
pub fn access_key(segment: &str) -> &str {
    segment.strip_suffix(ARRAY_MARKER).unwrap_or(segment)
}

/// Check whether a segment carries the `[]` array-element marker.
pub fn has_array_marker(segment: &str) -> bool {
    segment.ends_with(ARRAY_MARKER)
}

/// Parse a segment (marker-stripped) as a non-negative array index.
///
/// # Example
///
/// ```
/// use treesync_path::parse_index;
///
/// assert_eq!(parse_index("2"), Some(2));
/// assert_eq!(parse_index("2[]"), Some(2));
/// assert_eq!(parse_index("name"), None);
/// assert_eq!(parse_index("-1"), None);
/// ```
pub fn parse_index(segment: &str) -> Option<usize> {
    access_key(segment).parse().ok()
}

/// The parent prefix of a path, or the empty string for a single segment.
///
/// # Example
///
/// ```
/// use treesync_path::parent_path;
///
/// assert_eq!(parent_path("a/b/c"), "a/b");
/// assert_eq!(parent_path("a"), "");
/// ```
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The final segment of a path (marker preserved).
pub fn last_segment(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Iterate the strict ancestor prefixes of a path, shortest first.
///
/// A single-segment path has no strict ancestors.
///
/// # Example
///
/// ```
/// use treesync_path::ancestors;
///
/// let prefixes: Vec<&str> = ancestors("a/b/c").collect();
/// assert_eq!(prefixes, vec!["a", "a/b"]);
/// assert_eq!(ancestors("a").count(), 0);
/// ```
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .filter(|&(_, c)| c == '/')
        .map(move |(idx, _)| &path[..idx])
}

/// Check whether `candidate` is a strict descendant path of `parent`.
///
/// # Example
///
/// ```
/// use treesync_path::is_strict_descendant;
///
/// assert!(is_strict_descendant("user/name", "user"));
/// assert!(!is_strict_descendant("user", "user"));
/// assert!(!is_strict_descendant("username", "user"));
/// ```
pub fn is_strict_descendant(candidate: &str, parent: &str) -> bool {
    candidate.len() > parent.len() + 1
        && candidate.starts_with(parent)
        && candidate.as_bytes()[parent.len()] == b'/'
}

/// Navigate a value by path segments (read-only).
///
/// Markers are stripped from each segment; array segments must parse as
/// indices. An explicit `null` is a present value; a missing key, an
/// out-of-range index, or a primitive intermediate yields `None`.
///
/// # Example
///
/// ```
/// use treesync_path::get;
/// use serde_json::json;
///
/// let doc = json!({"items": [{"name": "a"}, {"name": "b"}]});
/// let path = vec!["items".to_string(), "1[]".to_string(), "name".to_string()];
/// assert_eq!(get(&doc, &path), Some(&json!("b")));
/// ```
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for segment in path {
        let key = access_key(segment);
        match current {
            Value::Array(arr) => {
                let idx: usize = key.parse().ok()?;
                current = arr.get(idx)?;
            }
            Value::Object(map) => {
                current = map.get(key)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Navigate a value by path segments (mutable).
pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for segment in path {
        let key = access_key(segment);
        match current {
            Value::Array(arr) => {
                let idx: usize = key.parse().ok()?;
                current = arr.get_mut(idx)?;
            }
            Value::Object(map) => {
                current = map.get_mut(key)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path(""), Vec::<String>::new());
        assert_eq!(split_path("a"), vec!["a"]);
        assert_eq!(split_path("a/b"), vec!["a", "b"]);
        assert_eq!(split_path("items/10[]/x"), vec!["items", "10[]", "x"]);
    }

    #[test]
    fn test_join_roundtrip() {
        for path in ["a", "a/b", "items/2[]/name"] {
            assert_eq!(join_path(&split_path(path)), path);
        }
    }

    #[test]
    fn test_access_key() {
        assert_eq!(access_key("2[]"), "2");
        assert_eq!(access_key("name"), "name");
        // Only a trailing marker is stripped
        assert_eq!(access_key("a[]b"), "a[]b");
    }

    #[test]
    fn test_has_array_marker() {
        assert!(has_array_marker("0[]"));
        assert!(!has_array_marker("0"));
        assert!(!has_array_marker("name"));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("10[]"), Some(10));
        assert_eq!(parse_index("name"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index(""), None);
    }

    #[test]
    fn test_parent_and_last() {
        assert_eq!(parent_path("a/b/c"), "a/b");
        assert_eq!(parent_path("a"), "");
        assert_eq!(last_segment("a/b/2[]"), "2[]");
        assert_eq!(last_segment("a"), "a");
    }

    #[test]
    fn test_ancestors() {
        let prefixes: Vec<&str> = ancestors("a/b/c/d").collect();
        assert_eq!(prefixes, vec!["a", "a/b", "a/b/c"]);
        assert_eq!(ancestors("solo").count(), 0);
    }

    #[test]
    fn test_is_strict_descendant() {
        assert!(is_strict_descendant("user/name", "user"));
        assert!(is_strict_descendant("user/a/b", "user"));
        assert!(!is_strict_descendant("user", "user"));
        assert!(!is_strict_descendant("username", "user"));
        assert!(!is_strict_descendant("use", "user"));
    }

    #[test]
    fn test_get_object() {
        let doc = json!({"foo": {"bar": 42}});
        let path = split_path("foo/bar");
        assert_eq!(get(&doc, &path), Some(&json!(42)));
        assert_eq!(get(&doc, &split_path("foo/missing")), None);
    }

    #[test]
    fn test_get_array_with_marker() {
        let doc = json!({"items": [10, 20, 30]});
        assert_eq!(get(&doc, &split_path("items/1[]")), Some(&json!(20)));
        assert_eq!(get(&doc, &split_path("items/1")), Some(&json!(20)));
        assert_eq!(get(&doc, &split_path("items/3[]")), None);
        assert_eq!(get(&doc, &split_path("items/x")), None);
    }

    #[test]
    fn test_get_explicit_null_is_present() {
        let doc = json!({"foo": null});
        assert_eq!(get(&doc, &split_path("foo")), Some(&Value::Null));
    }

    #[test]
    fn test_get_through_primitive() {
        let doc = json!({"foo": 1});
        assert_eq!(get(&doc, &split_path("foo/bar")), None);
    }

    #[test]
    fn test_get_mut() {
        let mut doc = json!({"a": [1, 2]});
        *get_mut(&mut doc, &split_path("a/0[]")).unwrap() = json!(99);
        assert_eq!(doc, json!({"a": [99, 2]}));
    }
}
