//! Path utilities for building object-store paths.
//!
//! Object paths are `/`-separated, always absolute, and never contain empty,
//! `.` or `..` segments.

/// Normalize a slash-separated path into its segments.
///
/// Empty and `.` segments are dropped. `..` removes the previous segment and
/// is dropped when there is nothing left to remove, so the result can never
/// escape the bucket root.
pub fn normalize_object_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }

    segments
}

/// Join an optional root prefix and a path into an absolute object path
pub fn join_object_path(root: Option<&str>, path: &str) -> String {
    let mut segments = root.map(normalize_object_path).unwrap_or_default();
    segments.extend(normalize_object_path(path));

    let mut joined = String::with_capacity(path.len() + 1);
    for segment in segments {
        joined.push('/');
        joined.push_str(segment);
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}
