//! Path normalization for snapshot keys

use crate::layout::ENCODED_COLON;
use std::path::Path;

/// Normalize a path string into snapshot key form
///
/// This function:
/// 1. Rewrites `\` separators to `/`
/// 2. Rewrites the private-use colon substitute back to `:`
/// 3. Ensures a single leading `/`
///
/// Applying it twice yields the same result.
pub fn normalize_path_string(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 1);
    for c in path.chars() {
        match c {
            '\\' => result.push('/'),
            ENCODED_COLON => result.push(':'),
            other => result.push(other),
        }
    }

    if !result.starts_with('/') {
        result.insert(0, '/');
    }

    result
}

/// Normalize `path` relative to `root`
///
/// The root prefix is removed textually, keeping the separator that follows it.
/// Returns `None` when `path` is not below `root`.
pub fn normalize_relative(root: &Path, path: &Path) -> Option<String> {
    let root_str = root.to_string_lossy();
    let path_str = path.to_string_lossy();
    let rest = path_str.strip_prefix(root_str.as_ref())?;
    if rest.is_empty() {
        return None;
    }
    Some(normalize_path_string(rest))
}
