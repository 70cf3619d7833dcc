//! Slash-string path helpers.
//!
//! Paths here are browser-style: `/`-separated, with host-defined entry
//! names (dots, spaces, anything but `/`). They are deliberately plain
//! strings rather than `std::path` values - platform separators and prefix
//! components have no meaning in a host-owned tree.

use crate::ErrorKind;

/// Whether `path` is absolute (starts with `/`).
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Split on the first separator: `"a/b/c"` -> `("a", "b/c")`,
/// `"a"` -> `("a", "")`.
pub fn split_first(path: &str) -> (&str, &str) {
    match path.find('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => (path, ""),
    }
}

/// Split on the last separator: `"a/b/c"` -> `("a/b", "c")`,
/// `"c"` -> `("", "c")`.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Join two path fragments with a single separator. Either side may be
/// empty; a `/` base stays a single leading slash.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

/// Express `path` relative to the absolute `root`.
///
/// The contract is deliberately asymmetric: an absolute `path` must equal
/// `root` or be a descendant of it (anything else is `InvalidPath`), while a
/// relative `path` is taken as already root-relative and passed through.
pub fn relative_to(root: &str, path: &str) -> Result<String, ErrorKind> {
    if !is_absolute(path) {
        return Ok(path.trim_end_matches('/').to_string());
    }
    if path == root {
        return Ok(String::new());
    }
    let rest = if root == "/" {
        Some(&path[1..])
    } else {
        match path.strip_prefix(root) {
            Some(rest) if rest.starts_with('/') => Some(&rest[1..]),
            _ => None,
        }
    };
    match rest {
        Some(rest) => Ok(rest.trim_end_matches('/').to_string()),
        None => Err(ErrorKind::InvalidPath(format!(
            "{path} is not under {root}"
        ))),
    }
}
