//! Recursive glob matching over the host tree.
//!
//! A pattern is a slash-separated sequence of shell-style wildcard segments
//! (`*`, `?`, character classes), matched level by level: each segment scopes
//! the search one directory deeper, and the final segment selects files.
//! Matching is case-sensitive and never descends more levels than the
//! pattern has segments.
//!
//! The search carries a running match total across the whole recursion and
//! aborts once it passes a fixed ceiling. The host tree is not under our
//! control and the walk does no cycle detection, so the ceiling is the only
//! thing standing between a pathological tree and an unbounded traversal.

use globset::{Glob, GlobMatcher};
use originfs_host::EntryKind;

use crate::{path, ErrorKind, VirtualFs};

/// Hard ceiling on accumulated matches before the search is aborted.
const MAX_MATCHES: usize = 10_000;

/// Run `pattern` against `scope`, returning matched file paths relative to
/// it, in host enumeration order.
pub(crate) fn glob(scope: &VirtualFs, pattern: &str) -> Result<Vec<String>, ErrorKind> {
    glob_level(scope, 0, "", pattern)
}

fn compile_segment(segment: &str) -> Result<GlobMatcher, ErrorKind> {
    Ok(Glob::new(segment)
        .map_err(|e| ErrorKind::InvalidPath(e.to_string()))?
        .compile_matcher())
}

fn glob_level(
    scope: &VirtualFs,
    prior_matches: usize,
    parent_dir: &str,
    pattern: &str,
) -> Result<Vec<String>, ErrorKind> {
    if prior_matches > MAX_MATCHES {
        return Err(ErrorKind::TooManyMatches);
    }
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let (head, rest) = path::split_first(pattern);
    // A malformed segment fails the whole search before any enumeration.
    let matcher = compile_segment(head)?;

    let entries = scope.dir_entries()?;
    let mut matches = Vec::new();
    if rest.is_empty() {
        // Leaf level: collect matching files under this directory.
        for entry in &entries {
            if entry.kind == EntryKind::File && matcher.is_match(&entry.name) {
                matches.push(path::join(parent_dir, &entry.name));
            }
        }
    } else {
        // Intermediate level: descend into matching directories.
        for entry in &entries {
            if entry.kind != EntryKind::Directory || !matcher.is_match(&entry.name) {
                continue;
            }
            let scoped = scope.sub(&entry.name, false).map_err(|e| e.kind)?;
            let found = glob_level(
                &scoped,
                prior_matches + matches.len(),
                &path::join(parent_dir, &entry.name),
                rest,
            )?;
            matches.extend(found);
        }
    }
    Ok(matches)
}
