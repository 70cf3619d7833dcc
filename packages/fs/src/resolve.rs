//! Handle resolution: walking a relative path across directory handles.
//!
//! A path resolves one segment per host call, strictly in order - each
//! lookup needs the handle the previous one produced - so the first failing
//! segment aborts the walk and is the one reported. Two leaf variants share
//! the walk: the final segment is looked up as a directory or as a file
//! depending on which resolver the caller picked.

use originfs_host::{DirHandle, DirectoryHandle as _, FileHandle, HostError};

use crate::{bridge, path};

/// Resolve `rel_path` from `root` to a directory handle, creating missing
/// segments when `create` is set.
pub fn resolve_directory(
    root: &DirHandle,
    rel_path: &str,
    create: bool,
) -> Result<DirHandle, HostError> {
    let (head, rest) = path::split_first(rel_path);
    let dir = bridge::wait_one(&root.directory(head, create))?;
    if rest.is_empty() {
        Ok(dir)
    } else {
        resolve_directory(&dir, rest, create)
    }
}

/// Resolve `rel_path` from `root` to a file handle, creating missing
/// segments (intermediate directories and the leaf file) when `create` is
/// set.
pub fn resolve_file(
    root: &DirHandle,
    rel_path: &str,
    create: bool,
) -> Result<FileHandle, HostError> {
    let (head, rest) = path::split_first(rel_path);
    if rest.is_empty() {
        bridge::wait_one(&root.file(head, create))
    } else {
        let dir = bridge::wait_one(&root.directory(head, create))?;
        resolve_file(&dir, rest, create)
    }
}
