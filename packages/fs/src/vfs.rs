//! The virtual filesystem root entity.
//!
//! A [`VirtualFs`] pairs a host directory handle with the absolute path that
//! handle stood for when it was resolved. Instances are value-like: cheap to
//! clone, never mutated in place - scoping into a subdirectory produces a
//! new independent instance. The handle is a snapshot reference; if the host
//! tree is mutated underneath it, the instance can go stale, and nothing in
//! this layer re-validates it.
//!
//! No locking happens across instances. Two scopes over overlapping host
//! subtrees race at whatever granularity the host itself guarantees.

use originfs_host::{
    DirEntry, DirHandle, DirectoryHandle as _, EntryCursor as _, FileHandleOps as _, SyncAccess,
};
use tracing::debug;

use crate::{bridge, glob, path, resolve, ErrorKind, FileReader, FileWriter, PathError};

/// A synchronous filesystem scoped to one directory of the host tree.
#[derive(Clone)]
pub struct VirtualFs {
    root: DirHandle,
    abs_root: String,
}

impl std::fmt::Debug for VirtualFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualFs")
            .field("abs_root", &self.abs_root)
            .finish_non_exhaustive()
    }
}

impl VirtualFs {
    /// Mount a filesystem at `abs_base` under the host's root directory,
    /// creating the directory chain if needed. `abs_base` must be absolute.
    ///
    /// The resolved handle is a snapshot of the directory that exists at
    /// `abs_base` now; external host mutations are not tracked.
    pub fn mount(host_root: DirHandle, abs_base: &str) -> Result<VirtualFs, PathError> {
        if !path::is_absolute(abs_base) {
            return Err(PathError::new(
                "mount",
                abs_base,
                ErrorKind::InvalidPath("mount base must be absolute".to_string()),
            ));
        }
        let abs_root = if abs_base == "/" {
            "/".to_string()
        } else {
            abs_base.trim_end_matches('/').to_string()
        };
        let rel = abs_root.trim_start_matches('/').to_string();
        let root = if rel.is_empty() {
            host_root
        } else {
            resolve::resolve_directory(&host_root, &rel, true)
                .map_err(|e| PathError::new("mount", abs_base, e))?
        };
        debug!(root = %abs_root, "mounted virtual filesystem");
        Ok(VirtualFs { root, abs_root })
    }

    /// The absolute path this filesystem is rooted at.
    pub fn abs_root(&self) -> &str {
        &self.abs_root
    }

    /// Express `fpath` relative to this root. Absolute paths must be
    /// descendants of the root; relative paths are taken as-is.
    fn rel_path(&self, fpath: &str) -> Result<String, ErrorKind> {
        path::relative_to(&self.abs_root, fpath)
    }

    /// Scope into `sub_dir`, returning a new filesystem rooted there.
    ///
    /// With `create`, missing segments are created along the way. A path
    /// resolving to this root itself yields an identical scope.
    pub fn sub(&self, sub_dir: &str, create: bool) -> Result<VirtualFs, PathError> {
        let rel = self
            .rel_path(sub_dir)
            .map_err(|kind| PathError::new("open-subdir", sub_dir, kind))?;
        if rel.is_empty() {
            return Ok(self.clone());
        }
        let root = resolve::resolve_directory(&self.root, &rel, create)
            .map_err(|e| PathError::new("open-subdir", rel.clone(), e))?;
        Ok(VirtualFs {
            root,
            abs_root: path::join(&self.abs_root, &rel),
        })
    }

    fn open_access(&self, fpath: &str, create: bool) -> Result<Box<dyn SyncAccess>, ErrorKind> {
        let rel = self.rel_path(fpath)?;
        let file = resolve::resolve_file(&self.root, &rel, create)?;
        let access = bridge::wait_one(&file.open_access())?;
        Ok(access)
    }

    /// Open `fpath` for reading. The file must exist; its size is captured
    /// once and bounds every later read on the returned reader.
    pub fn load(&self, fpath: &str) -> Result<FileReader, PathError> {
        debug!(path = %fpath, root = %self.abs_root, "load");
        let access = self
            .open_access(fpath, false)
            .map_err(|kind| PathError::new("open-read", fpath, kind))?;
        let size = access
            .size()
            .map_err(|e| PathError::new("open-read", fpath, ErrorKind::Host(e)))?;
        Ok(FileReader::new(fpath, access, size))
    }

    /// Open `fpath` for writing, creating the file (and missing parent
    /// directories) as needed. The returned writer starts at offset 0.
    pub fn store(&self, fpath: &str) -> Result<FileWriter, PathError> {
        debug!(path = %fpath, root = %self.abs_root, "store");
        let access = self
            .open_access(fpath, true)
            .map_err(|kind| PathError::new("open-write", fpath, kind))?;
        Ok(FileWriter::new(fpath, access))
    }

    /// Whether a file exists at `fpath`.
    ///
    /// Deliberately lossy: every failure mode - not found, host error,
    /// invalid path - collapses to `false`.
    pub fn exist(&self, fpath: &str) -> bool {
        let Ok(rel) = self.rel_path(fpath) else {
            return false;
        };
        resolve::resolve_file(&self.root, &rel, false).is_ok()
    }

    /// Whether a directory exists at `fpath`. Same lossy contract as
    /// [`exist`](Self::exist).
    pub fn exist_dir(&self, fpath: &str) -> bool {
        let Ok(rel) = self.rel_path(fpath) else {
            return false;
        };
        resolve::resolve_directory(&self.root, &rel, false).is_ok()
    }

    /// Drain this directory's entries, in host enumeration order.
    pub(crate) fn dir_entries(&self) -> Result<Vec<DirEntry>, ErrorKind> {
        let mut cursor = self.root.entries();
        let mut entries = Vec::new();
        while let Some(entry) = bridge::wait_one(&cursor.next())? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Find files matching a slash-separated pattern of shell-style wildcard
    /// segments, relative to this root.
    ///
    /// Results come back in host enumeration order. Matching is
    /// case-sensitive and descends exactly as many levels as the pattern has
    /// segments. A search that accumulates more than the safety ceiling of
    /// matches aborts with `TooManyMatches`.
    pub fn glob(&self, pattern: &str) -> Result<Vec<String>, PathError> {
        debug!(pattern = %pattern, root = %self.abs_root, "glob");
        let rel = self
            .rel_path(pattern)
            .map_err(|kind| PathError::new("glob", pattern, kind))?;
        glob::glob(self, &rel).map_err(|kind| PathError::new("glob", rel, kind))
    }

    /// Remove the entry at `fpath`, recursively if it is a directory.
    pub fn remove(&self, fpath: &str) -> Result<(), PathError> {
        debug!(path = %fpath, root = %self.abs_root, "remove");
        let rel = self
            .rel_path(fpath)
            .map_err(|kind| PathError::new("remove", fpath, kind))?;
        let (dir, leaf) = path::split_parent(&rel);
        if dir.is_empty() {
            bridge::wait_one(&self.root.remove_entry(leaf, true))
                .map_err(|e| PathError::new("remove", leaf, e))?;
            Ok(())
        } else {
            let scoped = self
                .sub(dir, false)
                .map_err(|e| PathError::new("remove", dir, e.kind))?;
            // The recursive call already carries full context.
            scoped.remove(leaf)
        }
    }
}
