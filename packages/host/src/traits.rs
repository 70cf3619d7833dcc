//! Handle traits for the host boundary.
//!
//! The host environment owns a tree of directories and files; this crate only
//! holds opaque references into it. Every traversal or mutation goes through
//! one of these traits and comes back as a [`Pending`] settlement.
//!
//! # Object Safety
//!
//! All traits here are object-safe; handles circulate as `Arc<dyn ...>`.

use std::sync::Arc;

use crate::{HostError, Pending};

/// Shared reference to a directory node owned by the host.
pub type DirHandle = Arc<dyn DirectoryHandle>;

/// Shared reference to a file node owned by the host.
pub type FileHandle = Arc<dyn FileHandleOps>;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry as reported by directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// A directory node in the host tree.
///
/// `name` arguments are single entry names, never slash-separated paths;
/// walking a path segment by segment is the caller's job.
pub trait DirectoryHandle: Send + Sync {
    /// Get (or, with `create`, make) the child directory `name`.
    fn directory(&self, name: &str, create: bool) -> Pending<DirHandle>;

    /// Get (or, with `create`, make) the child file `name`.
    fn file(&self, name: &str, create: bool) -> Pending<FileHandle>;

    /// Start enumerating this directory's entries, in host order.
    fn entries(&self) -> Box<dyn EntryCursor>;

    /// Remove the child `name`; with `recursive`, a directory goes along
    /// with its whole subtree.
    fn remove_entry(&self, name: &str, recursive: bool) -> Pending<()>;
}

/// Cursor over a directory's entries. Each step is its own host operation.
pub trait EntryCursor: Send {
    /// The next entry, or `None` once the enumeration is exhausted.
    fn next(&mut self) -> Pending<Option<DirEntry>>;
}

/// A file node in the host tree.
pub trait FileHandleOps: Send + Sync {
    /// Open a synchronous, offset-addressable channel onto this file's bytes.
    fn open_access(&self) -> Pending<Box<dyn SyncAccess>>;
}

impl std::fmt::Debug for dyn FileHandleOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FileHandleOps")
    }
}

/// An open, offset-addressable read/write channel onto one file.
///
/// Unlike the handle lookups above these calls are synchronous; the host
/// answers in place once the channel is open.
pub trait SyncAccess: Send {
    /// Read into `buf` starting at absolute offset `at`; returns the count
    /// the host reports.
    fn read_at(&mut self, buf: &mut [u8], at: u64) -> Result<usize, HostError>;

    /// Write `data` at absolute offset `at`; returns the count the host
    /// reports as written.
    fn write_at(&mut self, data: &[u8], at: u64) -> Result<usize, HostError>;

    /// Current size of the file in bytes.
    fn size(&self) -> Result<u64, HostError>;

    /// Push buffered writes down to the host.
    fn flush(&mut self) -> Result<(), HostError>;

    /// Release the channel. Further calls on this access fail host-side.
    fn close(&mut self);
}
