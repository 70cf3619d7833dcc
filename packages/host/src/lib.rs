//! originfs host boundary: promise-style handles over an externally owned
//! storage tree.
//!
//! The host environment (a browser's origin-private storage, a native shim,
//! the in-memory tree in [`memory`]) owns directories and files; this crate
//! defines the references into that tree and the settlement protocol its
//! asynchronous answers travel over:
//!
//! - [`Pending`] / [`Settler`]: one operation, settled exactly once with a
//!   success payload or a [`HostError`]
//! - [`DirectoryHandle`] / [`FileHandleOps`] / [`SyncAccess`]: object-safe
//!   handle traits the filesystem layer walks
//! - [`memory`]: a complete in-memory host, used by tests everywhere above
//!
//! Nothing here knows about paths. Slash-separated path semantics live in
//! `originfs-fs`, which turns each path into a chain of single-name handle
//! lookups against these traits.

mod error;
pub mod memory;
mod promise;
mod traits;

pub use error::HostError;
pub use promise::{Pending, Settler, Subscription};
pub use traits::{
    DirEntry, DirHandle, DirectoryHandle, EntryCursor, EntryKind, FileHandle, FileHandleOps,
    SyncAccess,
};
