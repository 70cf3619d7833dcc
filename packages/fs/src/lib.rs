//! originfs filesystem core: an ordinary-looking synchronous filesystem over
//! a promise-style asynchronous host storage tree.
//!
//! The layering, bottom up:
//!
//! - [`bridge`]: blocks one task on one pending host operation, with
//!   guaranteed release of everything registered against it
//! - [`resolve`]: walks slash-separated paths as chains of single-name
//!   handle lookups
//! - [`VirtualFs`]: the root entity - `sub`, `load`, `store`, `exist`,
//!   `exist_dir`, `glob`, `remove`
//! - [`FileReader`] / [`FileWriter`]: offset-tracked synchronous IO over one
//!   open resource, with strict open/close discipline
//!
//! Every public operation reports failure as a [`PathError`] carrying the
//! operation name and the path it was applied to.
//!
//! # Concurrency
//!
//! Many tasks may call in concurrently; each blocks only on its own host
//! operations. Within one resolution chain or one glob subtree, host calls
//! are strictly sequential. The only locked object is an open reader or
//! writer, per instance; [`VirtualFs`] values are immutable descriptors,
//! shared and cloned freely. There is no timeout or cancellation - a caller
//! needing a deadline must race the call externally.

pub mod bridge;
mod error;
mod glob;
mod handle;
pub mod path;
pub mod resolve;
mod vfs;

pub use error::{ErrorKind, PathError};
pub use handle::{FileReader, FileWriter};
pub use vfs::VirtualFs;

// Re-export the host boundary types callers need to stand up a filesystem.
pub use originfs_host::{
    DirEntry, DirHandle, DirectoryHandle, EntryKind, FileHandle, HostError, Pending, Settler,
};
