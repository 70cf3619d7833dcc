//! originfs dispatch boundary: named filesystem operations as a validated
//! tagged-union protocol.
//!
//! The surrounding application (a worker loop, an IPC endpoint) decodes one
//! [`Request`], hands it to [`dispatch`] with a mounted
//! [`VirtualFs`](originfs_fs::VirtualFs), and encodes the [`Response`].
//! Unknown operations and missing fields die in deserialization; filesystem
//! failures come back as `Response::Error` with the operation name and path
//! that produced them.

mod dispatch;
mod types;

pub use dispatch::dispatch;
pub use types::{Request, Response};
