//! Error types for the filesystem core.
//!
//! Two levels, like the host/fs split itself: [`ErrorKind`] classifies what
//! went wrong, [`PathError`] scopes it with the operation and path that
//! produced it. Every public filesystem operation returns `PathError`.

use originfs_host::HostError;
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Resolution failed on the named segment and creation was not permitted.
    #[error("not found: {0}")]
    NotFound(String),

    /// An absolute path outside the filesystem's root, or a malformed glob
    /// segment.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Operation on a reader/writer that has already been closed.
    #[error("handle already closed")]
    AlreadyClosed,

    /// The glob safety ceiling was exceeded; the traversal was aborted.
    #[error("too many glob matches, traversal aborted")]
    TooManyMatches,

    /// Opaque failure surfaced by the host storage environment.
    #[error(transparent)]
    Host(HostError),
}

impl From<HostError> for ErrorKind {
    fn from(err: HostError) -> Self {
        match err {
            // A host-side miss is the NotFound of this layer; the name is
            // the segment that failed.
            HostError::NotFound(name) => ErrorKind::NotFound(name),
            other => ErrorKind::Host(other),
        }
    }
}

/// An [`ErrorKind`] scoped with the operation name and path that produced it.
#[derive(Debug, Error)]
#[error("{op} {path}: {kind}")]
pub struct PathError {
    /// Operation name, e.g. `open-read`, `glob`, `remove`.
    pub op: &'static str,
    /// The path (or pattern) the operation was applied to.
    pub path: String,
    /// The underlying failure.
    #[source]
    pub kind: ErrorKind,
}

impl PathError {
    pub fn new(op: &'static str, path: impl Into<String>, kind: impl Into<ErrorKind>) -> Self {
        PathError {
            op,
            path: path.into(),
            kind: kind.into(),
        }
    }

    /// Whether this error is a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}
