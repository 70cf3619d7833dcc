//! Error type for the host boundary.
//!
//! Errors at this level are transport-focused. No path semantics - those
//! belong to the filesystem layer above.

use thiserror::Error;

/// Failure surfaced by the host storage environment.
///
/// The host owns the underlying tree; this type only classifies what it
/// reports back. `NotFound` and `TypeMismatch` are distinguished because the
/// layer above maps them to different outcomes; everything else is opaque.
#[derive(Debug, Error)]
pub enum HostError {
    /// The named entry does not exist and creation was not requested.
    #[error("no such entry: {0}")]
    NotFound(String),

    /// The named entry exists but with the other kind (file vs directory).
    #[error("entry has the wrong kind: {0}")]
    TypeMismatch(String),

    /// Opaque storage failure: quota, permission, detached handle, IO.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The host violated the promise protocol, e.g. settled with an
    /// unexpected payload arity.
    #[error("host contract violation: {0}")]
    Contract(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_entry_name() {
        let e = HostError::NotFound("save.dat".to_string());
        assert!(format!("{}", e).contains("save.dat"));

        let e = HostError::TypeMismatch("dir1".to_string());
        assert!(format!("{}", e).contains("dir1"));
    }

    #[test]
    fn error_trait_object() {
        let e: Box<dyn std::error::Error> = Box::new(HostError::Storage("quota".to_string()));
        assert!(e.to_string().contains("quota"));
    }
}
