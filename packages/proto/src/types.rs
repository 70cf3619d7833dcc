//! Request and response types for the dispatch boundary.
//!
//! The surrounding application talks to the filesystem in named operations.
//! Both directions are tagged unions, so a malformed or unknown message
//! fails at deserialization instead of deep inside an operation:
//!
//! ```json
//! {"op": "read_file", "path": "saves/slot1.sav"}
//! {"status": "data", "data": [1, 2, 3]}
//! ```

use serde::{Deserialize, Serialize};

use originfs_fs::PathError;

/// One operation request against a mounted filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Read a whole file.
    ReadFile { path: String },
    /// Create or overwrite a file with the given bytes.
    WriteFile { path: String, data: Vec<u8> },
    /// Whether a file exists (lossy boolean, like the operation it wraps).
    Exists { path: String },
    /// Whether a directory exists.
    ExistsDir { path: String },
    /// Find files matching a slash-separated wildcard pattern.
    Glob { pattern: String },
    /// Remove a file or directory subtree.
    Remove { path: String },
    /// Whether `dir` is a directory containing the file `config` - the
    /// installed-package validity check.
    Validate { dir: String, config: String },
}

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// The operation succeeded with nothing to return.
    Ok,
    /// A boolean answer.
    Bool { value: bool },
    /// File content.
    Data { data: Vec<u8> },
    /// Matched paths, in enumeration order.
    Paths { paths: Vec<String> },
    /// A path-scoped failure.
    Error {
        op: String,
        path: String,
        message: String,
    },
}

impl Response {
    /// Fold a filesystem error into the wire shape, keeping its scope.
    pub fn from_path_error(err: PathError) -> Response {
        Response::Error {
            op: err.op.to_string(),
            message: err.kind.to_string(),
            path: err.path,
        }
    }
}

impl From<PathError> for Response {
    fn from(err: PathError) -> Self {
        Response::from_path_error(err)
    }
}
