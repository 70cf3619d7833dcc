//! Offset-tracked reader/writer over one open host resource.
//!
//! A handle owns the sync-access channel it was opened with, a byte cursor,
//! and a closed flag, all behind a per-instance lock: concurrent calls on
//! the *same* handle serialize, while distinct handles on one path are not
//! coordinated at all (the host decides what two live writers mean).
//!
//! Closing is explicit. Scoped acquisition with a guaranteed `close()` on
//! all exit paths is the caller's responsibility.

use std::io;
use std::sync::{Mutex, MutexGuard};

use originfs_host::{HostError, SyncAccess};

use crate::{ErrorKind, PathError};

struct HandleState {
    access: Box<dyn SyncAccess>,
    cursor: u64,
    closed: bool,
}

fn lock_state<'a>(
    state: &'a Mutex<HandleState>,
    op: &'static str,
    path: &str,
) -> Result<MutexGuard<'a, HandleState>, PathError> {
    state.lock().map_err(|_| {
        PathError::new(
            op,
            path,
            ErrorKind::Host(HostError::Storage("handle lock poisoned".to_string())),
        )
    })
}

fn close_inner(
    state: &Mutex<HandleState>,
    path: &str,
) -> Result<(), PathError> {
    let mut st = lock_state(state, "close", path)?;
    if st.closed {
        return Err(PathError::new("close", path, ErrorKind::AlreadyClosed));
    }
    st.closed = true;
    let flushed = st.access.flush();
    st.access.close();
    flushed.map_err(|e| PathError::new("close", path, ErrorKind::Host(e)))
}

/// Synchronous reader over one open file resource.
///
/// The file size is captured once at open and never refreshed: reads stop at
/// that snapshot even if the underlying file grows afterwards.
pub struct FileReader {
    path: String,
    size_at_open: u64,
    state: Mutex<HandleState>,
}

impl std::fmt::Debug for FileReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileReader")
            .field("path", &self.path)
            .field("size_at_open", &self.size_at_open)
            .finish_non_exhaustive()
    }
}

impl FileReader {
    pub(crate) fn new(path: impl Into<String>, access: Box<dyn SyncAccess>, size: u64) -> Self {
        FileReader {
            path: path.into(),
            size_at_open: size,
            state: Mutex::new(HandleState {
                access,
                cursor: 0,
                closed: false,
            }),
        }
    }

    /// The path this reader was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The file size captured when the reader was opened.
    pub fn size_at_open(&self) -> u64 {
        self.size_at_open
    }

    /// Read into `buf` at the current cursor, advancing it by the number of
    /// bytes returned. Returns `Ok(0)` once the size captured at open is
    /// reached.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, PathError> {
        let mut st = lock_state(&self.state, "read", &self.path)?;
        if st.closed {
            return Err(PathError::new("read", &self.path, ErrorKind::AlreadyClosed));
        }
        if st.cursor >= self.size_at_open {
            return Ok(0);
        }
        let cursor = st.cursor;
        let n = st
            .access
            .read_at(buf, cursor)
            .map_err(|e| PathError::new("read", &self.path, ErrorKind::Host(e)))?;
        // The host-reported count is not trusted past the caller's buffer.
        let n = n.min(buf.len());
        st.cursor += n as u64;
        Ok(n)
    }

    /// Flush and close the underlying resource. A second close, or any read
    /// after this one, fails with `AlreadyClosed`.
    pub fn close(&self) -> Result<(), PathError> {
        close_inner(&self.state, &self.path)
    }
}

impl io::Read for &FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FileReader::read(*self, buf).map_err(io::Error::other)
    }
}

impl io::Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FileReader::read(self, buf).map_err(io::Error::other)
    }
}

/// Synchronous writer over one open file resource. The cursor starts at 0
/// and advances by whatever the host reports written.
pub struct FileWriter {
    path: String,
    state: Mutex<HandleState>,
}

impl FileWriter {
    pub(crate) fn new(path: impl Into<String>, access: Box<dyn SyncAccess>) -> Self {
        FileWriter {
            path: path.into(),
            state: Mutex::new(HandleState {
                access,
                cursor: 0,
                closed: false,
            }),
        }
    }

    /// The path this writer was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Write `data` at the current cursor, advancing it by the host-reported
    /// written count.
    pub fn write(&self, data: &[u8]) -> Result<usize, PathError> {
        let mut st = lock_state(&self.state, "write", &self.path)?;
        if st.closed {
            return Err(PathError::new("write", &self.path, ErrorKind::AlreadyClosed));
        }
        let cursor = st.cursor;
        let n = st
            .access
            .write_at(data, cursor)
            .map_err(|e| PathError::new("write", &self.path, ErrorKind::Host(e)))?;
        st.cursor += n as u64;
        Ok(n)
    }

    /// Flush buffered writes without closing.
    pub fn flush(&self) -> Result<(), PathError> {
        let mut st = lock_state(&self.state, "flush", &self.path)?;
        if st.closed {
            return Err(PathError::new("flush", &self.path, ErrorKind::AlreadyClosed));
        }
        st.access
            .flush()
            .map_err(|e| PathError::new("flush", &self.path, ErrorKind::Host(e)))
    }

    /// Flush and close the underlying resource. A second close, or any write
    /// after this one, fails with `AlreadyClosed`.
    pub fn close(&self) -> Result<(), PathError> {
        close_inner(&self.state, &self.path)
    }
}

impl io::Write for &FileWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        FileWriter::write(*self, data).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        FileWriter::flush(*self).map_err(io::Error::other)
    }
}

impl io::Write for FileWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        FileWriter::write(self, data).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        FileWriter::flush(self).map_err(io::Error::other)
    }
}
