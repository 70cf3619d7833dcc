//! In-memory host tree.
//!
//! A complete implementation of the host boundary backed by process memory.
//! Every operation settles immediately, which makes it the workhorse for
//! tests of the layers above; it is also a usable host on its own for
//! native runs that want filesystem semantics without a real host
//! environment.
//!
//! Entries enumerate in name order (the children map is a `BTreeMap`), so
//! enumeration-order assertions are deterministic.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::{
    DirEntry, DirHandle, DirectoryHandle, EntryCursor, EntryKind, FileHandle, FileHandleOps,
    HostError, Pending, SyncAccess,
};

enum Node {
    Directory(Arc<Mutex<DirNode>>),
    File(Arc<Mutex<FileNode>>),
}

#[derive(Default)]
struct DirNode {
    children: BTreeMap<String, Node>,
}

struct FileNode {
    content: Vec<u8>,
}

// Tree mutations never run foreign code under a node lock.
fn lock<T>(node: &Mutex<T>) -> MutexGuard<'_, T> {
    node.lock().unwrap_or_else(PoisonError::into_inner)
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}

/// A directory in the in-memory tree. Cloning shares the node.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    node: Arc<Mutex<DirNode>>,
}

impl MemoryDirectory {
    /// A fresh, empty root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// This directory as a shared host handle.
    pub fn handle(&self) -> DirHandle {
        Arc::new(self.clone())
    }

    /// Seed a file child directly, creating or overwriting it.
    pub fn put_file(&self, name: &str, content: impl Into<Bytes>) {
        let mut node = lock(&self.node);
        node.children.insert(
            name.to_string(),
            Node::File(Arc::new(Mutex::new(FileNode {
                content: content.into().to_vec(),
            }))),
        );
    }

    /// Seed a directory child directly, returning it. An existing directory
    /// of that name is reused; anything else is replaced.
    pub fn put_dir(&self, name: &str) -> MemoryDirectory {
        let mut node = lock(&self.node);
        if let Some(Node::Directory(dir)) = node.children.get(name) {
            return MemoryDirectory {
                node: Arc::clone(dir),
            };
        }
        let dir = Arc::new(Mutex::new(DirNode::default()));
        node.children
            .insert(name.to_string(), Node::Directory(Arc::clone(&dir)));
        MemoryDirectory { node: dir }
    }

    /// Snapshot of a file child's content, for assertions.
    pub fn file_content(&self, name: &str) -> Option<Bytes> {
        let node = lock(&self.node);
        match node.children.get(name) {
            Some(Node::File(file)) => Some(Bytes::from(lock(file).content.clone())),
            _ => None,
        }
    }

    /// Whether a child of the given name exists, regardless of kind.
    pub fn has_child(&self, name: &str) -> bool {
        lock(&self.node).children.contains_key(name)
    }
}

impl DirectoryHandle for MemoryDirectory {
    fn directory(&self, name: &str, create: bool) -> Pending<DirHandle> {
        if !valid_name(name) {
            return Pending::rejected(HostError::Storage(format!("invalid entry name: {name:?}")));
        }
        let mut node = lock(&self.node);
        match node.children.get(name) {
            Some(Node::Directory(dir)) => Pending::resolved_one(Arc::new(MemoryDirectory {
                node: Arc::clone(dir),
            }) as DirHandle),
            Some(Node::File(_)) => Pending::rejected(HostError::TypeMismatch(name.to_string())),
            None if create => {
                let dir = Arc::new(Mutex::new(DirNode::default()));
                node.children
                    .insert(name.to_string(), Node::Directory(Arc::clone(&dir)));
                Pending::resolved_one(Arc::new(MemoryDirectory { node: dir }) as DirHandle)
            }
            None => Pending::rejected(HostError::NotFound(name.to_string())),
        }
    }

    fn file(&self, name: &str, create: bool) -> Pending<FileHandle> {
        if !valid_name(name) {
            return Pending::rejected(HostError::Storage(format!("invalid entry name: {name:?}")));
        }
        let mut node = lock(&self.node);
        match node.children.get(name) {
            Some(Node::File(file)) => Pending::resolved_one(Arc::new(MemoryFile {
                node: Arc::clone(file),
            }) as FileHandle),
            Some(Node::Directory(_)) => {
                Pending::rejected(HostError::TypeMismatch(name.to_string()))
            }
            None if create => {
                let file = Arc::new(Mutex::new(FileNode {
                    content: Vec::new(),
                }));
                node.children
                    .insert(name.to_string(), Node::File(Arc::clone(&file)));
                Pending::resolved_one(Arc::new(MemoryFile { node: file }) as FileHandle)
            }
            None => Pending::rejected(HostError::NotFound(name.to_string())),
        }
    }

    fn entries(&self) -> Box<dyn EntryCursor> {
        let node = lock(&self.node);
        let entries: VecDeque<DirEntry> = node
            .children
            .iter()
            .map(|(name, child)| DirEntry {
                name: name.clone(),
                kind: match child {
                    Node::Directory(_) => EntryKind::Directory,
                    Node::File(_) => EntryKind::File,
                },
            })
            .collect();
        Box::new(MemoryCursor { entries })
    }

    fn remove_entry(&self, name: &str, recursive: bool) -> Pending<()> {
        let mut node = lock(&self.node);
        match node.children.get(name) {
            None => Pending::rejected(HostError::NotFound(name.to_string())),
            Some(Node::Directory(dir)) if !recursive && !lock(dir).children.is_empty() => {
                Pending::rejected(HostError::Storage(format!("directory not empty: {name}")))
            }
            Some(_) => {
                node.children.remove(name);
                Pending::resolved_one(())
            }
        }
    }
}

struct MemoryCursor {
    entries: VecDeque<DirEntry>,
}

impl EntryCursor for MemoryCursor {
    fn next(&mut self) -> Pending<Option<DirEntry>> {
        Pending::resolved_one(self.entries.pop_front())
    }
}

/// A file in the in-memory tree. Cloning shares the node.
#[derive(Clone)]
pub struct MemoryFile {
    node: Arc<Mutex<FileNode>>,
}

impl FileHandleOps for MemoryFile {
    fn open_access(&self) -> Pending<Box<dyn SyncAccess>> {
        Pending::resolved_one(Box::new(MemoryAccess {
            node: Arc::clone(&self.node),
            closed: false,
        }) as Box<dyn SyncAccess>)
    }
}

struct MemoryAccess {
    node: Arc<Mutex<FileNode>>,
    closed: bool,
}

impl MemoryAccess {
    fn check_open(&self) -> Result<(), HostError> {
        if self.closed {
            Err(HostError::Storage("access handle is closed".to_string()))
        } else {
            Ok(())
        }
    }
}

fn to_offset(at: u64) -> Result<usize, HostError> {
    usize::try_from(at).map_err(|_| HostError::Storage(format!("offset out of range: {at}")))
}

impl SyncAccess for MemoryAccess {
    fn read_at(&mut self, buf: &mut [u8], at: u64) -> Result<usize, HostError> {
        self.check_open()?;
        let node = lock(&self.node);
        let at = to_offset(at)?;
        if at >= node.content.len() {
            return Ok(0);
        }
        let n = buf.len().min(node.content.len() - at);
        buf[..n].copy_from_slice(&node.content[at..at + n]);
        Ok(n)
    }

    fn write_at(&mut self, data: &[u8], at: u64) -> Result<usize, HostError> {
        self.check_open()?;
        let mut node = lock(&self.node);
        let at = to_offset(at)?;
        let end = at + data.len();
        if node.content.len() < end {
            node.content.resize(end, 0);
        }
        node.content[at..end].copy_from_slice(data);
        Ok(data.len())
    }

    fn size(&self) -> Result<u64, HostError> {
        self.check_open()?;
        Ok(lock(&self.node).content.len() as u64)
    }

    fn flush(&mut self) -> Result<(), HostError> {
        self.check_open()
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
