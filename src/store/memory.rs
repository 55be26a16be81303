use crate::store::Storage;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory storage for testing without touching the filesystem
///
/// Clones share the same files, so a handle kept by a test observes
/// everything written through the stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Rc<RefCell<HashMap<PathBuf, String>>>,
    reads: Rc<RefCell<Vec<PathBuf>>>,
    writes: Rc<RefCell<Vec<PathBuf>>>,
}

impl MemoryStorage {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), contents.into());
    }

    /// Current contents of a file, if present
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Number of reads performed against `path`
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        self.reads
            .borrow()
            .iter()
            .filter(|p| p.as_path() == path.as_ref())
            .count()
    }

    /// Paths written so far, in write order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.borrow_mut().push(path.to_path_buf());
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.writes.borrow_mut().push(path.to_path_buf());
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
