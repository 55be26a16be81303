//! Field-addressable stores over project descriptor files
//!
//! Every descriptor kind is loaded lazily, edited in memory, and flushed
//! only when the caller commits. The backing medium is abstracted by the
//! [Storage] trait so runs can be computed against an in-memory map.
//!
//! - [FsStorage]: reads and writes the local filesystem
//! - [MemoryStorage]: an in-memory map for tests and previews
//! - [TextBuffer]: the shared load-once buffer composed into each store
//!
//! The concrete stores are [PbxprojFile], [GradleFile] and [ManifestFile].

pub mod buffer;
pub mod gradle;
pub mod manifest;
pub mod memory;
pub mod pbxproj;

pub use buffer::{FieldMatch, TextBuffer};
pub use gradle::GradleFile;
pub use manifest::{ManifestFile, ManifestKind};
pub use memory::MemoryStorage;
pub use pbxproj::PbxprojFile;

use std::fs;
use std::io;
use std::path::Path;

/// Backing medium for descriptor files
///
/// Implementations report plain I/O errors; stores attach the path and
/// map them to [crate::error::BumpError::Read] or [crate::error::BumpError::Write].
pub trait Storage {
    /// Read the whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the whole file with `contents`
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Local filesystem storage
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
