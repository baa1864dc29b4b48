//! Virtual filesystems the asset engine reads bundles from and serves them out of.
//!
//! Everything is split along one capability line: [`ReadFs`] is all a source
//! tree has to provide, while the tree that actually gets served implements
//! [`WriteFs`] so options can rewrite its contents during construction.
//!
//! Paths are always slash separated and relative to the root of the tree. A
//! leading `/` is ignored, and `""`, `"/"` and `"."` all name the root.

use std::{io, time::SystemTime};

use bytes::Bytes;

mod dir;
#[cfg(feature = "embed")]
mod embed;
mod mem;
mod mem_map;
pub(crate) mod path;
mod read_only;
mod sub;
mod walk;

pub use dir::DirFs;
#[cfg(feature = "embed")]
pub use embed::Embedded;
pub use mem::MemFs;
pub use mem_map::MemMapFs;
pub use path::clean;
pub use read_only::ReadOnly;
pub use sub::Sub;
pub use walk::walk_dir;

#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("file does not exist: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("is a directory: {0}")]
    IsADirectory(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::NotFound(_) => true,
            FsError::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub is_dir: bool,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl Metadata {
    pub(crate) fn dir() -> Self {
        Self {
            is_dir: true,
            len: 0,
            modified: None,
        }
    }

    pub(crate) fn file(len: usize, modified: Option<SystemTime>) -> Self {
        Self {
            is_dir: false,
            len: len as u64,
            modified,
        }
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// A file opened from a [`ReadFs`]. Contents are read eagerly, bundles are small.
#[derive(Clone, Debug)]
pub struct File {
    name: String,
    data: Bytes,
    metadata: Metadata,
}

impl File {
    pub(crate) fn new(name: impl Into<String>, data: Bytes, modified: Option<SystemTime>) -> Self {
        let metadata = Metadata::file(data.len(), modified);
        Self {
            name: name.into(),
            data,
            metadata,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn metadata(&self) -> Metadata {
        self.metadata
    }

    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Read access to a tree of files and directories.
pub trait ReadFs: Send + Sync + std::fmt::Debug {
    /// Opens a regular file. Opening a directory fails with [`FsError::IsADirectory`].
    fn open(&self, name: &str) -> Result<File, FsError>;

    fn stat(&self, name: &str) -> Result<Metadata, FsError>;

    /// Lists a directory, sorted by name.
    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError>;

    /// Reads a whole file.
    fn read_file(&self, name: &str) -> Result<Bytes, FsError> {
        Ok(self.open(name)?.into_bytes())
    }
}

/// A tree the asset engine can materialize a bundle into.
pub trait WriteFs: ReadFs {
    /// Creates a directory and all missing parents. Existing directories are not an error.
    fn mkdir_all(&mut self, name: &str) -> Result<(), FsError>;

    /// Creates or truncates a file with the given contents.
    fn write_file(&mut self, name: &str, contents: &[u8]) -> Result<(), FsError>;
}

impl<T: ReadFs + ?Sized> ReadFs for Box<T> {
    fn open(&self, name: &str) -> Result<File, FsError> {
        (**self).open(name)
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        (**self).stat(name)
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        (**self).read_dir(name)
    }
}

impl<T: WriteFs + ?Sized> WriteFs for Box<T> {
    fn mkdir_all(&mut self, name: &str) -> Result<(), FsError> {
        (**self).mkdir_all(name)
    }

    fn write_file(&mut self, name: &str, contents: &[u8]) -> Result<(), FsError> {
        (**self).write_file(name, contents)
    }
}

/// In-memory tree where a write needs its parent directory to exist already.
pub fn new_in_mem() -> Box<dyn WriteFs> {
    Box::new(MemFs::new())
}

/// In-memory tree that creates missing parent directories on write.
pub fn new_in_mem_map() -> Box<dyn WriteFs> {
    Box::new(MemMapFs::new())
}
