use super::{DirEntry, File, FsError, Metadata, ReadFs, WriteFs};

/// Serves a source tree as is. Writes and directory creation are accepted and dropped.
///
/// Used when no option asks to rewrite the bundle, so the source never has
/// to be copied into memory.
#[derive(Debug)]
pub struct ReadOnly<S> {
    inner: S,
}

impl<S: ReadFs> ReadOnly<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReadFs> ReadFs for ReadOnly<S> {
    fn open(&self, name: &str) -> Result<File, FsError> {
        self.inner.open(name)
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        self.inner.stat(name)
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        self.inner.read_dir(name)
    }
}

impl<S: ReadFs> WriteFs for ReadOnly<S> {
    fn mkdir_all(&mut self, _name: &str) -> Result<(), FsError> {
        Ok(())
    }

    fn write_file(&mut self, _name: &str, _contents: &[u8]) -> Result<(), FsError> {
        Ok(())
    }
}
