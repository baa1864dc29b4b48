use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::{DirEntry, File, FsError, Metadata, ReadFs, path};

/// Read access to a directory on disk, for serving a bundle straight out of a
/// build output folder during development.
#[derive(Clone, Debug)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, name: &str) -> (String, PathBuf) {
        let name = path::clean(name);
        let mut full = self.root.clone();
        if name != "." {
            full.extend(name.split('/'));
        }
        (name, full)
    }
}

impl ReadFs for DirFs {
    fn open(&self, name: &str) -> Result<File, FsError> {
        let (name, full) = self.resolve(name);
        let meta = std::fs::metadata(&full).map_err(|e| not_found_or_io(e, &name))?;
        if meta.is_dir() {
            return Err(FsError::IsADirectory(name));
        }
        let data = std::fs::read(&full).map_err(|e| not_found_or_io(e, &name))?;
        Ok(File::new(name, Bytes::from(data), meta.modified().ok()))
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        let (name, full) = self.resolve(name);
        let meta = std::fs::metadata(&full).map_err(|e| not_found_or_io(e, &name))?;
        if meta.is_dir() {
            Ok(Metadata::dir())
        } else {
            Ok(Metadata {
                is_dir: false,
                len: meta.len(),
                modified: meta.modified().ok(),
            })
        }
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        let (name, full) = self.resolve(name);
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&full).map_err(|e| not_found_or_io(e, &name))? {
            let entry = entry?;
            let Ok(file_name) = entry.file_name().into_string() else {
                tracing::warn!("skipping non UTF-8 file name in {}", full.display());
                continue;
            };
            entries.push(DirEntry {
                name: file_name,
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn not_found_or_io(e: std::io::Error, name: &str) -> FsError {
    if e.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound(name.to_string())
    } else {
        FsError::Io(e)
    }
}
