use std::{
    collections::BTreeMap,
    marker::PhantomData,
    time::{Duration, SystemTime},
};

use bytes::Bytes;
use rust_embed::RustEmbed;

use super::{DirEntry, File, FsError, Metadata, ReadFs, path};

/// Files compiled into the binary with [`rust_embed`].
///
/// rust-embed only knows file paths, directories are derived from them.
pub struct Embedded<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> Embedded<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: RustEmbed> Default for Embedded<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Embedded<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Embedded<{}>", std::any::type_name::<E>())
    }
}

fn modified(file: &rust_embed::EmbeddedFile) -> Option<SystemTime> {
    file.metadata
        .last_modified()
        .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
}

impl<E: RustEmbed> Embedded<E> {
    fn is_dir(name: &str) -> bool {
        if name == "." {
            return true;
        }
        let prefix = format!("{name}/");
        E::iter().any(|f| f.starts_with(&prefix))
    }
}

impl<E: RustEmbed> ReadFs for Embedded<E> {
    fn open(&self, name: &str) -> Result<File, FsError> {
        let name = path::clean(name);
        match E::get(&name) {
            Some(file) => {
                let modified = modified(&file);
                Ok(File::new(name, Bytes::from(file.data.into_owned()), modified))
            }
            None if Self::is_dir(&name) => Err(FsError::IsADirectory(name)),
            None => Err(FsError::NotFound(name)),
        }
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        let name = path::clean(name);
        match E::get(&name) {
            Some(file) => Ok(Metadata::file(file.data.len(), modified(&file))),
            None if Self::is_dir(&name) => Ok(Metadata::dir()),
            None => Err(FsError::NotFound(name)),
        }
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        let name = path::clean(name);
        if E::get(&name).is_some() {
            return Err(FsError::NotADirectory(name));
        }

        let prefix = if name == "." {
            String::new()
        } else {
            format!("{name}/")
        };

        let mut children = BTreeMap::new();
        for file in E::iter() {
            let Some(rest) = file.strip_prefix(prefix.as_str()) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => children.insert(dir.to_string(), true),
                None => children.insert(rest.to_string(), false),
            };
        }

        if children.is_empty() && name != "." {
            return Err(FsError::NotFound(name));
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }
}
