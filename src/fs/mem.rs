use std::{collections::BTreeMap, time::SystemTime};

use bytes::Bytes;

use super::{DirEntry, File, FsError, Metadata, ReadFs, WriteFs, path};

#[derive(Clone, Debug)]
enum Node {
    Dir(BTreeMap<String, Node>),
    File { data: Bytes, modified: SystemTime },
}

/// Hierarchical in-memory tree.
///
/// Stricter than [`MemMapFs`](super::MemMapFs): writing a file whose parent
/// directory was never created fails with [`FsError::NotFound`].
#[derive(Clone, Debug)]
pub struct MemFs {
    root: Node,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    pub fn new() -> Self {
        Self {
            root: Node::Dir(BTreeMap::new()),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Node, FsError> {
        let mut node = &self.root;
        if name == "." {
            return Ok(node);
        }
        for seg in name.split('/') {
            node = match node {
                Node::Dir(children) => children
                    .get(seg)
                    .ok_or_else(|| FsError::NotFound(name.to_string()))?,
                Node::File { .. } => return Err(FsError::NotADirectory(name.to_string())),
            };
        }
        Ok(node)
    }

    fn dir_mut(&mut self, name: &str) -> Result<&mut BTreeMap<String, Node>, FsError> {
        let mut node = &mut self.root;
        if name != "." {
            for seg in name.split('/') {
                node = match node {
                    Node::Dir(children) => children
                        .get_mut(seg)
                        .ok_or_else(|| FsError::NotFound(name.to_string()))?,
                    Node::File { .. } => return Err(FsError::NotADirectory(name.to_string())),
                };
            }
        }
        match node {
            Node::Dir(children) => Ok(children),
            Node::File { .. } => Err(FsError::NotADirectory(name.to_string())),
        }
    }
}

impl ReadFs for MemFs {
    fn open(&self, name: &str) -> Result<File, FsError> {
        let name = path::clean(name);
        match self.lookup(&name)? {
            Node::Dir(_) => Err(FsError::IsADirectory(name)),
            Node::File { data, modified } => {
                Ok(File::new(name.clone(), data.clone(), Some(*modified)))
            }
        }
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        let name = path::clean(name);
        Ok(match self.lookup(&name)? {
            Node::Dir(_) => Metadata::dir(),
            Node::File { data, modified } => Metadata::file(data.len(), Some(*modified)),
        })
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        let name = path::clean(name);
        match self.lookup(&name)? {
            Node::Dir(children) => Ok(children
                .iter()
                .map(|(name, node)| DirEntry {
                    name: name.clone(),
                    is_dir: matches!(node, Node::Dir(_)),
                })
                .collect()),
            Node::File { .. } => Err(FsError::NotADirectory(name)),
        }
    }
}

impl WriteFs for MemFs {
    fn mkdir_all(&mut self, name: &str) -> Result<(), FsError> {
        let name = path::clean(name);
        if name == "." {
            return Ok(());
        }
        let mut node = &mut self.root;
        for seg in name.split('/') {
            node = match node {
                Node::Dir(children) => children
                    .entry(seg.to_string())
                    .or_insert_with(|| Node::Dir(BTreeMap::new())),
                Node::File { .. } => return Err(FsError::NotADirectory(name.clone())),
            };
        }
        match node {
            Node::Dir(_) => Ok(()),
            Node::File { .. } => Err(FsError::NotADirectory(name)),
        }
    }

    fn write_file(&mut self, name: &str, contents: &[u8]) -> Result<(), FsError> {
        let name = path::clean(name);
        if name == "." {
            return Err(FsError::IsADirectory(name));
        }
        let (dir, base) = match name.rsplit_once('/') {
            Some((dir, base)) => (dir, base),
            None => (".", name.as_str()),
        };
        let children = self.dir_mut(dir)?;
        if let Some(Node::Dir(_)) = children.get(base) {
            return Err(FsError::IsADirectory(name.clone()));
        }
        children.insert(
            base.to_string(),
            Node::File {
                data: Bytes::copy_from_slice(contents),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }
}
