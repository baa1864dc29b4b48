use std::{collections::BTreeMap, time::SystemTime};

use bytes::Bytes;

use super::{DirEntry, File, FsError, Metadata, ReadFs, WriteFs, path};

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File { data: Bytes, modified: SystemTime },
}

static ROOT: Node = Node::Dir;

/// Flat in-memory store keyed by cleaned path.
///
/// Writes create any missing parent directories, so a file can be written
/// without a preceding [`WriteFs::mkdir_all`]. This is the backend
/// [`Assets`](crate::Assets) uses when none is given.
#[derive(Clone, Debug, Default)]
pub struct MemMapFs {
    nodes: BTreeMap<String, Node>,
}

impl MemMapFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, name: &str) -> Result<&Node, FsError> {
        if name == "." {
            return Ok(&ROOT);
        }
        self.nodes
            .get(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    fn ensure_dir(&mut self, name: &str) -> Result<(), FsError> {
        if name == "." {
            return Ok(());
        }
        match self.nodes.get(name) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File { .. }) => Err(FsError::NotADirectory(name.to_string())),
            None => {
                self.ensure_dir(path::parent(name))?;
                self.nodes.insert(name.to_string(), Node::Dir);
                Ok(())
            }
        }
    }
}

impl ReadFs for MemMapFs {
    fn open(&self, name: &str) -> Result<File, FsError> {
        let name = path::clean(name);
        match self.node(&name)? {
            Node::Dir => Err(FsError::IsADirectory(name)),
            Node::File { data, modified } => {
                Ok(File::new(name.clone(), data.clone(), Some(*modified)))
            }
        }
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        let name = path::clean(name);
        Ok(match self.node(&name)? {
            Node::Dir => Metadata::dir(),
            Node::File { data, modified } => Metadata::file(data.len(), Some(*modified)),
        })
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        let name = path::clean(name);
        if let Node::File { .. } = self.node(&name)? {
            return Err(FsError::NotADirectory(name));
        }

        let prefix = if name == "." {
            String::new()
        } else {
            format!("{name}/")
        };

        // Keys are sorted, so every descendant sits in one contiguous range.
        let entries = self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(key, node)| DirEntry {
                name: key[prefix.len()..].to_string(),
                is_dir: matches!(node, Node::Dir),
            })
            .collect();
        Ok(entries)
    }
}

impl WriteFs for MemMapFs {
    fn mkdir_all(&mut self, name: &str) -> Result<(), FsError> {
        self.ensure_dir(&path::clean(name))
    }

    fn write_file(&mut self, name: &str, contents: &[u8]) -> Result<(), FsError> {
        let name = path::clean(name);
        if name == "." {
            return Err(FsError::IsADirectory(name));
        }
        if let Some(Node::Dir) = self.nodes.get(&name) {
            return Err(FsError::IsADirectory(name));
        }
        self.ensure_dir(path::parent(&name))?;
        self.nodes.insert(
            name,
            Node::File {
                data: Bytes::copy_from_slice(contents),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents() {
        let mut fs = MemMapFs::new();
        fs.write_file("/statics/js/app.js", b"console.log(1)").unwrap();

        assert!(fs.stat("statics").unwrap().is_dir);
        assert!(fs.stat("statics/js").unwrap().is_dir);
        assert_eq!(fs.read_file("statics/js/app.js").unwrap(), "console.log(1)");
    }

    #[test]
    fn write_truncates_existing_file() {
        let mut fs = MemMapFs::new();
        fs.write_file("a.txt", b"a long first version").unwrap();
        fs.write_file("a.txt", b"short").unwrap();

        assert_eq!(fs.read_file("a.txt").unwrap(), "short");
        assert_eq!(fs.stat("a.txt").unwrap().len, 5);
    }

    #[test]
    fn mkdir_all_is_idempotent() {
        let mut fs = MemMapFs::new();
        fs.mkdir_all("a/b/c").unwrap();
        fs.mkdir_all("a/b/c").unwrap();
        fs.mkdir_all("a").unwrap();
        assert!(fs.stat("a/b/c").unwrap().is_dir);
    }

    #[test]
    fn mkdir_through_a_file_fails() {
        let mut fs = MemMapFs::new();
        fs.write_file("a", b"").unwrap();
        assert!(matches!(
            fs.mkdir_all("a/b"),
            Err(FsError::NotADirectory(_))
        ));
    }

    #[test]
    fn read_dir_lists_direct_children_only() {
        let mut fs = MemMapFs::new();
        fs.write_file("a/x.txt", b"").unwrap();
        fs.write_file("a/sub/y.txt", b"").unwrap();
        fs.write_file("ab.txt", b"").unwrap();

        let names: Vec<_> = fs
            .read_dir("a")
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![("sub".to_string(), true), ("x.txt".to_string(), false)]
        );
    }

    #[test]
    fn open_directory_and_missing_file() {
        let mut fs = MemMapFs::new();
        fs.mkdir_all("a").unwrap();
        assert!(matches!(fs.open("a"), Err(FsError::IsADirectory(_))));
        assert!(fs.open("missing").unwrap_err().is_not_found());
        assert!(fs.stat("/").unwrap().is_dir);
    }
}
