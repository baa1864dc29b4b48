use super::{DirEntry, File, FsError, Metadata, ReadFs, path};

/// A view of `inner` rooted at `dir`.
#[derive(Debug)]
pub struct Sub<S> {
    inner: S,
    dir: String,
}

impl<S: ReadFs> Sub<S> {
    /// Roots `inner` at `dir`.
    ///
    /// `dir` must be a clean relative path: no leading or trailing slash and
    /// no empty, `.` or `..` segments. `"."` is the whole tree. The directory
    /// itself is not required to exist.
    pub fn new(inner: S, dir: &str) -> Result<Self, FsError> {
        if !path::is_valid(dir) {
            return Err(FsError::InvalidPath(dir.to_string()));
        }
        Ok(Self {
            inner,
            dir: dir.to_string(),
        })
    }

    fn full(&self, name: &str) -> String {
        path::join_rel(&self.dir, &path::clean(name))
    }
}

impl<S: ReadFs> ReadFs for Sub<S> {
    fn open(&self, name: &str) -> Result<File, FsError> {
        let file = self.inner.open(&self.full(name))?;
        Ok(File::new(path::clean(name), file.bytes().clone(), file.metadata().modified))
    }

    fn stat(&self, name: &str) -> Result<Metadata, FsError> {
        self.inner.stat(&self.full(name))
    }

    fn read_dir(&self, name: &str) -> Result<Vec<DirEntry>, FsError> {
        self.inner.read_dir(&self.full(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemMapFs, WriteFs};

    #[test]
    fn reads_relative_to_prefix() {
        let mut fs = MemMapFs::new();
        fs.write_file("client/dist/index.html", b"<head></head>").unwrap();
        fs.write_file("client/dist/assets/app.js", b"app").unwrap();
        fs.write_file("client/src/App.tsx", b"tsx").unwrap();

        let sub = Sub::new(fs, "client/dist").unwrap();
        assert_eq!(sub.read_file("index.html").unwrap(), "<head></head>");
        assert_eq!(sub.read_file("/assets/app.js").unwrap(), "app");
        assert!(sub.stat("App.tsx").unwrap_err().is_not_found());
        assert!(sub.stat(".").unwrap().is_dir);

        let names: Vec<_> = sub.read_dir(".").unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["assets", "index.html"]);
    }

    #[test]
    fn dot_is_the_whole_tree() {
        let mut fs = MemMapFs::new();
        fs.write_file("a.txt", b"a").unwrap();
        let sub = Sub::new(fs, ".").unwrap();
        assert_eq!(sub.read_file("a.txt").unwrap(), "a");
    }

    #[test]
    fn rejects_invalid_prefixes() {
        for bad in ["", "/client", "client/", "../client", "client/./dist"] {
            assert!(
                matches!(Sub::new(MemMapFs::new(), bad), Err(FsError::InvalidPath(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
