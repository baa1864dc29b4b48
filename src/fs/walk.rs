use super::{DirEntry, FsError, ReadFs, path};

/// Walks `fs` depth first starting at `root`, visiting a directory before its
/// children and children in name order.
///
/// `visit` receives the cleaned path and the entry, the root is reported as
/// `"."` when walking the whole tree. Failures are per entry: a directory that
/// cannot be listed, or a `visit` call that errors, is logged and skipped and
/// the walk carries on with its siblings.
pub fn walk_dir<F, V>(fs: &F, root: &str, mut visit: V)
where
    F: ReadFs + ?Sized,
    V: FnMut(&str, &DirEntry) -> Result<(), FsError>,
{
    let root = path::clean(root);
    let meta = match fs.stat(&root) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!("walk: cannot stat {root}: {e}");
            return;
        }
    };

    let entry = DirEntry {
        name: root.rsplit('/').next().unwrap_or(".").to_string(),
        is_dir: meta.is_dir,
    };
    walk_entry(fs, &root, &entry, &mut visit);
}

fn walk_entry<F, V>(fs: &F, name: &str, entry: &DirEntry, visit: &mut V)
where
    F: ReadFs + ?Sized,
    V: FnMut(&str, &DirEntry) -> Result<(), FsError>,
{
    if let Err(e) = visit(name, entry) {
        tracing::warn!("walk: skipping {name}: {e}");
        return;
    }

    if !entry.is_dir {
        return;
    }

    let children = match fs.read_dir(name) {
        Ok(children) => children,
        Err(e) => {
            tracing::warn!("walk: cannot read directory {name}: {e}");
            return;
        }
    };

    for child in &children {
        let child_path = path::join_rel(name, &child.name);
        walk_entry(fs, &child_path, child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemMapFs, WriteFs};

    #[test]
    fn visits_parents_before_children_in_name_order() {
        let mut fs = MemMapFs::new();
        fs.write_file("index.html", b"<head></head>").unwrap();
        fs.write_file("statics/ok.json", b"{}").unwrap();
        fs.write_file("statics/js/b.js", b"").unwrap();
        fs.write_file("statics/js/a.js", b"").unwrap();
        fs.write_file("manifest.json", b"{}").unwrap();

        let mut seen = Vec::new();
        walk_dir(&fs, ".", |name, entry| {
            seen.push((name.to_string(), entry.is_dir));
            Ok(())
        });

        let expected = [
            (".", true),
            ("index.html", false),
            ("manifest.json", false),
            ("statics", true),
            ("statics/js", true),
            ("statics/js/a.js", false),
            ("statics/js/b.js", false),
            ("statics/ok.json", false),
        ];
        let expected: Vec<_> = expected
            .iter()
            .map(|(n, d)| (n.to_string(), *d))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn failing_visit_skips_only_that_subtree() {
        let mut fs = MemMapFs::new();
        fs.write_file("a/one.txt", b"1").unwrap();
        fs.write_file("b/two.txt", b"2").unwrap();

        let mut seen = Vec::new();
        walk_dir(&fs, ".", |name, _| {
            if name == "a" {
                return Err(FsError::NotFound(name.to_string()));
            }
            seen.push(name.to_string());
            Ok(())
        });

        assert_eq!(seen, vec![".", "b", "b/two.txt"]);
    }

    #[test]
    fn missing_root_visits_nothing() {
        let fs = MemMapFs::new();
        let mut count = 0;
        walk_dir(&fs, "nope", |_, _| {
            count += 1;
            Ok(())
        });
        assert_eq!(count, 0);
    }
}
