/// Normalizes a slash separated path to the relative form every backend keys on.
///
/// Leading slashes, empty and `.` segments are dropped and `..` never climbs
/// above the root. The root itself is `"."`.
pub fn clean(name: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    push_segments(&mut parts, name);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Joins path pieces into a cleaned absolute URL path.
pub(crate) fn join_url(pieces: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for piece in pieces {
        push_segments(&mut parts, piece);
    }
    let mut out = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum::<usize>() + 1);
    for part in &parts {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Joins a cleaned directory and an entry name.
pub(crate) fn join_rel(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Parent directory of a cleaned path, `"."` for top level entries.
pub(crate) fn parent(name: &str) -> &str {
    match name.rfind('/') {
        Some(i) => &name[..i],
        None => ".",
    }
}

/// A sub-tree prefix is `.` or slash separated names with no empty, `.` or `..` segment.
pub(crate) fn is_valid(name: &str) -> bool {
    if name == "." {
        return true;
    }
    !name.is_empty()
        && name
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

fn push_segments<'a>(parts: &mut Vec<&'a str>, name: &'a str) {
    for seg in name.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            seg => parts.push(seg),
        }
    }
}
