use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Bytes escaped inside one URL path segment. Parentheses and brackets are
/// included so the URL can sit inside a markdown link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Resolve `path` against `base` when it is relative.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Path of `path` relative to `root`, `/`-separated on every host.
/// Paths outside `root` come back absolute.
pub fn relative_path(root: &Path, path: &Path) -> String {
    relative_within(root, path).unwrap_or_else(|| {
        absolutize(&normalize(root), path)
            .to_string_lossy()
            .replace('\\', "/")
    })
}

/// Path of `path` relative to `root`, or None when it lies outside `root`.
pub fn relative_within(root: &Path, path: &Path) -> Option<String> {
    let root = normalize(root);
    let path = absolutize(&root, path);
    path.strip_prefix(&root).ok().map(to_slash)
}

fn to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `{origin}/{repository}/blob/{commit}/{rel}` plus `#L{line}` when known.
/// Each segment of `rel` is percent-encoded.
pub fn permalink(
    origin: &str,
    repository: &str,
    commit: &str,
    rel: &str,
    line: Option<u32>,
) -> String {
    let mut url = format!(
        "{}/{}/blob/{}/{}",
        origin.trim_end_matches('/'),
        repository.trim_matches('/'),
        commit,
        encode_path(rel)
    );
    if let Some(line) = line {
        url.push_str(&format!("#L{}", line));
    }
    url
}

fn encode_path(rel: &str) -> String {
    rel.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
