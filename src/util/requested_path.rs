use std::path::{Component, Path, PathBuf};

#[inline]
fn decode_percents(string: &str) -> String {
    percent_encoding::percent_decode_str(string)
        .decode_utf8_lossy()
        .into_owned()
}

/// Normalize the path component-wise, refusing any `..` that would climb
/// above the top. Returns `None` for such escape attempts.
fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(x) => {
                // Parse again to prevent a malicious component containing
                // a Windows drive letter, e.g.: `/anypath/c:/windows/win.ini`
                if Path::new(&x)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    result.push(x);
                    depth += 1;
                }
            }
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                result.pop();
                depth -= 1;
            }
            _ => {}
        }
    }
    Some(result)
}

/// Sanitized mapping of a request path onto the filesystem.
pub(crate) struct RequestedPath {
    /// Path relative to the document root, with `.` and `..` resolved.
    pub(crate) sanitized: PathBuf,
    /// Whether a directory was requested. (The raw path ends with a slash.)
    pub(crate) is_dir_request: bool,
}

impl RequestedPath {
    /// Decode and normalize a raw request path.
    ///
    /// Returns `None` when a `..` segment, before or after percent
    /// decoding, would resolve above the document root.
    pub(crate) fn resolve(request_path: &str) -> Option<Self> {
        let is_dir_request = request_path.as_bytes().last() == Some(&b'/');
        let request_path = PathBuf::from(decode_percents(request_path));
        let sanitized = normalize_path(&request_path)?;
        Some(RequestedPath {
            sanitized,
            is_dir_request,
        })
    }
}
