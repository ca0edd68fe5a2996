//! Request path resolution
//!
//! Maps decoded URL paths onto the file system and enforces that every
//! resolved target stays inside the server root.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::FileError;

/// Resolve a decoded request path to a real path under `root`.
///
/// `root` must already be in canonical form. The returned path is canonical
/// and guaranteed to lie inside `root`. Parent-directory components are
/// rejected lexically before the file system is consulted; symlinked escapes
/// are caught by re-checking containment after canonicalization.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf, FileError> {
    if request_path.contains('\0') {
        return Err(FileError::InvalidPath(request_path.to_string()));
    }

    let relative = request_path.trim_start_matches('/');

    let mut joined = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(FileError::Traversal(request_path.to_string()));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FileError::InvalidPath(request_path.to_string()));
            }
        }
    }

    let canonical = match joined.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FileError::NotFound(request_path.to_string()));
        }
        Err(e) => return Err(FileError::Io(e)),
    };

    if !canonical.starts_with(root) {
        return Err(FileError::Traversal(request_path.to_string()));
    }

    Ok(canonical)
}
