//! Read-only file operations
//!
//! Fetches resolved files for a response, applying index-file resolution
//! for directories.

use log::debug;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::FileError;

/// A file fetched for a response
#[derive(Debug)]
pub struct FetchedFile {
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Fetch the file at `path`, serving `index_file` from within it when
/// `path` is a directory. A directory without the index file is reported
/// as not found.
pub async fn fetch_file(path: &Path, index_file: &str) -> Result<FetchedFile, FileError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| io_to_file_error(e, path))?;

    let target: PathBuf = if metadata.is_dir() {
        let index_path = path.join(index_file);
        if !fs::try_exists(&index_path).await.unwrap_or(false) {
            return Err(FileError::NotFound(path.to_string_lossy().to_string()));
        }
        index_path
    } else {
        path.to_path_buf()
    };

    let content = fs::read(&target)
        .await
        .map_err(|e| io_to_file_error(e, &target))?;

    let content_type = mime_guess::from_path(&target)
        .first_or_octet_stream()
        .to_string();

    debug!(
        "Fetched {} ({} bytes, {})",
        target.display(),
        content.len(),
        content_type
    );

    Ok(FetchedFile {
        content,
        content_type,
    })
}

fn io_to_file_error(error: io::Error, path: &Path) -> FileError {
    if error.kind() == io::ErrorKind::NotFound {
        FileError::NotFound(path.to_string_lossy().to_string())
    } else {
        FileError::Io(error)
    }
}
