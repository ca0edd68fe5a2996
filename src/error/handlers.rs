//! Error handlers
//!
//! Maps per-request errors onto HTTP status codes.

use crate::error::types::FileError;
use crate::protocol::response;

/// Convert a file error to an HTTP status code
pub fn error_to_status(err: &FileError) -> u16 {
    match err {
        FileError::NotFound(_) => response::NOT_FOUND,
        FileError::Traversal(_) => response::FORBIDDEN,
        FileError::InvalidPath(_) => response::BAD_REQUEST,
        FileError::Io(_) => response::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(error_to_status(&FileError::NotFound("x".into())), 404);
        assert_eq!(error_to_status(&FileError::Traversal("x".into())), 403);
        assert_eq!(error_to_status(&FileError::InvalidPath("x".into())), 400);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(error_to_status(&FileError::Io(io)), 500);
    }
}
