//! File system access
//!
//! Handles path resolution and read-only file operations under the server
//! root.

pub mod operations;
pub mod resolve;

pub use operations::{FetchedFile, fetch_file};
pub use resolve::resolve_request_path;
