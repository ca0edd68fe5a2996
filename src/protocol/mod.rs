//! HTTP protocol implementation
//!
//! Handles request-line parsing and response generation for the subset of
//! HTTP/1.1 the server speaks.

pub mod request;
pub mod response;

pub use request::{Method, Request, parse_request_line};
pub use response::Response;
