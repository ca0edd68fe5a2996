//! HTTP response handling
//!
//! Defines response status codes and wire formatting.

/// Status codes the server emits
pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const METHOD_NOT_ALLOWED: u16 = 405;
pub const URI_TOO_LONG: u16 = 414;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// A complete response ready to be written to the wire. Every response
/// closes the connection; the server is stateless across requests.
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    /// Successful response carrying file content
    pub fn ok(content_type: String, body: Vec<u8>) -> Self {
        Self {
            status: OK,
            content_type,
            body,
        }
    }

    /// Error response with a short plain-text body
    pub fn error(status: u16) -> Self {
        let body = format!("{} {}\n", status, reason_phrase(status)).into_bytes();
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            body,
        }
    }

    /// Serialize the status line and headers. The body is written
    /// separately so HEAD responses can reuse the same head.
    pub fn header_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );

        if self.status == METHOD_NOT_ALLOWED {
            head.push_str("Allow: GET, HEAD\r\n");
        }

        head.push_str("\r\n");
        head.into_bytes()
    }
}

/// Standard reason phrase for a status code
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        OK => "OK",
        BAD_REQUEST => "Bad Request",
        FORBIDDEN => "Forbidden",
        NOT_FOUND => "Not Found",
        METHOD_NOT_ALLOWED => "Method Not Allowed",
        URI_TOO_LONG => "URI Too Long",
        INTERNAL_SERVER_ERROR => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_head_carries_length_and_type() {
        let response = Response::ok("text/html".to_string(), b"<h1>Docs</h1>".to_vec());
        let head = String::from_utf8(response.header_bytes()).unwrap();
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: text/html\r\n"));
        assert!(head.contains("Content-Length: 13\r\n"));
        assert!(head.contains("Connection: close\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
    }

    #[test]
    fn error_response_has_plain_text_body() {
        let response = Response::error(NOT_FOUND);
        assert_eq!(response.status, NOT_FOUND);
        assert_eq!(response.body, b"404 Not Found\n");
    }

    #[test]
    fn method_not_allowed_advertises_allow_header() {
        let head = String::from_utf8(Response::error(METHOD_NOT_ALLOWED).header_bytes()).unwrap();
        assert!(head.contains("Allow: GET, HEAD\r\n"));
    }
}
