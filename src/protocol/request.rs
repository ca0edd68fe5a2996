//! HTTP request parsing
//!
//! Handles parsing of the request line from client input.

/// Request methods the server recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    /// Syntactically valid but unsupported method, answered with 405
    Unsupported,
}

/// A parsed HTTP request line.
#[derive(Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Decoded URL path with query string and fragment stripped
    pub path: String,
}

/// Parses a raw request line into a `Request`.
///
/// Returns `None` for a malformed line (wrong token count, missing HTTP
/// version, or a target that is not origin-form). Unknown methods still
/// parse, as `Method::Unsupported`.
pub fn parse_request_line(line: &str) -> Option<Request> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;

    if parts.next().is_some() || !version.starts_with("HTTP/") {
        return None;
    }

    // Only origin-form targets are meaningful for a file server
    if !target.starts_with('/') {
        return None;
    }

    let method = match method {
        "GET" => Method::Get,
        "HEAD" => Method::Head,
        _ => Method::Unsupported,
    };

    let raw_path = target.split(['?', '#']).next().unwrap_or(target);

    Some(Request {
        method,
        path: percent_decode(raw_path),
    })
}

/// Decode %XX escapes; invalid sequences are passed through literally.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
