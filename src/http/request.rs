use std::collections::HashMap;

/// Header names a client is allowed to send. Anything else is rejected.
pub const ALLOWED_HEADERS: [&str; 14] = [
    "Cache-Control",
    "User-Agent",
    "Content-Type",
    "Accept",
    "Accept-Language",
    "Accept-Encoding",
    "Host",
    "Connection",
    "Cookie",
    "Date",
    "Pragma",
    "If-Modified-Since",
    "Range",
    "Upgrade-Insecure-Requests",
];

/// Returns `true` if `name` is on the header whitelist (exact case).
pub fn is_allowed_header(name: &str) -> bool {
    ALLOWED_HEADERS.contains(&name)
}

/// The lexed, not yet validated, form of a request.
///
/// Produced once the buffer contains the blank-line terminator. The
/// request line and header lines are kept verbatim; the body is whatever
/// followed the terminator and is never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// First line of the head, e.g. `GET / HTTP/1.1`
    pub request_line: String,
    /// Remaining head lines, in the order received
    pub header_lines: Vec<String>,
    /// Bytes after `\r\n\r\n`
    pub body: Vec<u8>,
}

/// The three tokens of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl ParsedRequestLine {
    /// Splits a request line on whitespace. Returns `None` unless there are
    /// exactly three tokens.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();

        let method = parts.next()?;
        let target = parts.next()?;
        let version = parts.next()?;

        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        })
    }
}

/// Whitelisted request headers, keyed by name exactly as received.
///
/// Inserting a name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Retrieves a header value by its exact name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Serializes the map back into `Name: value` lines.
    ///
    /// Lines are sorted by name so the output is stable.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        lines.sort();
        lines
    }
}

/// A request that passed every syntax and whitelist check.
#[derive(Debug, Clone)]
pub struct Request {
    pub line: ParsedRequestLine,
    pub headers: HeaderMap,
}

impl Request {
    pub fn target(&self) -> &str {
        &self.line.target
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }
}
