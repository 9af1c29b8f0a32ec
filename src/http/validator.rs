//! Syntax and whitelist checks for a lexed request.
//!
//! Checks run in a fixed order and the first failure decides the outcome:
//!
//! 1. the target starts with `/`
//! 2. the request line has exactly three tokens
//! 3. the target never climbs above the document root
//! 4. every header line is `Name: value` with a whitelisted name
//! 5. a `Host` header is present

use crate::http::outcome::Outcome;
use crate::http::request::{HeaderMap, ParsedRequestLine, RawRequest, Request, is_allowed_header};
use crate::http::resolver::escapes_root;

/// Separator between a header name and its value.
pub const HEADER_SEPARATOR: &str = ": ";

/// Validates a raw request.
///
/// On failure the error is a [`Outcome::ClientError`] or
/// [`Outcome::NotFound`]; file existence is left to the resolver.
pub fn validate(raw: &RawRequest) -> Result<Request, Outcome> {
    let tokens: Vec<&str> = raw.request_line.split_whitespace().collect();

    if let Some(target) = tokens.get(1) {
        if !target.starts_with('/') {
            return Err(Outcome::ClientError("illegal input"));
        }
    }

    let line = ParsedRequestLine::parse(&raw.request_line)
        .ok_or(Outcome::ClientError("malformed"))?;

    if escapes_root(&line.target) {
        return Err(Outcome::NotFound("escaping the doc root"));
    }

    let headers = parse_headers(&raw.header_lines)?;

    if !headers.contains("Host") {
        return Err(Outcome::ClientError("no Host header"));
    }

    Ok(Request { line, headers })
}

/// Builds a [`HeaderMap`] from header lines, rejecting bad syntax and
/// names outside the whitelist. A repeated name keeps its last value.
pub fn parse_headers<S: AsRef<str>>(lines: &[S]) -> Result<HeaderMap, Outcome> {
    let mut headers = HeaderMap::new();

    for line in lines {
        let (key, value) = split_header_line(line.as_ref())?;

        if !is_allowed_header(key) {
            return Err(Outcome::ClientError("malformed"));
        }

        headers.insert(key, value);
    }

    Ok(headers)
}

/// Splits `Name: value` at the first colon, which must be followed by a
/// single space.
pub fn split_header_line(line: &str) -> Result<(&str, &str), Outcome> {
    let colon = line.find(':').ok_or(Outcome::ClientError("no colon"))?;

    // The first ": " is necessarily the one at `colon`
    line[colon..]
        .starts_with(HEADER_SEPARATOR)
        .then(|| (&line[..colon], &line[colon + HEADER_SEPARATOR.len()..]))
        .ok_or(Outcome::ClientError("no space between colon and header value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_at_first_colon() {
        assert_eq!(
            split_header_line("Date: Tue, 15 Nov 1994 08:12:31 GMT"),
            Ok(("Date", "Tue, 15 Nov 1994 08:12:31 GMT"))
        );
    }

    #[test]
    fn colon_at_end_of_line() {
        assert_eq!(
            split_header_line("Host:"),
            Err(Outcome::ClientError("no space between colon and header value"))
        );
    }
}
