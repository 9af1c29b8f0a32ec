use crate::http::request::RawRequest;

/// Marks the end of the request head.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

const LINE_DELIMITER: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// No `\r\n\r\n` in the buffer yet; read more.
    Incomplete,
    /// The head is not valid UTF-8.
    InvalidEncoding,
}

/// Splits a buffered request into request line, header lines and body.
///
/// The body is everything after the terminator.
pub fn lex(buf: &[u8]) -> Result<RawRequest, LexError> {
    let head_end = find_head_end(buf).ok_or(LexError::Incomplete)?;
    let head_bytes = &buf[..head_end];
    let body_bytes = &buf[head_end + HEAD_TERMINATOR.len()..];

    let head = std::str::from_utf8(head_bytes).map_err(|_| LexError::InvalidEncoding)?;

    let mut lines = head.split(LINE_DELIMITER);

    // `split` always yields at least one item, even for an empty head
    let request_line = lines.next().unwrap_or_default().to_string();
    let header_lines = lines.map(str::to_string).collect();

    Ok(RawRequest {
        request_line,
        header_lines,
        body: body_bytes.to_vec(),
    })
}

/// Position of the first `\r\n\r\n`, if any.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let raw = lex(req).unwrap();

        assert_eq!(raw.request_line, "GET / HTTP/1.1");
        assert_eq!(raw.header_lines, vec!["Host: example.com"]);
        assert!(raw.body.is_empty());
    }

    #[test]
    fn terminator_split_across_reads() {
        let mut buf = b"GET / HTTP/1.1\r\nHost: x\r\n\r".to_vec();
        assert_eq!(lex(&buf), Err(LexError::Incomplete));

        buf.push(b'\n');
        assert!(lex(&buf).is_ok());
    }
}
