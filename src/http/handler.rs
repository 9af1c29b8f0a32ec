use std::path::Path;

use crate::http::lexer::{LexError, lex};
use crate::http::outcome::Outcome;
use crate::http::request::RawRequest;
use crate::http::resolver::resolve;
use crate::http::response::Response;
use crate::http::synthesizer::synthesize;
use crate::http::validator::validate;

/// Runs validation and resolution for one lexed request.
pub fn classify(raw: &RawRequest, doc_root: &Path) -> Outcome {
    match validate(raw) {
        Ok(request) => {
            tracing::debug!(
                method = %request.line.method,
                headers = request.headers.len(),
                "Request validated"
            );
            resolve(request.target(), doc_root)
        }
        Err(rejection) => rejection,
    }
}

/// Classifies a lex failure that ends a connection cycle.
pub fn classify_lex_error(err: LexError) -> Outcome {
    match err {
        LexError::Incomplete => Outcome::ClientError("incomplete request"),
        LexError::InvalidEncoding => Outcome::ClientError("invalid utf-8 in request head"),
    }
}

/// Runs the whole pipeline over a buffered request.
///
/// Returns `Err(LexError::Incomplete)` while the buffer has no head
/// terminator; the caller keeps reading. Every other input produces the
/// outcome and the response to send.
pub fn handle(buf: &[u8], doc_root: &Path) -> Result<(Outcome, Response), LexError> {
    let outcome = match lex(buf) {
        Ok(raw) => {
            tracing::debug!(
                request_line = %raw.request_line,
                headers = raw.header_lines.len(),
                body_len = raw.body.len(),
                "Lexed request"
            );
            classify(&raw, doc_root)
        }
        Err(LexError::Incomplete) => return Err(LexError::Incomplete),
        Err(e) => classify_lex_error(e),
    };

    let response = synthesize(&outcome);
    Ok((outcome, response))
}
