use std::fs;
use std::io;
use std::path::Path;

use crate::http::mime;
use crate::http::outcome::Outcome;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Turns an outcome into the response sent to the client.
///
/// Errors get the HTML error page. A file that disappears or becomes
/// unreadable after resolution yields a 500.
pub fn synthesize(outcome: &Outcome) -> Response {
    match outcome {
        Outcome::Ok(path) => match file_response(path) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Resolved file could not be read"
                );
                Response::internal_error()
            }
        },
        Outcome::ClientError(_) => Response::client_error(),
        Outcome::NotFound(_) => Response::not_found(),
    }
}

/// Builds a 200 response for an existing file.
pub fn file_response(path: &Path) -> io::Result<Response> {
    let metadata = fs::metadata(path)?;
    let modified = metadata.modified()?;

    let mut builder = ResponseBuilder::new(StatusCode::Ok)
        .header("Last-Modified", httpdate::fmt_http_date(modified));

    if let Some(content_type) = mime::content_type(path) {
        builder = builder.header("Content-Type", content_type);
    }

    let body = read_body(path)?;

    Ok(builder
        .header("Content-Length", metadata.len().to_string())
        .body(body)
        .build())
}

/// Reads the file, as UTF-8 text for HTML and as raw bytes otherwise.
fn read_body(path: &Path) -> io::Result<Vec<u8>> {
    if !mime::is_text(path) {
        return fs::read(path);
    }

    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text.into_bytes()),
        Err(e) => {
            tracing::warn!(path = %path.display(), "HTML file is not valid UTF-8, sending raw bytes");
            Ok(e.into_bytes())
        }
    }
}
