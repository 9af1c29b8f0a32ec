use std::path::PathBuf;

use crate::http::response::StatusCode;

/// Result of validating and resolving one request.
///
/// The reason strings are for logs only and never reach the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The target resolved to an existing regular file
    Ok(PathBuf),
    /// Malformed or non-whitelisted request (400)
    ClientError(&'static str),
    /// Missing file or a target escaping the document root (404)
    NotFound(&'static str),
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Ok(_) => StatusCode::Ok,
            Outcome::ClientError(_) => StatusCode::BadRequest,
            Outcome::NotFound(_) => StatusCode::NotFound,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::ClientError(reason) | Outcome::NotFound(reason) => Some(*reason),
        }
    }
}
