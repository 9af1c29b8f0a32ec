//! HTTP protocol implementation.
//!
//! This module implements a restricted HTTP/1.1 subset: one GET-style
//! retrieval per request cycle, whitelisted headers only, files served from
//! a single document root.
//!
//! # Architecture
//!
//! The request pipeline is split into small synchronous stages:
//!
//! - **`lexer`**: Splits a byte buffer into request line, header lines and body
//! - **`validator`**: Syntax, whitelist and traversal checks
//! - **`resolver`**: Maps the target onto the document root
//! - **`synthesizer`**: Builds the response for an [`outcome::Outcome`]
//! - **`handler`**: Runs the stages above in order
//!
//! Around them:
//!
//! - **`request`**: Raw and validated request types, header whitelist
//! - **`response`**: Status codes, response representation, error page
//! - **`mime`**: Content type detection based on file extensions
//! - **`writer`**: Serializes and writes responses to the client
//! - **`connection`**: Per-connection state machine with an idle read timeout
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until \r\n\r\n or idle timeout
//!        └──────┬──────┘
//!               │ Head received (or partial head timed out → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Lex, validate, resolve, synthesize
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ 200 → Reading (next cycle)
//!               └─ error → Closed
//! ```
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use myserver::http::response::StatusCode;
//!
//! let req = b"GET /../secret HTTP/1.1\r\nHost: x\r\n\r\n";
//! let (_, response) = myserver::handle(req, Path::new("/srv/www")).unwrap();
//! assert_eq!(response.status, StatusCode::NotFound);
//! ```

pub mod connection;
pub mod handler;
pub mod lexer;
pub mod mime;
pub mod outcome;
pub mod request;
pub mod resolver;
pub mod response;
pub mod synthesizer;
pub mod validator;
pub mod writer;
