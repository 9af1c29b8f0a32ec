//! Myserver - minimal static file HTTP server
//!
//! Core library: request lexing, validation, path resolution and
//! response synthesis, plus the connection driver and accept loop.

pub mod config;
pub mod http;
pub mod server;

pub use http::handler::handle;
