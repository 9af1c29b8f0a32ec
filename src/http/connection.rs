use std::path::PathBuf;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;

use crate::http::handler::{classify_lex_error, handle};
use crate::http::lexer::{LexError, find_head_end};
use crate::http::outcome::Outcome;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Idle time allowed between two reads before the cycle is abandoned.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest request head buffered while waiting for `\r\n\r\n`.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 1024;

/// Drives one client connection through request cycles.
///
/// The stream is any async byte stream so tests can use in-memory pipes.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    doc_root: PathBuf,
    read_timeout: Duration,
}

pub enum ConnectionState {
    Reading,
    Processing(BytesMut),
    Writing(ResponseWriter, bool), // bool = read another request afterwards?
    Closed,
}

/// What a read phase ended with.
#[derive(Debug)]
pub enum ReadEvent {
    /// The buffer holds a complete head (and possibly body bytes)
    Head(BytesMut),
    /// Timeout or EOF with nothing buffered
    Idle,
    /// Timeout or EOF in the middle of a request
    Partial,
    /// More than [`MAX_HEAD_SIZE`] bytes without a terminator
    TooLarge,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, doc_root: PathBuf, read_timeout: Duration) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            doc_root,
            read_timeout,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    ReadEvent::Head(buf) => {
                        self.state = ConnectionState::Processing(buf);
                    }
                    ReadEvent::Idle => {
                        tracing::debug!("Idle connection, closing");
                        self.state = ConnectionState::Closed;
                    }
                    ReadEvent::Partial => {
                        let outcome = classify_lex_error(LexError::Incomplete);
                        log_outcome(&outcome, StatusCode::BadRequest);

                        let writer = ResponseWriter::new(&Response::client_error());
                        self.state = ConnectionState::Writing(writer, false);
                    }
                    ReadEvent::TooLarge => {
                        let outcome = Outcome::ClientError("request head too large");
                        log_outcome(&outcome, StatusCode::BadRequest);

                        let writer = ResponseWriter::new(&Response::client_error());
                        self.state = ConnectionState::Writing(writer, false);
                    }
                },

                ConnectionState::Processing(buf) => {
                    let (outcome, response) = match handle(&buf[..], &self.doc_root) {
                        Ok(handled) => handled,
                        // Read phase only hands over buffers containing a terminator
                        Err(e) => {
                            let outcome = classify_lex_error(e);
                            let response = Response::client_error();
                            (outcome, response)
                        }
                    };
                    log_outcome(&outcome, response.status);

                    let keep_reading = response.status == StatusCode::Ok;
                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_reading);
                }

                ConnectionState::Writing(writer, keep_reading) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_reading {
                        self.state = ConnectionState::Reading; // next request cycle
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until the head terminator shows up, the peer goes quiet for
    /// longer than the read timeout, the peer closes, or the head grows past
    /// [`MAX_HEAD_SIZE`].
    pub async fn read_request(&mut self) -> anyhow::Result<ReadEvent> {
        loop {
            if find_head_end(&self.buffer).is_some() {
                return Ok(ReadEvent::Head(self.buffer.split()));
            }

            // Prevent unbounded header growth
            if self.buffer.len() > MAX_HEAD_SIZE {
                tracing::debug!(buffered = self.buffer.len(), "Request head too large");
                self.buffer = BytesMut::with_capacity(4096);
                return Ok(ReadEvent::TooLarge);
            }

            self.buffer.reserve(READ_CHUNK);
            let read = timeout(self.read_timeout, self.stream.read_buf(&mut self.buffer)).await;

            let n = match read {
                Ok(result) => result?,
                Err(_) => {
                    tracing::debug!(buffered = self.buffer.len(), "Read timed out");
                    0
                }
            };

            if n == 0 {
                return Ok(if self.buffer.is_empty() {
                    ReadEvent::Idle
                } else {
                    self.buffer.clear();
                    ReadEvent::Partial
                });
            }
        }
    }
}

fn log_outcome(outcome: &Outcome, sent: StatusCode) {
    if let Some(reason) = outcome.reason() {
        tracing::warn!(
            status = outcome.status().as_u16(),
            reason = %reason,
            "Request rejected"
        );
        return;
    }

    // A resolved file answered with anything but 200 was already logged
    // by the synthesizer
    if let Outcome::Ok(path) = outcome {
        if sent == outcome.status() {
            tracing::info!(status = sent.as_u16(), path = %path.display(), "Serving file");
        }
    }
}
