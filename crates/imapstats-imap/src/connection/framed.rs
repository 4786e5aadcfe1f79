//! Line and literal framing.
//!
//! A response frame is a CRLF-terminated line, extended by any literal
//! (`{n}\r\n` followed by `n` raw bytes) and the line that continues after it.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

const BUFFER_SIZE: usize = 8192;

/// Longest accepted line, literals excluded. A SEARCH over a large mailbox
/// returns every matching number on one line.
const MAX_LINE_LENGTH: usize = 64 * 1024 * 1024;

/// Largest accepted literal. Envelopes are small; anything bigger is hostile.
const MAX_LITERAL_SIZE: usize = 16 * 1024 * 1024;

/// Buffered framing over a byte stream.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(BUFFER_SIZE),
        }
    }

    /// Reads one complete response frame.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut frame = Vec::new();
        loop {
            let line = self.read_line().await?;
            frame.extend_from_slice(&line);

            let Some(len) = literal_length(&line) else {
                return Ok(frame);
            };
            if len > MAX_LITERAL_SIZE {
                return Err(Error::Protocol(format!(
                    "literal too large: {len} bytes (max {MAX_LITERAL_SIZE})"
                )));
            }
            let start = frame.len();
            frame.resize(start + len, 0);
            self.reader.read_exact(&mut frame[start..]).await?;
        }
    }

    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed by server",
                )));
            }

            if let Some(pos) = line_end(&line, buf) {
                line.extend_from_slice(&buf[..pos]);
                self.reader.consume(pos);
                return Ok(line);
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(Error::Protocol("line too long".to_string()));
            }
        }
    }

    /// Reads frames until the completion response for `tag` arrives.
    ///
    /// The returned frames include the tagged completion as the last entry.
    pub async fn read_until_tagged(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut frames = Vec::new();
        loop {
            let frame = self.read_response().await?;
            let done = is_tagged(&frame, tag);
            frames.push(frame);
            if done {
                return Ok(frames);
            }
        }
    }

    /// Writes and flushes a serialized command.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(data);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buffer).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Shuts down the write half.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.reader.get_mut().shutdown().await?;
        Ok(())
    }
}

/// Index just past the CRLF that ends the line, if `buf` contains it.
///
/// Handles a CR left at the end of `line` by the previous read.
fn line_end(line: &[u8], buf: &[u8]) -> Option<usize> {
    if line.last() == Some(&b'\r') && buf.first() == Some(&b'\n') {
        return Some(1);
    }
    buf.windows(2).position(|w| w == b"\r\n").map(|p| p + 2)
}

/// Parses a trailing `{n}` or `{n+}` literal announcement.
fn literal_length(line: &[u8]) -> Option<usize> {
    let body = line.strip_suffix(b"\r\n")?.strip_suffix(b"}")?;
    let body = body.strip_suffix(b"+").unwrap_or(body);
    let open = body.iter().rposition(|&b| b == b'{')?;
    let digits = &body[open + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn is_tagged(frame: &[u8], tag: &str) -> bool {
    frame
        .strip_prefix(tag.as_bytes())
        .is_some_and(|rest| rest.first() == Some(&b' '))
}
