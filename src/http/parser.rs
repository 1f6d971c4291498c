use std::collections::HashMap;
use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::request::{Method, Request};

/// Upper bound on the request line plus all header lines, terminators included.
pub const MAX_HEAD_BYTES: u64 = 64 * 1024;

/// Reasons a request head could not be read off the stream.
///
/// Every variant ends the connection without a response.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The peer closed the stream before sending a request line.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// The stream ended in the middle of the request head.
    #[error("unexpected end of stream in request head")]
    UnexpectedEof,
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("request head is not valid UTF-8")]
    InvalidEncoding,
    #[error("request head exceeds {MAX_HEAD_BYTES} bytes")]
    HeadTooLarge,
    #[error("I/O error reading request: {0}")]
    Io(#[from] io::Error),
}

/// Reads exactly one request head (request line and headers) from `reader`.
///
/// Bytes after the blank line are left in the reader for the next request.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut budget = MAX_HEAD_BYTES;
    let first = match read_line(reader, &mut budget).await? {
        Some(line) => line,
        None => return Err(ParseError::ConnectionClosed),
    };
    let (method, path, version) = parse_request_line(&first)?;

    let mut headers = HashMap::new();
    loop {
        let line = read_line(reader, &mut budget)
            .await?
            .ok_or(ParseError::UnexpectedEof)?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        match parse_header_line(line) {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => tracing::debug!(line, "Skipping header line without colon"),
        }
    }

    Ok(Request {
        method,
        path,
        version,
        headers,
    })
}

/// Splits a request line into method, target and version.
///
/// Tokens are separated by single spaces. Tokens beyond the third are ignored.
pub fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let trimmed = line.trim_end();
    let mut parts = trimmed.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(path), Some(version)) => {
            Ok((Method::parse(method), path.to_string(), version.to_string()))
        }
        _ => Err(ParseError::MalformedRequestLine(trimmed.to_string())),
    }
}

/// Splits a header line on its first colon.
///
/// Returns the lower-cased, trimmed name and the trimmed value, or `None`
/// when the line has no colon. Such lines are dropped rather than failing
/// the whole request.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
}

/// Reads one `\n`-terminated line, charging its length to `budget`.
/// `None` means the stream ended cleanly before any byte of the line.
async fn read_line<R>(reader: &mut R, budget: &mut u64) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    if *budget == 0 {
        return Err(ParseError::HeadTooLarge);
    }

    let mut buf = Vec::new();
    let n = (&mut *reader).take(*budget).read_until(b'\n', &mut buf).await?;
    *budget -= n as u64;
    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        return Err(if *budget == 0 {
            ParseError::HeadTooLarge
        } else {
            ParseError::UnexpectedEof
        });
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| ParseError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parse_simple_get() {
        let mut req: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request(&mut req).await.unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("host").unwrap(), "example.com");
        assert!(req.is_empty());
    }

    #[test]
    fn header_line_splits_on_first_colon() {
        let (name, value) = parse_header_line("X-Time: 12:30:00").unwrap();
        assert_eq!(name, "x-time");
        assert_eq!(value, "12:30:00");
    }
}
