//! Single-range `Range: bytes=...` handling.
//!
//! Supported forms are `bytes=N-M`, `bytes=N-` and the suffix form
//! `bytes=-N`. Multi-range requests are rejected.

use std::io::SeekFrom;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

const BYTES_PREFIX: &str = "bytes=";

/// A validated, inclusive byte interval within a resource of `total` bytes.
///
/// Always satisfies `start <= end < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

/// Why a range could not be served. All variants map to 416 on the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range header does not start with \"bytes=\"")]
    MissingPrefix,
    #[error("range spec {0:?} is not a single start-end pair")]
    MalformedSpec(String),
    #[error("range bound {0:?} is not a number")]
    InvalidNumber(String),
    #[error("range {start}-{end} not satisfiable for {total} bytes")]
    Unsatisfiable { start: u64, end: u64, total: u64 },
    #[error("resource does not support range requests")]
    Unsupported,
}

impl ByteRange {
    /// Number of bytes in the interval.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Parses a `Range` header value against a resource of `total` bytes.
///
/// # Example
///
/// ```
/// # use rangeserve::http::range::parse_range;
/// let r = parse_range("bytes=-1000", 100).unwrap();
/// assert_eq!((r.start, r.end), (0, 99));
/// ```
pub fn parse_range(header: &str, total: u64) -> Result<ByteRange, RangeError> {
    let spec = header
        .strip_prefix(BYTES_PREFIX)
        .ok_or(RangeError::MissingPrefix)?;

    let parts: Vec<&str> = spec.split('-').collect();
    let [first, second] = parts.as_slice() else {
        return Err(RangeError::MalformedSpec(spec.to_string()));
    };

    let (start, end) = if first.is_empty() {
        // Suffix form: the last N bytes, clamped to the whole resource.
        let suffix = parse_bound(second)?.min(total);
        (total - suffix, total.checked_sub(1))
    } else {
        let start = parse_bound(first)?;
        let end = if second.is_empty() {
            total.checked_sub(1)
        } else {
            Some(parse_bound(second)?)
        };
        (start, end)
    };

    match end {
        Some(end) if start <= end && end < total => Ok(ByteRange { start, end, total }),
        // An empty resource has no last byte to point at.
        _ => Err(RangeError::Unsatisfiable {
            start,
            end: end.unwrap_or(0),
            total,
        }),
    }
}

fn parse_bound(s: &str) -> Result<u64, RangeError> {
    s.parse()
        .map_err(|_| RangeError::InvalidNumber(s.to_string()))
}

/// Seeks `source` to the start of `range` and reads exactly `range.len()` bytes.
///
/// A short read, e.g. from a file truncated after it was opened, is an
/// `UnexpectedEof` error.
pub async fn read_range<S>(source: &mut S, range: &ByteRange) -> std::io::Result<Vec<u8>>
where
    S: AsyncRead + AsyncSeek + Unpin + ?Sized,
{
    source.seek(SeekFrom::Start(range.start)).await?;

    let len = usize::try_from(range.len())
        .map_err(|_| std::io::Error::other("range too large for this platform"))?;
    let mut buf = vec![0u8; len];
    source.read_exact(&mut buf).await?;
    Ok(buf)
}
