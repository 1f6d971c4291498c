use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line, headers and blank line of `resp`.
pub fn serialize_head(resp: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(128);

    // Status line
    buf.put_slice(HTTP_VERSION.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.as_u16().to_string().as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.reason_phrase().as_bytes());
    buf.put_slice(b"\r\n");

    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf
}

/// Writes one serialized response to a stream.
pub struct ResponseWriter<'a> {
    head: Bytes,
    body: &'a [u8],
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response) -> Self {
        Self {
            head: serialize_head(response).freeze(),
            body: &response.body,
        }
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;
        stream.write_all(self.body).await?;
        stream.flush().await?;
        Ok(())
    }
}
