use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::WorkerError;
use crate::http::response::{ResponseHead, ResponseState};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Status line, headers in order, then the blank separator line.
pub(crate) fn serialize_head(head: &ResponseHead, buf: &mut BytesMut) {
    buf.put_slice(HTTP_VERSION.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(head.status.as_bytes());
    buf.put_slice(b"\r\n");

    for (k, v) in &head.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(b"\r\n");
}

/// A fully serialized response waiting to go out.
#[derive(Default)]
pub struct ResponseWriter {
    buffer: Bytes,
}

impl ResponseWriter {
    /// Serializes the recorded head and the concatenated body chunks.
    pub fn new<I>(state: ResponseState, body: I) -> Result<Self, WorkerError>
    where
        I: IntoIterator<Item = Bytes>,
    {
        Ok(Self {
            buffer: state.finish(body)?,
        })
    }

    /// Only the bytes the handler already flushed before failing.
    pub fn partial(state: ResponseState) -> Self {
        Self {
            buffer: state.into_flushed(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Writes the whole buffer in one go, then shuts the stream down.
    ///
    /// The stream is taken by value so it is dropped, and therefore closed,
    /// exactly once whether or not the write succeeds. A failed shutdown
    /// is logged; the response is already out by then.
    pub async fn finish<S>(self, mut stream: S) -> Result<(), WorkerError>
    where
        S: AsyncWrite + Unpin,
    {
        if !self.buffer.is_empty() {
            stream.write_all(&self.buffer).await?;
            stream.flush().await?;
        }

        if let Err(e) = stream.shutdown().await {
            debug!(error = %e, "Shutdown after response failed");
        }
        Ok(())
    }
}
