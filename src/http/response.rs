use bytes::{Bytes, BytesMut};

use crate::error::ResponseError;
use crate::http::writer::serialize_head;

/// Status and headers recorded by `start_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status text including the code, e.g. "200 OK"
    pub status: String,
    /// Headers in emission order
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn new<I, K, V>(status: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            status: status.into(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Per-request response state machine.
///
/// ```text
///   Idle ──start──▶ Started ──first write / finish──▶ Committed
///                     ▲  │
///                     └──┘ start with error info (replaces the head)
/// ```
///
/// Bytes "flushed" by the write function are staged in `wire`, which the
/// response writer puts on the socket. `sent` implies `committed`.
#[derive(Debug, Default)]
pub struct ResponseState {
    head: Option<ResponseHead>,
    committed: bool,
    sent: bool,
    wire: BytesMut,
}

impl ResponseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    /// Headers have been serialized for the peer and can no longer change.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// At least one body byte has been flushed.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Records the response head.
    ///
    /// Without `exc_info` a second head is refused. With it the head is
    /// replaced, unless the old one was already committed, in which case
    /// the original failure comes back as [`ResponseError::Reraised`].
    pub fn start(
        &mut self,
        head: ResponseHead,
        exc_info: Option<anyhow::Error>,
    ) -> Result<(), ResponseError> {
        match exc_info {
            Some(original) if self.committed => return Err(ResponseError::Reraised(original)),
            Some(_) => {}
            None if self.head.is_some() => return Err(ResponseError::HeadersAlreadySet),
            None => {}
        }

        self.head = Some(head);
        Ok(())
    }

    /// Flushes body bytes, committing the head first if needed.
    pub fn write(&mut self, data: &[u8]) -> Result<(), ResponseError> {
        self.commit(ResponseError::WriteBeforeStart)?;

        if !data.is_empty() {
            self.wire.extend_from_slice(data);
            self.sent = true;
        }

        Ok(())
    }

    /// Consumes the state and appends the handler's body, in order.
    pub fn finish<I>(mut self, body: I) -> Result<Bytes, ResponseError>
    where
        I: IntoIterator<Item = Bytes>,
    {
        self.commit(ResponseError::NoResponseStarted)?;

        for chunk in body {
            self.wire.extend_from_slice(&chunk);
        }

        Ok(self.wire.freeze())
    }

    /// Whatever was already flushed, for delivery after a failure.
    pub fn into_flushed(self) -> Bytes {
        self.wire.freeze()
    }

    fn commit(&mut self, missing: ResponseError) -> Result<(), ResponseError> {
        if self.committed {
            return Ok(());
        }

        let head = self.head.as_ref().ok_or(missing)?;
        serialize_head(head, &mut self.wire);
        self.committed = true;
        Ok(())
    }
}
