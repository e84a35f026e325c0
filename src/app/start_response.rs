use std::time::SystemTime;

use crate::error::ResponseError;
use crate::http::response::{ResponseHead, ResponseState};

/// Failure the application is recovering from when it restarts a response.
#[derive(Debug)]
pub struct ExcInfo(pub anyhow::Error);

impl From<anyhow::Error> for ExcInfo {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

/// The `start_response` callable given to an application.
///
/// Owns the request's [`ResponseState`]; nothing else mutates it until the
/// application returns.
#[derive(Debug)]
pub struct StartResponse {
    state: ResponseState,
    server_software: String,
}

impl StartResponse {
    pub fn new(server_software: impl Into<String>) -> Self {
        Self {
            state: ResponseState::new(),
            server_software: server_software.into(),
        }
    }

    /// Records status and headers; `Date` and `Server` are appended after
    /// the caller's headers.
    pub fn start<I, K, V>(
        &mut self,
        status: impl Into<String>,
        headers: I,
        exc_info: Option<ExcInfo>,
    ) -> Result<Writer<'_>, ResponseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut head = ResponseHead::new(status, headers);
        head.headers
            .push(("Date".to_string(), httpdate::fmt_http_date(SystemTime::now())));
        head.headers
            .push(("Server".to_string(), self.server_software.clone()));

        self.state.start(head, exc_info.map(|e| e.0))?;
        Ok(Writer { state: &mut self.state })
    }

    /// The write function, usable without holding the handle from `start`.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<(), ResponseError> {
        self.state.write(data.as_ref())
    }

    pub fn state(&self) -> &ResponseState {
        &self.state
    }

    pub fn into_state(self) -> ResponseState {
        self.state
    }
}

/// Write function returned by [`StartResponse::start`].
///
/// The first call commits the headers, later calls only append body bytes.
#[derive(Debug)]
pub struct Writer<'a> {
    state: &'a mut ResponseState,
}

impl Writer<'_> {
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<(), ResponseError> {
        self.state.write(data.as_ref())
    }
}
