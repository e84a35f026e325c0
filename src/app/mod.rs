//! The application side of the gateway.
//!
//! An [`Application`] is a synchronous callable. It receives the request's
//! [`Environ`] and a [`StartResponse`], and returns a [`Body`]: a finite
//! sequence of byte chunks that is consumed exactly once.
//!
//! ```ignore
//! use conduit::app::{Body, Environ, StartResponse};
//!
//! fn hello(_env: &Environ, start: &mut StartResponse) -> anyhow::Result<Body> {
//!     start.start("200 OK", [("Content-Type", "text/plain")], None)?;
//!     Ok(Body::from("Hello"))
//! }
//! ```

pub mod environ;
pub mod registry;
pub mod start_response;

use std::sync::Arc;

use bytes::Bytes;

pub use environ::{Environ, ErrorStream};
pub use start_response::{ExcInfo, StartResponse, Writer};

use crate::error::{ResponseError, WorkerError};
use crate::http::response::ResponseState;

pub trait Application: Send + Sync + 'static {
    fn call(&self, environ: &Environ, start_response: &mut StartResponse) -> anyhow::Result<Body>;
}

impl<F> Application for F
where
    F: Fn(&Environ, &mut StartResponse) -> anyhow::Result<Body> + Send + Sync + 'static,
{
    fn call(&self, environ: &Environ, start_response: &mut StartResponse) -> anyhow::Result<Body> {
        self(environ, start_response)
    }
}

/// Wraps a closure as a shareable application.
pub fn from_fn<F>(f: F) -> Arc<dyn Application>
where
    F: Fn(&Environ, &mut StartResponse) -> anyhow::Result<Body> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Response body produced by an application, possibly lazily.
pub struct Body(Box<dyn Iterator<Item = Bytes>>);

impl Body {
    pub fn empty() -> Self {
        Self(Box::new(std::iter::empty()))
    }

    pub fn from_chunks<I, T>(chunks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        T: Into<Bytes> + 'static,
    {
        Self(Box::new(chunks.into_iter().map(Into::into)))
    }
}

impl Iterator for Body {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        self.0.next()
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Self::from_chunks([s])
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Self::from_chunks([s])
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Self::from_chunks([v])
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Self::from_chunks([b])
    }
}

/// A handler that returned normally, with its body fully drained.
#[derive(Debug)]
pub struct Completed {
    pub state: ResponseState,
    pub body: Vec<Bytes>,
}

/// A handler that failed. `state` still holds anything it flushed.
#[derive(Debug)]
pub struct Failed {
    pub state: ResponseState,
    pub error: WorkerError,
}

/// Calls the application once and drains its body in order.
///
/// Blocks for as long as the application does; callers run it off the
/// async executor.
pub fn invoke(
    app: &dyn Application,
    environ: &Environ,
    server_software: &str,
) -> Result<Completed, Failed> {
    let mut start_response = StartResponse::new(server_software);

    match app.call(environ, &mut start_response) {
        Ok(body) => Ok(Completed {
            state: start_response.into_state(),
            body: body.collect(),
        }),
        Err(err) => Err(Failed {
            state: start_response.into_state(),
            error: classify(err),
        }),
    }
}

fn classify(err: anyhow::Error) -> WorkerError {
    match err.downcast::<ResponseError>() {
        Ok(violation) => WorkerError::Response(violation),
        Err(other) => WorkerError::Application(other),
    }
}
