//! Error taxonomy for the gateway.
//!
//! Everything here is scoped to a single connection except [`SpawnError`],
//! which the listener reports and survives.

use thiserror::Error;

/// The request line could not be split into method, path and version.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequest(String),
}

/// Violations of the response-start contract.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// `start_response` called again without error information.
    #[error("headers already set")]
    HeadersAlreadySet,

    /// The write function was used before `start_response`.
    #[error("write before headers set")]
    WriteBeforeStart,

    /// The handler returned without ever calling `start_response`.
    #[error("application never started a response")]
    NoResponseStarted,

    /// The handler tried to replace a response whose headers already went
    /// out. The original failure is handed back.
    #[error("headers already sent, re-raising: {0}")]
    Reraised(anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("worker limit of {limit} live units reached")]
    Exhausted { limit: usize },
}

/// How a worker unit ended abnormally.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error("application error: {0}")]
    Application(anyhow::Error),

    #[error("application panicked: {0}")]
    Panicked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
