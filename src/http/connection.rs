use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, enabled, Level};

use crate::app::{self, Completed, Environ, Failed};
use crate::error::WorkerError;
use crate::http::parser::parse_request_line;
use crate::http::writer::ResponseWriter;
use crate::server::Server;

/// One worker unit: a single connection carried from read to close.
///
/// The unit owns its stream outright and hands it to
/// [`ResponseWriter::finish`] at the end, so every exit path closes it
/// exactly once.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    server: Arc<Server>,
}

pub enum ConnectionState {
    Reading,
    Invoking(Environ),
    Writing(ResponseWriter, Option<WorkerError>), // Some = deliver, then fail the unit
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, server: Arc<Server>) -> Self {
        Self {
            stream,
            peer,
            server,
        }
    }

    pub async fn run(mut self) -> Result<(), WorkerError> {
        let mut state = ConnectionState::Reading;

        loop {
            state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(environ) => ConnectionState::Invoking(environ),
                    None => ConnectionState::Writing(ResponseWriter::default(), None),
                },

                ConnectionState::Invoking(environ) => self.invoke(environ).await?,

                ConnectionState::Writing(writer, failure) => {
                    return self.respond(writer, failure).await;
                }
            };
        }
    }

    /// One bounded read, then the request line. No reassembly.
    async fn read_request(&mut self) -> Result<Option<Environ>, WorkerError> {
        let mut buf = vec![0u8; self.server.read_buffer];
        let n = self.stream.read(&mut buf).await?;

        if n == 0 {
            debug!(peer = %self.peer, "Peer closed before sending a request");
            return Ok(None);
        }

        buf.truncate(n);
        let raw = Bytes::from(buf);

        if enabled!(Level::DEBUG) {
            for line in String::from_utf8_lossy(&raw).lines() {
                debug!(peer = %self.peer, "< {}", line);
            }
        }

        let line = parse_request_line(&raw)?;
        Ok(Some(Environ::build(&line, raw, &self.server.identity)))
    }

    /// Runs the synchronous application on the blocking pool.
    async fn invoke(&self, environ: Environ) -> Result<ConnectionState, WorkerError> {
        let server = Arc::clone(&self.server);

        let outcome = tokio::task::spawn_blocking(move || {
            app::invoke(server.app.as_ref(), &environ, &server.server_software)
        })
        .await;

        match outcome {
            Ok(Ok(Completed { state, body })) => {
                Ok(ConnectionState::Writing(ResponseWriter::new(state, body)?, None))
            }
            Ok(Err(Failed { state, error })) => Ok(ConnectionState::Writing(
                ResponseWriter::partial(state),
                Some(error),
            )),
            Err(join_err) => Err(WorkerError::Panicked(panic_message(join_err))),
        }
    }

    /// Sends whatever the writer holds and closes the stream. A pending
    /// handler failure wins over a write error.
    async fn respond(
        self,
        writer: ResponseWriter,
        failure: Option<WorkerError>,
    ) -> Result<(), WorkerError> {
        let peer = self.peer;
        self.trace_response(&writer);

        let sent = writer.finish(self.stream).await;

        match failure {
            Some(err) => {
                if let Err(e) = sent {
                    debug!(%peer, error = %e, "Partial response not delivered");
                }
                Err(err)
            }
            None => sent,
        }
    }

    fn trace_response(&self, writer: &ResponseWriter) {
        if enabled!(Level::DEBUG) {
            for line in String::from_utf8_lossy(writer.as_bytes()).lines() {
                debug!(peer = %self.peer, "> {}", line);
            }
        }
    }
}

fn panic_message(err: tokio::task::JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
