use std::io::{self, Cursor, Write};

use bytes::Bytes;

use crate::http::request::RequestLine;
use crate::server::ServerIdentity;

pub const URL_SCHEME: &str = "http";

/// Version of the invocation contract advertised to handlers.
pub const PROTOCOL_VERSION: (u8, u8) = (1, 0);

/// Error stream handed to the application.
///
/// Writes are forwarded to `tracing` under the `wsgi.errors` target, one
/// event per write.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorStream;

impl Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let text = text.trim_end();
        if !text.is_empty() {
            tracing::error!(target: "wsgi.errors", "{}", text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Invocation context passed to the application for one request.
#[derive(Debug, Clone)]
pub struct Environ {
    pub version: (u8, u8),
    pub url_scheme: &'static str,
    /// Raw bytes of the single read, headers and any body included.
    pub input: Bytes,
    pub errors: ErrorStream,
    pub multithread: bool,
    pub multiprocess: bool,
    pub run_once: bool,
    pub request_method: String,
    pub path_info: String,
    pub query_string: String,
    pub server_protocol: String,
    pub server_name: String,
    pub server_port: String,
}

impl Environ {
    /// Builds the context for a parsed request. Never fails.
    pub fn build(line: &RequestLine, raw: Bytes, server: &ServerIdentity) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            url_scheme: URL_SCHEME,
            input: raw,
            errors: ErrorStream,
            multithread: false,
            multiprocess: true,
            run_once: false,
            request_method: line.method.clone(),
            path_info: line.path.clone(),
            query_string: line.query().to_string(),
            server_protocol: line.version.clone(),
            server_name: server.name.clone(),
            server_port: server.port.to_string(),
        }
    }

    /// A fresh reader over the request bytes.
    pub fn input(&self) -> Cursor<Bytes> {
        Cursor::new(self.input.clone())
    }

    /// Looks a recognised key up by its conventional name.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "wsgi.version" => format!("{}.{}", self.version.0, self.version.1),
            "wsgi.url_scheme" => self.url_scheme.to_string(),
            "wsgi.multithread" => self.multithread.to_string(),
            "wsgi.multiprocess" => self.multiprocess.to_string(),
            "wsgi.run_once" => self.run_once.to_string(),
            "REQUEST_METHOD" => self.request_method.clone(),
            "PATH_INFO" => self.path_info.clone(),
            "QUERY_STRING" => self.query_string.clone(),
            "SERVER_PROTOCOL" => self.server_protocol.clone(),
            "SERVER_NAME" => self.server_name.clone(),
            "SERVER_PORT" => self.server_port.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// All scalar keys in a stable order.
    pub fn keys() -> &'static [&'static str] {
        &[
            "wsgi.version",
            "wsgi.url_scheme",
            "wsgi.multithread",
            "wsgi.multiprocess",
            "wsgi.run_once",
            "REQUEST_METHOD",
            "PATH_INFO",
            "QUERY_STRING",
            "SERVER_PROTOCOL",
            "SERVER_NAME",
            "SERVER_PORT",
        ]
    }
}
