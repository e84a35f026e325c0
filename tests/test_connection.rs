use std::sync::Arc;

use conduit::app::{from_fn, Body, Environ, StartResponse};
use conduit::config::Config;
use conduit::error::{ResponseError, WorkerError};
use conduit::http::connection::Connection;
use conduit::server::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn unit() -> (TcpStream, Connection) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = from_fn(|env: &Environ, start: &mut StartResponse| match env.path_info.as_str() {
        "/early-write" => {
            start.write("x")?;
            Ok(Body::empty())
        }
        "/half" => {
            start.start("200 OK", Vec::<(String, String)>::new(), None)?;
            start.write("partial")?;
            anyhow::bail!("handler failed")
        }
        _ => {
            start.start("200 OK", Vec::<(String, String)>::new(), None)?;
            Ok(Body::from("ok"))
        }
    });
    let server = Arc::new(Server::new(addr, app, &Config::default()));

    let client = TcpStream::connect(addr).await.unwrap();
    let (stream, peer) = listener.accept().await.unwrap();
    (client, Connection::new(stream, peer, server))
}

async fn exchange(request: &[u8]) -> (Result<(), WorkerError>, Vec<u8>) {
    let (mut client, conn) = unit().await;
    client.write_all(request).await.unwrap();

    let result = conn.run().await;

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    (result, out)
}

#[tokio::test]
async fn test_unit_completes_and_closes() {
    let (result, out) = exchange(b"GET / HTTP/1.1\r\n\r\n").await;

    assert!(result.is_ok());
    assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(out.ends_with(b"\r\n\r\nok"));
}

#[tokio::test]
async fn test_unit_failure_closes_with_nothing_sent() {
    let (result, out) = exchange(b"GET /early-write HTTP/1.1\r\n\r\n").await;

    assert!(matches!(
        result,
        Err(WorkerError::Response(ResponseError::WriteBeforeStart))
    ));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_unit_failure_delivers_flushed_bytes_then_closes() {
    let (result, out) = exchange(b"GET /half HTTP/1.1\r\n\r\n").await;

    assert!(matches!(result, Err(WorkerError::Application(_))));
    assert!(out.ends_with(b"\r\n\r\npartial"));
}

#[tokio::test]
async fn test_unit_peer_closing_early_is_clean() {
    let (client, conn) = unit().await;
    drop(client);

    assert!(conn.run().await.is_ok());
}
