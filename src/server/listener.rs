use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, info, trace, warn};

use crate::app::Application;
use crate::config::Config;
use crate::server::supervisor::Supervisor;
use crate::server::Server;

/// Pending connections queued by the kernel.
pub const BACKLOG: u32 = 1024;

pub struct Listener {
    socket: TcpListener,
    supervisor: Supervisor,
}

impl Listener {
    /// Binds with address reuse enabled and starts listening.
    pub async fn bind(cfg: &Config, app: Arc<dyn Application>) -> anyhow::Result<Self> {
        let addr = tokio::net::lookup_host(&cfg.listen_addr)
            .await
            .with_context(|| format!("resolving {}", cfg.listen_addr))?
            .next()
            .with_context(|| format!("no address for {}", cfg.listen_addr))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("binding {addr}"))?;
        let socket = socket.listen(BACKLOG)?;

        let server = Arc::new(Server::new(socket.local_addr()?, app, cfg));

        Ok(Self {
            socket,
            supervisor: Supervisor::new(server, cfg.max_workers),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.supervisor.server().local_addr
    }

    pub fn server(&self) -> &Arc<Server> {
        self.supervisor.server()
    }

    /// Accepts forever. Only a non-interrupt accept failure ends the loop.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                accepted = self.socket.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "Accepted connection");
                        if let Err(e) = self.supervisor.spawn(stream, peer) {
                            warn!(%peer, error = %e, "Dropping connection");
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e).context("accept failed"),
                },

                reaped = self.supervisor.reaper_mut().collect(), if self.supervisor.live() > 0 => {
                    trace!(reaped, live = self.supervisor.live(), "Reaped worker units");
                }
            }
        }
    }
}

pub async fn run(cfg: &Config, app: Arc<dyn Application>) -> anyhow::Result<()> {
    let listener = Listener::bind(cfg, app).await?;
    let server = listener.server();
    info!(
        addr = %server.local_addr,
        server_name = %server.identity.name,
        "Serving HTTP on port {}",
        server.identity.port
    );
    listener.run().await
}
