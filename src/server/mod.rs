//! Accepting connections and supervising the worker units that serve them.
//!
//! ```text
//!   Listener ──accept──▶ Supervisor::spawn ──▶ worker unit (task)
//!      ▲                                           │ exits
//!      └──────── Reaper::collect ◀─────────────────┘
//! ```
//!
//! The listener only blocks on `accept` or on a unit-exit notification. A
//! unit shares nothing writable with the listener or with its siblings.

pub mod listener;
pub mod reaper;
pub mod supervisor;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::app::Application;
use crate::config::Config;

pub use listener::{Listener, BACKLOG};
pub use reaper::{Reaper, UnitExit};
pub use supervisor::Supervisor;

/// Host identity reported to applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub port: u16,
}

impl ServerIdentity {
    pub fn for_addr(addr: SocketAddr) -> Self {
        Self {
            name: resolve_server_name(addr.ip()),
            port: addr.port(),
        }
    }
}

/// Long-lived server description shared read-only with every unit.
pub struct Server {
    pub local_addr: SocketAddr,
    pub identity: ServerIdentity,
    pub app: Arc<dyn Application>,
    pub server_software: String,
    pub read_buffer: usize,
}

impl Server {
    pub fn new(local_addr: SocketAddr, app: Arc<dyn Application>, cfg: &Config) -> Self {
        Self {
            local_addr,
            identity: ServerIdentity::for_addr(local_addr),
            app,
            server_software: cfg.server_software.clone(),
            read_buffer: cfg.read_buffer,
        }
    }
}

fn resolve_server_name(ip: IpAddr) -> String {
    if ip.is_loopback() {
        "localhost".to_string()
    } else if ip.is_unspecified() {
        host_name()
    } else {
        ip.to_string()
    }
}

fn host_name() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_is_localhost() {
        let identity = ServerIdentity::for_addr("127.0.0.1:8080".parse().unwrap());
        assert_eq!(identity.name, "localhost");
        assert_eq!(identity.port, 8080);
    }

    #[test]
    fn concrete_address_is_reported_verbatim() {
        let identity = ServerIdentity::for_addr("10.1.2.3:80".parse().unwrap());
        assert_eq!(identity.name, "10.1.2.3");
    }

    #[test]
    fn unspecified_address_resolves_to_a_name() {
        let identity = ServerIdentity::for_addr("0.0.0.0:80".parse().unwrap());
        assert!(!identity.name.is_empty());
    }
}
