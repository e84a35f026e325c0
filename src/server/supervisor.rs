use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;

use crate::error::SpawnError;
use crate::http::connection::Connection;
use crate::server::reaper::{Reaper, UnitExit};
use crate::server::Server;

/// Creates one isolated worker unit per accepted connection.
pub struct Supervisor {
    server: Arc<Server>,
    reaper: Reaper,
    max_units: usize,
    next_id: u64,
}

impl Supervisor {
    pub fn new(server: Arc<Server>, max_units: usize) -> Self {
        Self {
            server,
            reaper: Reaper::new(),
            max_units,
            next_id: 0,
        }
    }

    /// Hands `stream` to a new unit and returns the unit id.
    ///
    /// The stream moves into the unit, so the supervisor keeps no handle to
    /// it. When the unit limit is reached the stream is closed with no
    /// response and the listener carries on.
    pub fn spawn(&mut self, stream: TcpStream, peer: SocketAddr) -> Result<u64, SpawnError> {
        if self.reaper.live() >= self.max_units {
            self.reaper.reap();
        }

        if self.reaper.live() >= self.max_units {
            drop(stream);
            return Err(SpawnError::Exhausted {
                limit: self.max_units,
            });
        }

        let id = self.next_id;
        self.next_id += 1;

        let conn = Connection::new(stream, peer, Arc::clone(&self.server));
        self.reaper.adopt(async move {
            UnitExit {
                id,
                peer,
                result: conn.run().await,
            }
        });

        Ok(id)
    }

    pub fn live(&self) -> usize {
        self.reaper.live()
    }

    pub fn server(&self) -> &Arc<Server> {
        &self.server
    }

    pub fn reaper(&self) -> &Reaper {
        &self.reaper
    }

    pub fn reaper_mut(&mut self) -> &mut Reaper {
        &mut self.reaper
    }
}
