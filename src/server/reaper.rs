use std::future::Future;
use std::net::SocketAddr;

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

use crate::error::WorkerError;

/// What a worker unit reports when it ends.
#[derive(Debug)]
pub struct UnitExit {
    pub id: u64,
    pub peer: SocketAddr,
    pub result: Result<(), WorkerError>,
}

/// Collects terminated worker units.
///
/// A single exit notification may stand for several exits, so every
/// collection drains all finished units without blocking.
#[derive(Default)]
pub struct Reaper {
    units: JoinSet<UnitExit>,
    reaped: u64,
}

impl Reaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a unit. The unit begins running immediately.
    pub fn adopt<F>(&mut self, unit: F)
    where
        F: Future<Output = UnitExit> + Send + 'static,
    {
        self.units.spawn(unit);
    }

    /// Units spawned and not yet collected.
    pub fn live(&self) -> usize {
        self.units.len()
    }

    /// Total units collected so far.
    pub fn reaped(&self) -> u64 {
        self.reaped
    }

    /// Waits for the next exit notification, then drains every finished
    /// unit. Returns immediately with 0 when nothing is live.
    ///
    /// Cancel safe: the only await point is the notification itself.
    pub async fn collect(&mut self) -> usize {
        match self.units.join_next().await {
            Some(joined) => {
                self.record(joined);
                1 + self.reap()
            }
            None => 0,
        }
    }

    /// Collects finished units until none remain collectible. Never blocks.
    pub fn reap(&mut self) -> usize {
        let mut count = 0;
        while let Some(joined) = self.units.try_join_next() {
            self.record(joined);
            count += 1;
        }
        count
    }

    fn record(&mut self, joined: Result<UnitExit, JoinError>) {
        self.reaped += 1;

        match joined {
            Ok(UnitExit { id, peer, result: Ok(()) }) => {
                debug!(unit = id, %peer, "Worker unit finished");
            }
            Ok(UnitExit { id, peer, result: Err(e) }) => {
                warn!(unit = id, %peer, error = %e, "Worker unit failed");
            }
            Err(e) if e.is_panic() => {
                error!(error = %e, "Worker unit panicked");
            }
            Err(e) => {
                debug!(error = %e, "Worker unit cancelled");
            }
        }
    }
}

impl Drop for Reaper {
    // In-flight units outlive the listener.
    fn drop(&mut self) {
        self.units.detach_all();
    }
}
