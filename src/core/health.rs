//! State shared between the console and the health poller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::gateway::GatewayError;
use crate::protocol::StatsSnapshot;

/// The coarse "can we reach the gateway" flag. Each exchange overwrites it;
/// there is no hysteresis.
#[derive(Debug, Clone)]
pub struct Connectivity(Arc<AtomicBool>);

impl Default for Connectivity {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Connectivity {
    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn mark(&self, connected: bool) {
        self.0.store(connected, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
struct Board {
    stats: Option<StatsSnapshot>,
    last_failure: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HealthState {
    connectivity: Connectivity,
    board: Arc<Mutex<Board>>,
}

impl HealthState {
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connectivity.is_connected()
    }

    /// Apply the outcome of one tick. A failure keeps the previous snapshot.
    pub fn record_poll(&self, outcome: Result<StatsSnapshot, GatewayError>) {
        match outcome {
            Ok(snapshot) => {
                debug!("Stats poll ok ({} entries)", snapshot.len());
                let mut b = self.board();
                b.stats = Some(snapshot);
                b.last_failure = None;
                self.connectivity.mark(true);
            }
            Err(e) => {
                warn!("Stats poll failed: {}", e);
                self.board().last_failure = Some(e.to_string());
                self.connectivity.mark(false);
            }
        }
    }

    pub fn stats(&self) -> Option<StatsSnapshot> {
        self.board().stats.clone()
    }

    /// Reason of the most recent failed tick, cleared by the next success.
    pub fn last_failure(&self) -> Option<String> {
        self.board().last_failure.clone()
    }

    // Fields are only ever replaced whole, so a poisoned board is consistent.
    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
