//! Periodic stats polling.

use redigo_console::{Gateway, HealthState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Owns the polling task and its per-tick requests. Dropping it stops both; a
/// stats reply that lands after that is discarded.
pub struct Poller {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn spawn<G: Gateway>(gateway: Arc<G>, health: HealthState, period: Duration) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(gateway, health, period, token.clone()));
        info!("Health poller started ({} ms period)", period.as_millis());
        Self {
            token,
            handle: Some(handle),
        }
    }

    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Health poller ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run<G: Gateway>(
    gateway: Arc<G>,
    health: HealthState,
    period: Duration,
    token: CancellationToken,
) {
    // First tick one period after start, like a browser interval.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // One child task per tick, so a hung request never holds back the next.
    let mut polls = JoinSet::new();
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                polls.spawn(poll_once(Arc::clone(&gateway), health.clone(), token.clone()));
            }
            Some(joined) = polls.join_next(), if !polls.is_empty() => {
                if let Err(e) = joined {
                    warn!("Stats poll task failed: {}", e);
                }
            }
        }
    }

    if !polls.is_empty() {
        debug!("Dropping {} unsettled stats poll(s)", polls.len());
    }
    polls.shutdown().await;
    debug!("Health poller stopped");
}

async fn poll_once<G: Gateway>(gateway: Arc<G>, health: HealthState, token: CancellationToken) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        outcome = gateway.stats() => outcome,
    };
    health.record_poll(outcome);
}
