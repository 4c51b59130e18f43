//! One console, its health poller and its in-flight command.

use redigo_console::protocol::CommandResponse;
use redigo_console::{Console, ConsoleConfig, Gateway, GatewayError, HealthState, Key, Scrollback};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::poller::Poller;

type Pending = Pin<Box<dyn Future<Output = Result<CommandResponse, GatewayError>> + Send>>;

/// The in-flight request lives here, not in a detached task, so tearing the
/// session down abandons it and its reply can never reach a console.
pub struct Session<G: Gateway> {
    gateway: Arc<G>,
    console: Console<Scrollback>,
    health: HealthState,
    poller: Poller,
    in_flight: Option<Pending>,
}

impl<G: Gateway> Session<G> {
    pub fn start(gateway: Arc<G>, config: ConsoleConfig, poll_interval: Duration) -> Self {
        let health = HealthState::default();
        let poller = Poller::spawn(Arc::clone(&gateway), health.clone(), poll_interval);

        let scrollback = Scrollback::new(config.scrollback);
        let mut console = Console::new(config, scrollback, health.connectivity());
        console.start();

        Self {
            gateway,
            console,
            health,
            poller,
            in_flight: None,
        }
    }

    pub fn on_key(&mut self, key: Key) {
        if let Some(request) = self.console.handle_key(key) {
            let gateway = Arc::clone(&self.gateway);
            self.in_flight = Some(Box::pin(async move { gateway.execute(&request).await }));
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Wait for the in-flight command and render it. Cancel-safe: if this
    /// future is dropped the request stays in flight. Never resolves when
    /// nothing is in flight.
    pub async fn settled(&mut self) {
        let Some(pending) = self.in_flight.as_mut() else {
            return std::future::pending().await;
        };
        let outcome = pending.await;
        self.in_flight = None;
        self.console.settle(outcome);
    }

    pub fn console(&self) -> &Console<Scrollback> {
        &self.console
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub async fn shutdown(self) {
        let Session {
            poller, in_flight, ..
        } = self;
        if in_flight.is_some() {
            info!("Abandoning in-flight command on shutdown");
        }
        drop(in_flight);
        poller.shutdown().await;
    }
}
