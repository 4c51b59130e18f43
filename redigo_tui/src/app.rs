//! Event loop: terminal input, command replies and redraws.

use redigo_console::GatewayError;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::http::HttpGateway;
use crate::input::{self, Input};
use crate::session::Session;
use crate::settings::Settings;
use crate::ui::{self, Tui};

const FRAME_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] GatewayError),
}

pub async fn run(settings: Settings) -> Result<(), AppError> {
    let gateway = Arc::new(HttpGateway::new(&settings.gateway_url)?);
    info!("Gateway at {}", settings.gateway_url);

    let mut tui = Tui::enter()?;
    let mut session = Session::start(gateway, settings.console, settings.poll_interval);
    let mut inputs = input::spawn_reader();
    let theme = settings.theme;

    let mut frames = time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            input = inputs.recv() => match input {
                Some(Input::Key(key)) => session.on_key(key),
                Some(Input::Resize) => {}
                Some(Input::Quit) => break Ok(()),
                None => {
                    warn!("Input reader closed");
                    break Ok(());
                }
            },
            _ = session.settled(), if session.is_busy() => {}
            _ = frames.tick() => {}
        }

        if let Err(e) = tui.draw(|f| ui::render(f, session.console(), session.health(), theme)) {
            break Err(AppError::Io(e));
        }
    };

    drop(inputs);
    session.shutdown().await;
    drop(tui);
    info!("Console closed");
    result
}
