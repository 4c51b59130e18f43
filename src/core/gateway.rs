//! The gateway seam: the two endpoints the console consumes and how an
//! exchange with them can fail.

use std::future::Future;
use thiserror::Error;

use crate::protocol::{CommandRequest, CommandResponse, ProtocolError, StatsSnapshot};

/// Failure of an exchange with the gateway itself, as opposed to a command the
/// gateway rejected (that is [`CommandResponse::Failure`]).
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),
    #[error("gateway answered HTTP {status}")]
    Status { status: u16 },
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// The two endpoints the console consumes.
pub trait Gateway: Send + Sync + 'static {
    fn execute(
        &self,
        request: &CommandRequest,
    ) -> impl Future<Output = Result<CommandResponse, GatewayError>> + Send;

    fn stats(&self) -> impl Future<Output = Result<StatsSnapshot, GatewayError>> + Send;
}
