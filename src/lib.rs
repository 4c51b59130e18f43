//! Core of the RediGo interactive console.
//!
//! Everything here is host-independent: the console state machine writes to a
//! [`surface::Surface`] and hands [`protocol::CommandRequest`]s back to its
//! driver, which owns the network client and the async runtime.

#[path = "core/config.rs"]
pub mod config;

#[path = "core/console.rs"]
pub mod console;

#[path = "core/gateway.rs"]
pub mod gateway;

#[path = "core/health.rs"]
pub mod health;

#[path = "core/protocol.rs"]
pub mod protocol;

#[path = "core/stats.rs"]
pub mod stats;

#[path = "core/surface.rs"]
pub mod surface;

pub use config::{ConsoleConfig, Theme};
pub use console::{Console, Key, Phase};
pub use gateway::{Gateway, GatewayError};
pub use health::{Connectivity, HealthState};
pub use protocol::{CommandRequest, CommandResponse, Output, StatValue, StatsSnapshot};
pub use surface::{Row, Scrollback, Surface, Tone};
