//! HTTP client for the command gateway.

use redigo_console::protocol::{CommandRequest, CommandResponse, StatsSnapshot};
use redigo_console::{Gateway, GatewayError};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::error::Error as _;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    command_url: Url,
    stats_url: Url,
}

impl HttpGateway {
    pub fn new(base: &Url) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().build().map_err(transport)?;

        // `join` replaces the last path segment unless the base ends in '/'.
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |endpoint: &str| {
            base.join(endpoint)
                .map_err(|e| GatewayError::Transport(format!("bad endpoint {endpoint}: {e}")))
        };

        Ok(Self {
            command_url: join("command")?,
            stats_url: join("stats")?,
            client,
        })
    }
}

impl Gateway for HttpGateway {
    async fn execute(&self, request: &CommandRequest) -> Result<CommandResponse, GatewayError> {
        debug!("POST {} {:?}", self.command_url, request.cmd);
        let resp = self
            .client
            .post(self.command_url.clone())
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        decode_command(status, &body)
    }

    async fn stats(&self) -> Result<StatsSnapshot, GatewayError> {
        let resp = self
            .client
            .get(self.stats_url.clone())
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        Ok(StatsSnapshot::from_value(decode_json(status, &body)?)?)
    }
}

fn decode_command(status: StatusCode, body: &str) -> Result<CommandResponse, GatewayError> {
    Ok(CommandResponse::from_value(decode_json(status, body)?))
}

/// Any JSON body is a gateway answer, whatever the status. A non-JSON body is
/// a failed exchange.
fn decode_json(status: StatusCode, body: &str) -> Result<Value, GatewayError> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(GatewayError::Status {
            status: status.as_u16(),
        }),
        Err(e) => Err(GatewayError::Decode(e)),
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GatewayError::Transport(message)
}
