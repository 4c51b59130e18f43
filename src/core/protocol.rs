//! Wire types shared with the command gateway.
//!
//! Responses are decoded exactly once, here, into tagged types. The rendering
//! path never inspects raw JSON again.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Command exchange
// ═══════════════════════════════════════════════════════════════════════════

/// Body of `POST /command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub cmd: String,
}

impl CommandRequest {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    Success(Output),
    /// The gateway answered, but the command failed on the server side.
    Failure(String),
}

/// Payload of a successful command. The gateway does not tag it; the shape of
/// the `output` field decides which variant we get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Scalar(String),
    Lines(Vec<String>),
}

impl CommandResponse {
    /// Decode a gateway reply. Never fails: anything that is not the expected
    /// shape is coerced to text.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return CommandResponse::Success(Output::from_value(value));
        };

        match map.remove("error") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {}
            Some(Value::String(message)) if message.is_empty() => {}
            Some(Value::String(message)) => return CommandResponse::Failure(message),
            Some(other) => return CommandResponse::Failure(coerce_text(&other)),
        }

        match map.remove("output") {
            Some(output) => CommandResponse::Success(Output::from_value(output)),
            None => CommandResponse::Success(Output::Scalar(String::new())),
        }
    }
}

impl Output {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Output::Lines(items.iter().map(coerce_text).collect()),
            other => Output::Scalar(coerce_text(&other)),
        }
    }
}

/// Render a JSON value the way a user expects to read it in a terminal.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(nil)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statistics
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("stats payload must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(serde_json::Number),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => n.as_f64(),
            StatValue::Text(_) => None,
        }
    }
}

impl From<Value> for StatValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => StatValue::Number(n),
            other => StatValue::Text(coerce_text(&other)),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// One successful `GET /stats` reply. The key set is whatever the gateway sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSnapshot {
    entries: BTreeMap<String, StatValue>,
}

impl StatsSnapshot {
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ProtocolError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Into<StatValue>> FromIterator<(String, V)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
