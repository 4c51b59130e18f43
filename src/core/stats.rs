//! Label/value formatting for the stats panel.

use crate::protocol::{StatValue, StatsSnapshot};

/// Known gateway keys and their labels, in panel order.
const ALIASES: &[(&str, &str)] = &[
    ("keys", "Keys"),
    ("key_count", "Keys"),
    ("memory", "Memory"),
    ("memory_used", "Memory"),
    ("used_memory", "Memory"),
    ("uptime", "Uptime"),
    ("uptime_seconds", "Uptime"),
    ("uptime_in_seconds", "Uptime"),
    ("clients", "Clients"),
    ("connected_clients", "Clients"),
];

const ELAPSED_HINTS: &[&str] = &["uptime", "elapsed", "duration", "seconds", "secs"];
const MEMORY_HINTS: &[&str] = &["memory", "mem_", "bytes"];
const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Elapsed,
    Memory,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
}

pub fn label(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    match ALIASES.iter().find(|(k, _)| *k == lower) {
        Some((_, label)) => (*label).to_string(),
        None => humanize(key),
    }
}

pub fn value(key: &str, v: &StatValue) -> String {
    let Some(n) = v.as_f64() else {
        return v.to_string();
    };
    match classify(key) {
        Quantity::Elapsed => format!("{v}s"),
        Quantity::Memory => format_bytes(n),
        Quantity::Plain => v.to_string(),
    }
}

/// Rows for the whole snapshot: aliased keys first in alias order, then the
/// rest alphabetically.
pub fn panel(snapshot: &StatsSnapshot) -> Vec<StatRow> {
    let mut keyed: Vec<(usize, &str, &StatValue)> = snapshot
        .iter()
        .map(|(k, v)| {
            let lower = k.to_ascii_lowercase();
            let rank = ALIASES
                .iter()
                .position(|(alias, _)| *alias == lower)
                .unwrap_or(ALIASES.len());
            (rank, k, v)
        })
        .collect();
    // Snapshot iteration is already alphabetical; a stable sort keeps it.
    keyed.sort_by_key(|(rank, _, _)| *rank);

    keyed
        .into_iter()
        .map(|(_, k, v)| StatRow {
            label: label(k),
            value: value(k, v),
        })
        .collect()
}

fn classify(key: &str) -> Quantity {
    let lower = key.to_ascii_lowercase();
    if ELAPSED_HINTS.iter().any(|h| lower.contains(h)) {
        Quantity::Elapsed
    } else if lower == "mem" || MEMORY_HINTS.iter().any(|h| lower.contains(h)) {
        Quantity::Memory
    } else {
        Quantity::Plain
    }
}

fn humanize(key: &str) -> String {
    key.split(['_', '-', '.', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_bytes(n: f64) -> String {
    if n.abs() < 1024.0 {
        return format!("{} B", n.round() as i64);
    }
    let mut scaled = n;
    let mut unit = 0;
    while scaled.abs() >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", scaled, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_share_labels() {
        assert_eq!(label("memory"), "Memory");
        assert_eq!(label("memory_used"), "Memory");
        assert_eq!(label("Uptime"), "Uptime");
        assert_eq!(label("connected_clients"), "Clients");
    }

    #[test]
    fn unknown_keys_are_humanized() {
        assert_eq!(label("evicted_keys"), "Evicted Keys");
        assert_eq!(label("ops-per-sec"), "Ops Per Sec");
        assert_eq!(label("repl.role"), "Repl Role");
        assert_eq!(label("__x__"), "X");
    }

    #[test]
    fn elapsed_numbers_get_seconds() {
        assert_eq!(value("uptime", &StatValue::from(json!(17))), "17s");
        assert_eq!(value("uptime_in_seconds", &StatValue::from(json!(1.5))), "1.5s");
    }

    #[test]
    fn memory_numbers_get_size_units() {
        assert_eq!(value("memory_used", &StatValue::from(json!(512))), "512 B");
        assert_eq!(value("memory", &StatValue::from(json!(1536))), "1.5 KB");
        assert_eq!(value("used_memory", &StatValue::from(json!(3_221_225_472u64))), "3.0 GB");
    }

    #[test]
    fn text_values_pass_through() {
        assert_eq!(value("memory", &StatValue::from(json!("1.2MB"))), "1.2MB");
        assert_eq!(value("role", &StatValue::from(json!("master"))), "master");
        assert_eq!(value("keys", &StatValue::from(json!(42))), "42");
    }

    #[test]
    fn panel_orders_known_keys_first() {
        let snap = StatsSnapshot::from_value(json!({
            "zeta": 1,
            "clients": 2,
            "alpha": "x",
            "keys": 3,
            "uptime": 4,
            "memory": "1MB",
        }))
        .unwrap();

        let labels: Vec<String> = panel(&snap).into_iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec!["Keys", "Memory", "Uptime", "Clients", "Alpha", "Zeta"]
        );
    }
}
