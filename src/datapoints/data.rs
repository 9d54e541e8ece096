//! Data structures describing monitored datapoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Polling-cadence bucket a datapoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Re-read on the short interval (5 minutes by default)
    #[serde(alias = "5m")]
    Fast,
    /// Re-read on the long interval (1 hour by default)
    #[serde(alias = "1h")]
    Slow,
}

impl Group {
    /// Every group, in the order the scheduler checks them.
    pub const ALL: [Group; 2] = [Group::Slow, Group::Fast];

    /// Tag used in logs and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Fast => "fast",
            Group::Slow => "slow",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How a raw protocol value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodingKind {
    /// Fixed-point temperature in 0.1 degree steps, signed
    #[serde(alias = "DPTemp")]
    Temperature,
    /// Small enumerated state byte
    #[serde(alias = "DPStat")]
    Status,
    /// Counter with a 16-bit range
    #[serde(alias = "DPCountS")]
    CounterShort,
    /// Counter with a 32-bit range
    #[serde(alias = "DPCount")]
    Counter,
}

impl DecodingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodingKind::Temperature => "temperature",
            DecodingKind::Status => "status",
            DecodingKind::CounterShort => "counter_short",
            DecodingKind::Counter => "counter",
        }
    }
}

impl fmt::Display for DecodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Immutable identity of a monitored quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Unique name, used as the JSON key
    pub name: String,
    /// Polling group governing refresh cadence
    pub group: Group,
    /// 16-bit protocol address; not necessarily unique
    pub address: u16,
    /// Rendering rule for decoded values
    pub kind: DecodingKind,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, group: Group, address: u16, kind: DecodingKind) -> Self {
        Self {
            name: name.into(),
            group,
            address,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A value delivered by the protocol engine, before rendering.
///
/// Temperatures arrive in tenths of a degree; counters and status bytes as
/// plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedValue(pub i64);

impl From<i64> for DecodedValue {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A decoded value together with the address it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telegram {
    pub address: u16,
    pub value: DecodedValue,
}

impl Telegram {
    pub fn new(address: u16, raw: i64) -> Self {
        Self {
            address,
            value: DecodedValue(raw),
        }
    }
}
