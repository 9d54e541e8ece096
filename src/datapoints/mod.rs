//! Datapoint cache and polling.
//!
//! This module defines the monitored datapoints, the fixed-capacity cells
//! holding their latest rendered values, the registry that routes decoded
//! telegrams to those cells, the dual-cadence poll scheduler, and the JSON
//! snapshot served over HTTP.

pub mod cell;
pub mod collector;
pub mod config;
pub mod data;
pub mod registry;
pub mod scheduler;
pub mod snapshot;
pub mod table;

// Re-export commonly used items
pub use cell::ValueCell;
pub use collector::DatapointCollector;
pub use config::PollConfig;
pub use data::{DecodedValue, DecodingKind, Descriptor, Group, Telegram};
pub use registry::Registry;
pub use scheduler::PollScheduler;
pub use snapshot::Snapshot;
