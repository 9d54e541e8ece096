//! # Vito Heater - Heating Controller Datapoint Cache
//!
//! Polls a heating controller for a fixed set of datapoints, caches the most
//! recent value of each, and republishes the cache as a JSON document over
//! HTTP.
//!
//! ## Features
//!
//! - **Datapoint registry**: named, typed, addressable datapoints with
//!   fixed-capacity value cells
//! - **Dual-cadence polling**: fast and slow groups on independent intervals,
//!   safe across clock rollover
//! - **JSON snapshot**: populated values only, in table order, with a
//!   `href` trailer
//! - **Pluggable protocol engine**: anything implementing [`ProtocolEngine`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vito_heater::{
//!     datapoints::table, start_web_server, DatapointCollector, PollConfig, Registry,
//!     SimulatedEngine, WebConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::from_descriptors(table::default_datapoints())?;
//!     let collector =
//!         DatapointCollector::new(registry, PollConfig::default(), SimulatedEngine::new())?;
//!
//!     start_web_server(WebConfig::default(), collector.start_stream()?).await?;
//!     Ok(())
//! }
//! ```

pub mod datapoints;
pub mod error;
pub mod protocol;
pub mod web;

// Re-export public API
pub use datapoints::{
    DatapointCollector, DecodedValue, DecodingKind, Descriptor, Group, PollConfig,
    PollScheduler, Registry, Snapshot, ValueCell,
};
pub use error::{HeaterError, Result};
pub use protocol::{ProtocolEngine, SimulatedEngine};
pub use web::{start_web_server, WebConfig};

/// The default main loop tick in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 8080;

/// The default mDNS/host name of the service
pub const DEFAULT_SERVICE_NAME: &str = "vito-heater-esp";
