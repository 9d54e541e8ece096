//! Seam to the engine that talks to the heating controller.
//!
//! Framing and decoding of the controller's serial protocol live behind
//! [`ProtocolEngine`]. The cache only issues group reads and consumes the
//! decoded telegrams the engine hands back.

pub mod simulated;

pub use simulated::SimulatedEngine;

use crate::datapoints::data::{Descriptor, Group, Telegram};
use crate::error::Result;

/// A protocol engine driven cooperatively from the main loop.
pub trait ProtocolEngine: Send {
    /// Queue a read of every datapoint in `group`.
    fn read_group(&mut self, group: Group, datapoints: &[&Descriptor]) -> Result<()>;

    /// Advance the engine and return the next decoded telegram, if one is ready.
    ///
    /// Must not block. Bus timeouts and malformed frames never surface here;
    /// the affected datapoints simply receive no telegram.
    fn poll_decoded(&mut self) -> Option<Telegram>;
}

impl<E: ProtocolEngine + ?Sized> ProtocolEngine for Box<E> {
    fn read_group(&mut self, group: Group, datapoints: &[&Descriptor]) -> Result<()> {
        (**self).read_group(group, datapoints)
    }

    fn poll_decoded(&mut self) -> Option<Telegram> {
        (**self).poll_decoded()
    }
}
