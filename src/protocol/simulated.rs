//! Deterministic stand-in for the serial protocol engine.

use crate::datapoints::data::{DecodingKind, Descriptor, Group, Telegram};
use crate::error::{HeaterError, Result};
use crate::protocol::ProtocolEngine;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Engine that answers group reads with plausible, slowly drifting values.
///
/// Useful for running the service without a controller attached and for
/// exercising the cache end to end.
#[derive(Debug, Default)]
pub struct SimulatedEngine {
    pending: VecDeque<Telegram>,
    rounds: u64,
    unsolicited: Option<u16>,
    offline: bool,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit a telegram for `address` after every read, as a foreign
    /// device on the bus would.
    pub fn with_unsolicited(mut self, address: u16) -> Self {
        self.unsolicited = Some(address);
        self
    }

    /// Reject reads, as if the optical link were disconnected.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Number of group reads answered so far.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    fn simulate(&self, descriptor: &Descriptor) -> i64 {
        let seed = i64::from(descriptor.address);
        let round = self.rounds as i64;
        match descriptor.kind {
            // 15.0 .. 74.9 degrees, drifting by 0.1 per round
            DecodingKind::Temperature => 150 + (seed * 7 + round) % 600,
            DecodingKind::Status => (seed + round) % 2,
            DecodingKind::CounterShort => (seed * 3 + round) % 65_536,
            DecodingKind::Counter => seed * 1_000 + round,
        }
    }
}

impl ProtocolEngine for SimulatedEngine {
    fn read_group(&mut self, group: Group, datapoints: &[&Descriptor]) -> Result<()> {
        if self.offline {
            return Err(HeaterError::protocol_error(format!(
                "link down, cannot read group {}",
                group
            )));
        }

        info!("Reading {} group ({} datapoints)", group, datapoints.len());
        let mut seen = Vec::with_capacity(datapoints.len());
        for descriptor in datapoints {
            // one telegram per physical register
            if seen.contains(&descriptor.address) {
                continue;
            }
            seen.push(descriptor.address);
            let telegram = Telegram::new(descriptor.address, self.simulate(descriptor));
            debug!("Queued {:#06x} = {}", telegram.address, telegram.value.0);
            self.pending.push_back(telegram);
        }
        if let Some(address) = self.unsolicited {
            self.pending.push_back(Telegram::new(address, self.rounds as i64));
        }
        self.rounds += 1;
        Ok(())
    }

    fn poll_decoded(&mut self) -> Option<Telegram> {
        self.pending.pop_front()
    }
}
