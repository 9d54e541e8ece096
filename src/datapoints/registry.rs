//! The fixed table of datapoints and their value cells.

use crate::datapoints::cell::ValueCell;
use crate::datapoints::data::{DecodedValue, Descriptor, Group};
use crate::datapoints::snapshot::TRAILER_KEY;
use crate::error::{HeaterError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A registered datapoint: its descriptor and the cell it owns.
#[derive(Debug, Clone)]
struct Entry {
    descriptor: Descriptor,
    cell: ValueCell,
}

/// Every known datapoint, in registration order, indexed by address.
///
/// Populated once at startup. Several descriptors may share one address;
/// all of them receive a telegram for that address.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    by_address: HashMap<u16, Vec<usize>>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a datapoint table, preserving its order.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = Descriptor>) -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add a datapoint and return its fresh, unpopulated cell.
    ///
    /// The snapshot trailer's key is reserved and cannot name a datapoint.
    pub fn register(&mut self, descriptor: Descriptor) -> Result<&ValueCell> {
        if descriptor.name() == TRAILER_KEY {
            return Err(HeaterError::config_error(format!(
                "Datapoint name '{}' is reserved",
                TRAILER_KEY
            )));
        }
        if self.by_name.contains_key(descriptor.name()) {
            return Err(HeaterError::DuplicateDatapoint(descriptor.name));
        }

        let index = self.entries.len();
        let slots = self.by_address.entry(descriptor.address).or_default();
        if let Some(&other) = slots.first() {
            debug!(
                "Datapoint {} shares address {:#06x} with {}",
                descriptor.name,
                descriptor.address,
                self.entries[other].descriptor.name
            );
        }
        slots.push(index);
        self.by_name.insert(descriptor.name.clone(), index);
        self.entries.push(Entry {
            descriptor,
            cell: ValueCell::new(),
        });

        Ok(&self.entries[index].cell)
    }

    /// All datapoints registered at `address`; empty for unknown addresses.
    pub fn resolve(&self, address: u16) -> impl Iterator<Item = (&Descriptor, &ValueCell)> + '_ {
        self.by_address
            .get(&address)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&index| {
                let entry = &self.entries[index];
                (&entry.descriptor, &entry.cell)
            })
    }

    /// Write a decoded value into every cell registered at `address`.
    ///
    /// Returns the number of cells updated. Telegrams for unknown addresses
    /// are expected on a shared bus and only logged.
    pub fn deliver(&mut self, address: u16, value: DecodedValue) -> usize {
        let Some(slots) = self.by_address.get(&address) else {
            debug!("Unregistered address {:#06x}: {}", address, value.0);
            return 0;
        };

        for &index in slots {
            let entry = &mut self.entries[index];
            if entry.cell.store(entry.descriptor.kind, value) {
                warn!(
                    "Value {} for {} truncated to fit",
                    value.0, entry.descriptor.name
                );
            }
            debug!(
                "Datapoint {}: {}",
                entry.descriptor.name,
                entry.cell.value().unwrap_or_default()
            );
        }
        slots.len()
    }

    /// Descriptors belonging to `group`, in registration order.
    pub fn group(&self, group: Group) -> impl Iterator<Item = &Descriptor> + '_ {
        self.entries
            .iter()
            .map(|entry| &entry.descriptor)
            .filter(move |descriptor| descriptor.group == group)
    }

    /// Look up a datapoint by name.
    pub fn get(&self, name: &str) -> Option<(&Descriptor, &ValueCell)> {
        self.by_name.get(name).map(|&index| {
            let entry = &self.entries[index];
            (&entry.descriptor, &entry.cell)
        })
    }

    /// Every datapoint in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Descriptor, &ValueCell)> + '_ {
        self.entries
            .iter()
            .map(|entry| (&entry.descriptor, &entry.cell))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of datapoints that have received at least one value.
    pub fn populated(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.cell.is_populated())
            .count()
    }
}
