//! Datapoint tables: the built-in Vitodens set and JSON-file loading.

use crate::datapoints::data::{DecodingKind, Descriptor, Group};
use crate::error::{HeaterError, Result};
use std::path::Path;

use crate::datapoints::data::DecodingKind::{Counter, CounterShort, Status, Temperature};
use crate::datapoints::data::Group::{Fast, Slow};

/// Built-in table, in the order the datapoints appear in the JSON document.
const DEFAULT_TABLE: &[(&str, Group, u16, DecodingKind)] = &[
    // Solar
    ("Solarkollektortemperatur", Fast, 0x6564, Temperature),
    ("SolarSpeichertemperatur", Fast, 0x6566, Temperature),
    ("SolarStunden", Slow, 0x6568, CounterShort),
    ("SolarWaerme", Slow, 0x6560, Counter),
    ("SolarPumpe", Fast, 0x6552, Status),
    ("SolarNachlade", Fast, 0x6551, Status),
    // Boiler
    ("BetriebsstundenBrennerBedienungGWG", Slow, 0x08A7, Counter), // seconds
    ("GWG_Flamme", Fast, 0x55D3, Status),
    ("BrennerstartsGWG", Fast, 0x088A, Counter),
    ("nvoBoilerState_BLR_value", Fast, 0xA305, CounterShort),
    ("TiefpassTemperaturwert_AGTS", Fast, 0x0816, Temperature),
    ("TiefpassTemperaturwert_ATS", Fast, 0x5525, Temperature),
    ("Gemischte_AT", Fast, 0x5527, Temperature),
    ("TiefpassTemperaturwert_KTS", Fast, 0x0810, Temperature),
    ("Kesselsoll_eff", Fast, 0x555A, Temperature),
    // Pump speed and pump output share one register
    ("InternePumpeDrehzahl", Fast, 0x7660, CounterShort),
    ("DigitalAusgang_InternePumpe", Fast, 0x7660, Status),
    ("Zirkulationspumpe", Fast, 0x6515, Status),
    // Heating circuit A1M1
    ("TiefpassTemperaturwert_KTS_A1", Fast, 0x0810, Temperature),
    ("VT_SolltemperaturA1M1", Fast, 0x2544, Temperature),
    ("HK_PumpenzustandA1M1", Fast, 0x2906, Status),
    ("HKP_A1Drehzahl", Fast, 0x7663, Counter),
    // Hot water
    ("WW_Status_NR1", Fast, 0x650A, Status),
    ("TiefpassTemperaturwertWW1", Fast, 0x0812, Temperature),
    ("TiefpassTemperaturwerWW2", Fast, 0x0814, Temperature),
    ("WW_SolltemperaturAktuell", Fast, 0x6500, Temperature),
    ("TiefpassTemperaturwert_VTS", Fast, 0x081A, Temperature),
    ("Speicherladepumpe", Fast, 0x6513, Status),
];

/// The datapoints monitored when no table file is given.
pub fn default_datapoints() -> Vec<Descriptor> {
    DEFAULT_TABLE
        .iter()
        .map(|&(name, group, address, kind)| Descriptor::new(name, group, address, kind))
        .collect()
}

/// Parse a JSON array of `{name, group, address, kind}` objects.
pub fn parse_datapoints(json: &str) -> Result<Vec<Descriptor>> {
    let descriptors: Vec<Descriptor> = serde_json::from_str(json)
        .map_err(|e| HeaterError::parse_error(format!("Invalid datapoint table: {}", e)))?;
    if descriptors.is_empty() {
        return Err(HeaterError::config_error("Datapoint table is empty"));
    }
    Ok(descriptors)
}

/// Load a datapoint table from a JSON file.
pub fn load_datapoints(path: impl AsRef<Path>) -> Result<Vec<Descriptor>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    parse_datapoints(&json)
}
