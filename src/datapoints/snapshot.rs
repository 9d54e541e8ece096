//! JSON rendering of the cache's current contents.

use crate::datapoints::cell::VALUE_CAPACITY;
use crate::datapoints::registry::Registry;
use crate::error::Result;
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

/// Link to the firmware-update endpoint, always present in the trailer.
pub const UPDATE_HREF: &str = "/update";

/// Key of the trailer object.
pub const TRAILER_KEY: &str = "href";

#[derive(Debug, Serialize)]
struct Links {
    update: &'static str,
}

const LINKS: Links = Links {
    update: UPDATE_HREF,
};

/// Borrowed view of a registry that serializes as the snapshot document.
///
/// Populated datapoints appear in registration order, keyed by name, with
/// their rendered value emitted verbatim as a JSON number. Unpopulated
/// datapoints are omitted. The `href` trailer is always appended.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    registry: &'a Registry,
}

impl<'a> Snapshot<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Upper bound on the compact document size, used to pre-size buffers.
    pub fn capacity_hint(&self) -> usize {
        let trailer = TRAILER_KEY.len() + UPDATE_HREF.len() + 20;
        let entries: usize = self
            .registry
            .iter()
            .map(|(descriptor, _)| descriptor.name().len() + VALUE_CAPACITY + 4)
            .sum();
        entries + trailer + 2
    }

    /// Render the compact document.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(self.capacity_hint());
        serde_json::to_writer(&mut buf, self)?;
        Ok(into_string(buf))
    }

    /// Render an indented document for humans.
    pub fn render_pretty(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(self.capacity_hint() * 2);
        serde_json::to_writer_pretty(&mut buf, self)?;
        Ok(into_string(buf))
    }
}

impl Serialize for Snapshot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (descriptor, cell) in self.registry.iter() {
            let Some(value) = cell.value() else {
                continue;
            };
            let raw: &RawValue = serde_json::from_str(value).map_err(S::Error::custom)?;
            map.serialize_entry(descriptor.name(), raw)?;
        }
        map.serialize_entry(TRAILER_KEY, &LINKS)?;
        map.end()
    }
}

fn into_string(buf: Vec<u8>) -> String {
    // serde_json only ever writes UTF-8
    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// The document served before any datapoint has been decoded.
pub fn empty_document() -> String {
    format!("{{\"{}\":{{\"update\":\"{}\"}}}}", TRAILER_KEY, UPDATE_HREF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoints::data::{DecodedValue, DecodingKind, Descriptor, Group};

    fn registry() -> Registry {
        Registry::from_descriptors([
            Descriptor::new("Temp", Group::Fast, 0x0810, DecodingKind::Temperature),
            Descriptor::new("Count", Group::Slow, 0x088A, DecodingKind::Counter),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_registry_renders_trailer_only() {
        let registry = registry();
        let json = Snapshot::new(&registry).render().unwrap();
        assert_eq!(json, r#"{"href":{"update":"/update"}}"#);
        assert_eq!(json, empty_document());
    }

    #[test]
    fn test_values_are_bare_numbers_in_registration_order() {
        let mut registry = registry();
        // decoded out of registration order
        registry.deliver(0x088A, DecodedValue(17));
        registry.deliver(0x0810, DecodedValue(2543));

        let json = Snapshot::new(&registry).render().unwrap();
        assert_eq!(
            json,
            r#"{"Temp":254.3,"Count":17,"href":{"update":"/update"}}"#
        );
    }

    #[test]
    fn test_partial_population_omits_missing_keys() {
        let mut registry = registry();
        registry.deliver(0x0810, DecodedValue(2543));

        let json = Snapshot::new(&registry).render().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Temp"], serde_json::json!(254.3));
        assert!(value.get("Count").is_none());
        assert_eq!(json.matches("\"Temp\"").count(), 1);
    }

    #[test]
    fn test_pretty_render_is_valid_json() {
        let mut registry = registry();
        registry.deliver(0x088A, DecodedValue(17));
        let json = Snapshot::new(&registry).render_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Count"], 17);
        assert_eq!(value["href"]["update"], "/update");
    }

    #[test]
    fn test_capacity_hint_covers_full_document() {
        let mut registry = registry();
        registry.deliver(0x088A, DecodedValue(4_294_967_295));
        registry.deliver(0x0810, DecodedValue(-32768));
        let snapshot = Snapshot::new(&registry);
        assert!(snapshot.render().unwrap().len() <= snapshot.capacity_hint());
    }
}
