use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text the upstream feed uses for a missing value.
pub const NULL_PLACEHOLDER: &str = "null";

/// One decoded state vector, as handed to the hub matcher.
///
/// Coordinates are kept as the feed's text so the matcher can decide how to
/// treat placeholders and malformed numbers. Fields the core does not read
/// travel in `passthrough`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub call_sign: String,
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub passthrough: BTreeMap<String, String>,
}

impl FlightRecord {
    pub fn new(
        call_sign: impl Into<String>,
        longitude: Option<String>,
        latitude: Option<String>,
    ) -> Self {
        Self {
            call_sign: call_sign.into(),
            longitude,
            latitude,
            passthrough: BTreeMap::new(),
        }
    }

    /// Builds a record with numeric coordinates.
    pub fn at_position(call_sign: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::new(
            call_sign,
            Some(longitude.to_string()),
            Some(latitude.to_string()),
        )
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.passthrough.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.passthrough.get(name).map(String::as_str)
    }
}
