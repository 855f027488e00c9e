use serde::{Deserialize, Serialize};

use crate::records::AirportRecord;

/// Association of one flight with one airport hub.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub airport_city: String,
    pub airport_code: String,
    pub carrier_code: String,
}

impl Match {
    pub fn new(
        airport_city: impl Into<String>,
        airport_code: impl Into<String>,
        carrier_code: impl Into<String>,
    ) -> Self {
        Self {
            airport_city: airport_city.into(),
            airport_code: airport_code.into(),
            carrier_code: carrier_code.into(),
        }
    }

    pub fn for_airport(airport: &AirportRecord, carrier_code: &str) -> Self {
        Self::new(airport.city.clone(), airport.code.clone(), carrier_code)
    }
}
