use serde::{Deserialize, Serialize};

/// Static reference point for one airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub city: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportRecord {
    pub fn new(city: impl Into<String>, code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            city: city.into(),
            code: code.into(),
            latitude,
            longitude,
        }
    }

    /// Parses a `city,code,latitude,longitude` line.
    ///
    /// Returns `None` when the field count is not exactly four or either
    /// coordinate is not a finite number.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return None;
        }
        let latitude = fields[2].parse::<f64>().ok().filter(|v| v.is_finite())?;
        let longitude = fields[3].parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self::new(fields[0], fields[1], latitude, longitude))
    }
}
