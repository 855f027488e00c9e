use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::StageError;

/// Half-width of the fixed window, in degrees of latitude.
pub const FIXED_LATITUDE_DEGREES: f64 = 0.286;
/// Half-width of the fixed window, in degrees of longitude.
pub const FIXED_LONGITUDE_DEGREES: f64 = 0.444;

/// Rough linear units per degree of longitude.
pub const UNITS_PER_LONGITUDE_DEGREE: f64 = 45.0;
/// Rough linear units per degree of latitude.
pub const UNITS_PER_LATITUDE_DEGREE: f64 = 70.0;
/// Per-axis radius of the distance-normalized window, in linear units.
pub const NORMALIZED_RADIUS_UNITS: f64 = 20.0;

/// Test deciding whether a position lies inside an airport's hub window.
///
/// Both variants are axis-aligned boxes centred on the airport; they differ
/// only in how the box half-widths are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowPolicy {
    /// `|dlat| <= 0.286` and `|dlon| <= 0.444`, in degrees.
    #[default]
    FixedDegrees,
    /// `|dlon * 45| <= 20` and `|dlat * 70| <= 20`.
    DistanceNormalized,
}

impl WindowPolicy {
    /// Returns true when `(lat, lon)` falls inside the window centred on
    /// `(center_lat, center_lon)`. Boundaries are inclusive.
    pub fn contains(self, center_lat: f64, center_lon: f64, lat: f64, lon: f64) -> bool {
        let d_lat = (center_lat - lat).abs();
        let d_lon = (center_lon - lon).abs();
        match self {
            Self::FixedDegrees => d_lat <= FIXED_LATITUDE_DEGREES && d_lon <= FIXED_LONGITUDE_DEGREES,
            Self::DistanceNormalized => {
                d_lon * UNITS_PER_LONGITUDE_DEGREE <= NORMALIZED_RADIUS_UNITS
                    && d_lat * UNITS_PER_LATITUDE_DEGREE <= NORMALIZED_RADIUS_UNITS
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedDegrees => "fixed-degrees",
            Self::DistanceNormalized => "distance-normalized",
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowPolicy {
    type Err = StageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed-degrees" | "fixed" => Ok(Self::FixedDegrees),
            "distance-normalized" | "normalized" => Ok(Self::DistanceNormalized),
            other => Err(StageError::UnknownOption(format!("window policy '{}'", other))),
        }
    }
}
