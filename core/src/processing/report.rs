use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enrichment::{AirlineDirectory, AirlineInfo};
use crate::prelude::StageError;
use crate::processing::frequency::AirportStats;

/// Ordering applied when a report is finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Airports by code; carriers in first-seen order.
    ByAirportCode,
    /// Airports in first-seen order; carriers by descending count.
    #[default]
    ByCallSignFrequency,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByAirportCode => "by-airport-code",
            Self::ByCallSignFrequency => "by-call-sign-frequency",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = StageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "by-airport-code" | "airport-code" => Ok(Self::ByAirportCode),
            "by-call-sign-frequency" | "call-sign-frequency" | "frequency" => {
                Ok(Self::ByCallSignFrequency)
            }
            other => Err(StageError::UnknownOption(format!("sort order '{}'", other))),
        }
    }
}

/// Ordered per-airport statistics produced by one finalization.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyReport {
    pub sort_order: SortOrder,
    pub airports: Vec<AirportStats>,
}

impl FrequencyReport {
    pub fn total_flights(&self) -> u64 {
        self.airports.iter().map(AirportStats::total_flights).sum()
    }

    pub fn airport(&self, airport_code: &str) -> Option<&AirportStats> {
        self.airports
            .iter()
            .find(|stats| stats.airport_code == airport_code)
    }

    /// Attaches airline names to every carrier. Returns the number of
    /// carriers the directory could not name.
    pub fn enrich(&mut self, directory: &dyn AirlineDirectory) -> usize {
        let mut misses = 0;
        for stats in &mut self.airports {
            for carrier in stats.carriers_mut() {
                let info = AirlineInfo::from_lookup(directory.lookup(&carrier.carrier_code));
                if info == AirlineInfo::NoInformation {
                    misses += 1;
                }
                carrier.airline = Some(info);
            }
        }
        misses
    }
}
