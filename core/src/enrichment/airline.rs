use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Display text used when a carrier has no known airline.
pub const NO_AIRLINE_INFO: &str = "No Airline Info!";

/// Synchronous carrier-code to airline-name lookup.
pub trait AirlineDirectory {
    fn lookup(&self, carrier_code: &str) -> Option<String>;
}

/// Result of enriching one carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirlineInfo {
    Named(String),
    NoInformation,
}

impl AirlineInfo {
    pub fn from_lookup(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => Self::Named(name),
            _ => Self::NoInformation,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::NoInformation => None,
        }
    }
}

impl fmt::Display for AirlineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::NoInformation => f.write_str(NO_AIRLINE_INFO),
        }
    }
}

/// Directory standing in for an unavailable reference source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAirlineDirectory;

impl AirlineDirectory for NoAirlineDirectory {
    fn lookup(&self, _carrier_code: &str) -> Option<String> {
        None
    }
}

/// In-memory airline table keyed by upper-cased ICAO designator.
#[derive(Debug, Clone, Default)]
pub struct AirlineTable {
    names: HashMap<String, String>,
}

impl AirlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: &str, name: impl Into<String>) {
        self.names.insert(code.trim().to_ascii_uppercase(), name.into());
    }

    /// Builds a table from `CODE,Airline Name` lines.
    ///
    /// Lines without a code or a name are ignored; commas after the first
    /// belong to the name. Returns the table and the number of ignored lines.
    pub fn from_lines<'a, I>(lines: I) -> (Self, usize)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::new();
        let mut ignored = 0;
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(',') {
                Some((code, name)) if !code.trim().is_empty() && !name.trim().is_empty() => {
                    table.insert(code, name.trim());
                }
                _ => ignored += 1,
            }
        }
        (table, ignored)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl AirlineDirectory for AirlineTable {
    fn lookup(&self, carrier_code: &str) -> Option<String> {
        self.names
            .get(&carrier_code.trim().to_ascii_uppercase())
            .cloned()
    }
}

impl<T: AirlineDirectory + ?Sized> AirlineDirectory for &T {
    fn lookup(&self, carrier_code: &str) -> Option<String> {
        (**self).lookup(carrier_code)
    }
}
