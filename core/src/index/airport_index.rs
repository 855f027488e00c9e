use std::io::BufRead;

use log::warn;

use crate::geo::WindowPolicy;
use crate::prelude::StageResult;
use crate::records::AirportRecord;

/// Answers "which airports have a hub window containing this point?".
///
/// Callers only rely on this contract, so a spatial index can replace the
/// linear scan in [`AirportIndex`] without touching them.
pub trait HubLocator: Send + Sync {
    /// Window test applied by [`find_matches`](Self::find_matches).
    fn policy(&self) -> WindowPolicy;
    fn find_matches(&self, latitude: f64, longitude: f64) -> Vec<&AirportRecord>;
}

/// Immutable list of airports scanned linearly on every query.
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    airports: Vec<AirportRecord>,
    policy: WindowPolicy,
    skipped_lines: usize,
}

impl AirportIndex {
    pub fn from_records(airports: Vec<AirportRecord>, policy: WindowPolicy) -> Self {
        Self {
            airports,
            policy,
            skipped_lines: 0,
        }
    }

    /// Reads `city,code,latitude,longitude` lines.
    ///
    /// Malformed lines are skipped and counted; only an I/O failure of the
    /// reader itself is an error.
    pub fn load<R: BufRead>(mut reader: R, policy: WindowPolicy) -> StageResult<Self> {
        let mut airports = Vec::new();
        let mut skipped_lines = 0;
        let mut raw = Vec::new();
        let mut line_number = 0usize;

        loop {
            raw.clear();
            let read = reader.read_until(b'\n', &mut raw)?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let Ok(line) = std::str::from_utf8(&raw) else {
                warn!("airport line {} is not valid UTF-8; skipped", line_number);
                skipped_lines += 1;
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match AirportRecord::parse_line(line) {
                Some(airport) => airports.push(airport),
                None => {
                    warn!("airport line {} is malformed: {:?}", line_number, line);
                    skipped_lines += 1;
                }
            }
        }

        if airports.is_empty() && skipped_lines > 0 {
            warn!("airport source produced no usable airports ({} lines skipped)", skipped_lines);
        }

        Ok(Self {
            airports,
            policy,
            skipped_lines,
        })
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn airports(&self) -> &[AirportRecord] {
        &self.airports
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Number of source lines dropped while loading.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl HubLocator for AirportIndex {
    fn policy(&self) -> WindowPolicy {
        self.policy
    }

    fn find_matches(&self, latitude: f64, longitude: f64) -> Vec<&AirportRecord> {
        self.airports
            .iter()
            .filter(|airport| {
                self.policy
                    .contains(airport.latitude, airport.longitude, latitude, longitude)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    const AIRPORTS: &str = "New York,JFK,40.64,-73.78\n\
                            Newark,EWR,40.69,-74.17\n\
                            Chicago,ORD,41.97\n\
                            \n\
                            Atlanta,ATL,33.64,-84.43\n";

    #[test]
    fn load_skips_malformed_lines() {
        let index = AirportIndex::load(Cursor::new(AIRPORTS), WindowPolicy::FixedDegrees).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.skipped_lines(), 1);
        assert!(index.airports().iter().all(|airport| airport.code != "ORD"));
        assert!(index.find_matches(41.97, -87.90).is_empty());
    }

    #[test]
    fn load_skips_invalid_utf8() {
        let mut bytes = b"Paris,CDG,49.01,2.55\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'\n']);
        bytes.extend_from_slice(b"Madrid,MAD,40.49,-3.57\n");
        let index = AirportIndex::load(Cursor::new(bytes), WindowPolicy::FixedDegrees).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.skipped_lines(), 1);
    }

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let err = AirportIndex::load(io::BufReader::new(Unreadable), WindowPolicy::FixedDegrees)
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn own_coordinates_match_under_both_policies() {
        for policy in [WindowPolicy::FixedDegrees, WindowPolicy::DistanceNormalized] {
            let index = AirportIndex::load(Cursor::new(AIRPORTS), policy).unwrap();
            for airport in index.airports() {
                let codes: Vec<&str> = index
                    .find_matches(airport.latitude, airport.longitude)
                    .iter()
                    .map(|found| found.code.as_str())
                    .collect();
                assert!(codes.contains(&airport.code.as_str()), "{} under {}", airport.code, policy);
            }
        }
    }

    #[test]
    fn overlapping_windows_report_every_airport() {
        let index = AirportIndex::load(Cursor::new(AIRPORTS), WindowPolicy::FixedDegrees).unwrap();
        let mut codes: Vec<&str> = index
            .find_matches(40.66, -73.98)
            .iter()
            .map(|airport| airport.code.as_str())
            .collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["EWR", "JFK"]);
    }

    #[test]
    fn policy_is_applied_to_every_query() {
        let index = AirportIndex::from_records(
            vec![AirportRecord::new("Test Field", "TST", 10.0, 20.0)],
            WindowPolicy::FixedDegrees,
        );
        let normalized = index.clone().with_policy(WindowPolicy::DistanceNormalized);
        assert_eq!(normalized.policy(), WindowPolicy::DistanceNormalized);

        assert_eq!(index.find_matches(10.2859, 20.0).len(), 1);
        assert!(normalized.find_matches(10.2859, 20.0).is_empty());

        assert!(index.find_matches(10.0, 20.4442).is_empty());
        assert_eq!(normalized.find_matches(10.0, 20.4442).len(), 1);
    }
}
