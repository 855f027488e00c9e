use std::collections::HashMap;

use serde::Serialize;

use crate::enrichment::AirlineInfo;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use crate::processing::report::{FrequencyReport, SortOrder};
use crate::records::Match;
use crate::telemetry::LogManager;

/// Flights seen for one carrier at one airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierCount {
    pub carrier_code: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<AirlineInfo>,
}

/// Running carrier counts for one airport.
///
/// Carriers are kept in first-seen order; `total_flights` always equals the
/// sum of the carrier counts.
#[derive(Debug, Clone, Serialize)]
pub struct AirportStats {
    pub airport_city: String,
    pub airport_code: String,
    carriers: Vec<CarrierCount>,
    total_flights: u64,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl AirportStats {
    pub fn new(airport_city: impl Into<String>, airport_code: impl Into<String>) -> Self {
        Self {
            airport_city: airport_city.into(),
            airport_code: airport_code.into(),
            carriers: Vec::new(),
            total_flights: 0,
            positions: HashMap::new(),
        }
    }

    pub fn record(&mut self, carrier_code: &str) {
        self.add(carrier_code, 1);
    }

    /// Adds `flights` to `carrier_code`. Zero is ignored so that every
    /// present carrier keeps a count of at least one.
    pub fn add(&mut self, carrier_code: &str, flights: u64) {
        if flights == 0 {
            return;
        }
        match self.positions.get(carrier_code) {
            Some(&position) => self.carriers[position].count += flights,
            None => {
                self.positions
                    .insert(carrier_code.to_string(), self.carriers.len());
                self.carriers.push(CarrierCount {
                    carrier_code: carrier_code.to_string(),
                    count: flights,
                    airline: None,
                });
            }
        }
        self.total_flights += flights;
    }

    pub fn carrier_counts(&self) -> &[CarrierCount] {
        &self.carriers
    }

    pub fn count(&self, carrier_code: &str) -> u64 {
        self.positions
            .get(carrier_code)
            .map(|&position| self.carriers[position].count)
            .unwrap_or(0)
    }

    pub fn total_flights(&self) -> u64 {
        self.total_flights
    }

    /// Orders carriers by descending count; ties keep first-seen order.
    pub fn rank_by_frequency(&mut self) {
        self.carriers.sort_by(|a, b| b.count.cmp(&a.count));
        self.reindex();
    }

    pub(crate) fn carriers_mut(&mut self) -> &mut [CarrierCount] {
        &mut self.carriers
    }

    fn reindex(&mut self) {
        self.positions = self
            .carriers
            .iter()
            .enumerate()
            .map(|(position, carrier)| (carrier.carrier_code.clone(), position))
            .collect();
    }
}

/// Stage accumulating per-airport carrier counts until finalization.
pub struct FrequencyAggregator {
    airports: Vec<AirportStats>,
    positions: HashMap<String, usize>,
    config: Option<StageConfig>,
    logger: LogManager,
}

impl FrequencyAggregator {
    pub fn new() -> Self {
        Self {
            airports: Vec::new(),
            positions: HashMap::new(),
            config: None,
            logger: LogManager::new("frequency-aggregator"),
        }
    }

    /// Counts one match. The city recorded on an airport's first match is
    /// kept even if later matches disagree.
    pub fn observe(&mut self, found: &Match) {
        self.stats_entry(&found.airport_code, &found.airport_city)
            .record(&found.carrier_code);
    }

    /// Sums another aggregator's counts into this one.
    pub fn merge(&mut self, other: FrequencyAggregator) {
        for stats in other.airports {
            let target = self.stats_entry(&stats.airport_code, &stats.airport_city);
            for carrier in &stats.carriers {
                target.add(&carrier.carrier_code, carrier.count);
            }
        }
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn stats(&self, airport_code: &str) -> Option<&AirportStats> {
        self.positions
            .get(airport_code)
            .map(|&position| &self.airports[position])
    }

    /// Airports in first-seen order.
    pub fn airports(&self) -> &[AirportStats] {
        &self.airports
    }

    pub fn total_flights(&self) -> u64 {
        self.airports.iter().map(AirportStats::total_flights).sum()
    }

    /// Produces the ranked report and resets the aggregator.
    pub fn finalize_report(&mut self, sort_order: SortOrder) -> FrequencyReport {
        let mut airports = std::mem::take(&mut self.airports);
        self.positions.clear();

        match sort_order {
            SortOrder::ByAirportCode => {
                airports.sort_by(|a, b| a.airport_code.cmp(&b.airport_code));
            }
            SortOrder::ByCallSignFrequency => {
                for stats in &mut airports {
                    stats.rank_by_frequency();
                }
            }
        }

        let report = FrequencyReport {
            sort_order,
            airports,
        };
        self.logger.record(&format!(
            "finalized {} airports, {} flights, sorted {}",
            report.airports.len(),
            report.total_flights(),
            sort_order
        ));
        report
    }

    /// Finalizes with the configured sort order.
    pub fn finalize(&mut self) -> StageResult<FrequencyReport> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Uninitialized("frequency aggregator".into()))?;
        let sort_order = config.sort_order;
        Ok(self.finalize_report(sort_order))
    }

    fn stats_entry(&mut self, airport_code: &str, airport_city: &str) -> &mut AirportStats {
        let position = match self.positions.get(airport_code) {
            Some(&position) => position,
            None => {
                let position = self.airports.len();
                self.airports
                    .push(AirportStats::new(airport_city, airport_code));
                self.positions.insert(airport_code.to_string(), position);
                position
            }
        };
        &mut self.airports[position]
    }
}

impl Default for FrequencyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for FrequencyAggregator {
    type Input = Match;
    type Output = ();

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.config = Some(*config);
        self.logger
            .record(&format!("ready, reports sorted {}", config.sort_order));
        Ok(())
    }

    fn execute(&mut self, input: Match) -> StageResult<()> {
        if self.config.is_none() {
            return Err(StageError::Uninitialized("frequency aggregator".into()));
        }
        self.observe(&input);
        Ok(())
    }

    fn cleanup(&mut self) {
        self.airports.clear();
        self.positions.clear();
        self.config = None;
        self.logger.record("cleanup done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(aggregator: &mut FrequencyAggregator, matches: &[(&str, &str, &str)]) {
        for (city, code, carrier) in matches {
            aggregator.observe(&Match::new(*city, *code, *carrier));
        }
    }

    #[test]
    fn carriers_rank_by_descending_count() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(
            &mut aggregator,
            &[
                ("New York", "JFK", "UAL"),
                ("New York", "JFK", "DAL"),
                ("New York", "JFK", "DAL"),
                ("New York", "JFK", "DAL"),
            ],
        );

        let report = aggregator.finalize_report(SortOrder::ByCallSignFrequency);
        let jfk = &report.airports[0];
        let ranked: Vec<(&str, u64)> = jfk
            .carrier_counts()
            .iter()
            .map(|carrier| (carrier.carrier_code.as_str(), carrier.count))
            .collect();
        assert_eq!(ranked, vec![("DAL", 3), ("UAL", 1)]);
        assert_eq!(jfk.total_flights(), 4);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(
            &mut aggregator,
            &[
                ("Atlanta", "ATL", "SWA"),
                ("Atlanta", "ATL", "DAL"),
                ("Atlanta", "ATL", "AAL"),
                ("Atlanta", "ATL", "DAL"),
                ("Atlanta", "ATL", "AAL"),
            ],
        );
        let report = aggregator.finalize_report(SortOrder::ByCallSignFrequency);
        let order: Vec<&str> = report.airports[0]
            .carrier_counts()
            .iter()
            .map(|carrier| carrier.carrier_code.as_str())
            .collect();
        assert_eq!(order, vec!["DAL", "AAL", "SWA"]);
    }

    #[test]
    fn airport_code_order_leaves_carriers_unsorted() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(
            &mut aggregator,
            &[
                ("New York", "JFK", "UAL"),
                ("Atlanta", "ATL", "DAL"),
                ("New York", "JFK", "DAL"),
                ("New York", "JFK", "DAL"),
            ],
        );
        let report = aggregator.finalize_report(SortOrder::ByAirportCode);
        let codes: Vec<&str> = report
            .airports
            .iter()
            .map(|stats| stats.airport_code.as_str())
            .collect();
        assert_eq!(codes, vec!["ATL", "JFK"]);
        assert_eq!(report.airports[1].carrier_counts()[0].carrier_code, "UAL");
    }

    #[test]
    fn frequency_order_keeps_first_seen_airports() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(
            &mut aggregator,
            &[("New York", "JFK", "UAL"), ("Atlanta", "ATL", "DAL")],
        );
        let report = aggregator.finalize_report(SortOrder::ByCallSignFrequency);
        assert_eq!(report.airports[0].airport_code, "JFK");
        assert_eq!(report.airports[1].airport_code, "ATL");
    }

    #[test]
    fn first_city_label_wins() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(
            &mut aggregator,
            &[("New York", "JFK", "DAL"), ("Queens", "JFK", "DAL")],
        );
        let stats = aggregator.stats("JFK").unwrap();
        assert_eq!(stats.airport_city, "New York");
        assert_eq!(stats.count("DAL"), 2);
    }

    #[test]
    fn finalize_resets_state() {
        let mut aggregator = FrequencyAggregator::new();
        observe_all(&mut aggregator, &[("New York", "JFK", "DAL")]);
        let first = aggregator.finalize_report(SortOrder::ByCallSignFrequency);
        assert_eq!(first.total_flights(), 1);
        assert!(aggregator.is_empty());

        observe_all(&mut aggregator, &[("Atlanta", "ATL", "DAL")]);
        let second = aggregator.finalize_report(SortOrder::ByCallSignFrequency);
        assert_eq!(second.airports.len(), 1);
        assert_eq!(second.airports[0].airport_code, "ATL");
    }

    #[test]
    fn merge_sums_counts_by_airport_and_carrier() {
        let mut left = FrequencyAggregator::new();
        observe_all(
            &mut left,
            &[("New York", "JFK", "DAL"), ("New York", "JFK", "UAL")],
        );
        let mut right = FrequencyAggregator::new();
        observe_all(
            &mut right,
            &[("Queens", "JFK", "DAL"), ("Atlanta", "ATL", "DAL")],
        );

        left.merge(right);
        let jfk = left.stats("JFK").unwrap();
        assert_eq!(jfk.airport_city, "New York");
        assert_eq!(jfk.count("DAL"), 2);
        assert_eq!(jfk.total_flights(), 3);
        assert_eq!(left.stats("ATL").unwrap().count("DAL"), 1);
        assert_eq!(left.total_flights(), 4);
    }

    #[test]
    fn stage_finalize_uses_configured_order() {
        let mut aggregator = FrequencyAggregator::new();
        assert!(aggregator.finalize().is_err());

        aggregator
            .initialize(&StageConfig {
                sort_order: SortOrder::ByAirportCode,
                ..Default::default()
            })
            .unwrap();
        aggregator.execute(Match::new("New York", "JFK", "DAL")).unwrap();
        aggregator.execute(Match::new("Atlanta", "ATL", "DAL")).unwrap();

        let report = aggregator.finalize().unwrap();
        assert_eq!(report.sort_order, SortOrder::ByAirportCode);
        assert_eq!(report.airports[0].airport_code, "ATL");
        aggregator.cleanup();
        assert!(aggregator.execute(Match::new("New York", "JFK", "DAL")).is_err());
    }
}
