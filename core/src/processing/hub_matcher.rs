use std::sync::Arc;

use crate::index::{AirportIndex, HubLocator};
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use crate::records::{FlightRecord, Match, NULL_PLACEHOLDER};
use crate::telemetry::{LogManager, MetricsRecorder, SkipReason};

/// Number of call-sign characters identifying the operating carrier.
pub const CARRIER_CODE_LEN: usize = 3;

/// Trims a raw call sign and reduces it to its carrier code.
///
/// Returns `None` for empty call signs and the feed's `null` placeholder.
/// The code never ends in whitespace, so normalizing it again is a no-op.
pub fn normalize_call_sign(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NULL_PLACEHOLDER {
        return None;
    }
    let code: String = trimmed.chars().take(CARRIER_CODE_LEN).collect();
    Some(code.trim_end().to_string())
}

fn coordinate_text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty() && *text != NULL_PLACEHOLDER)
}

fn parse_coordinate(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Stage turning one flight record into zero or more hub matches.
pub struct HubMatcher<L: HubLocator = AirportIndex> {
    locator: Arc<L>,
    metrics: Arc<MetricsRecorder>,
    config: Option<StageConfig>,
    logger: LogManager,
}

impl<L: HubLocator> HubMatcher<L> {
    pub fn new(locator: Arc<L>) -> Self {
        Self::with_metrics(locator, Arc::new(MetricsRecorder::new()))
    }

    pub fn with_metrics(locator: Arc<L>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            locator,
            metrics,
            config: None,
            logger: LogManager::new("hub-matcher"),
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    /// Validates `record` and looks up every hub containing its position.
    ///
    /// Checks run in order: call sign, coordinate presence, coordinate
    /// parsing. The first failure decides the skip reason.
    pub fn find_hubs(&self, record: &FlightRecord) -> Result<Vec<Match>, SkipReason> {
        let carrier_code =
            normalize_call_sign(&record.call_sign).ok_or(SkipReason::MissingCallSign)?;

        let (Some(longitude), Some(latitude)) = (
            coordinate_text(record.longitude.as_deref()),
            coordinate_text(record.latitude.as_deref()),
        ) else {
            return Err(SkipReason::MissingCoordinates);
        };

        let (Some(longitude), Some(latitude)) =
            (parse_coordinate(longitude), parse_coordinate(latitude))
        else {
            return Err(SkipReason::UnparseableCoordinates);
        };

        Ok(self
            .locator
            .find_matches(latitude, longitude)
            .into_iter()
            .map(|airport| Match::for_airport(airport, &carrier_code))
            .collect())
    }

    /// Matches one record, counting rejections instead of surfacing them.
    pub fn match_record(&self, record: &FlightRecord) -> Vec<Match> {
        match self.find_hubs(record) {
            Ok(matches) => {
                self.metrics.record_processed();
                self.metrics.record_matches(matches.len());
                matches
            }
            Err(reason) => {
                self.metrics.record_skip(reason);
                self.logger
                    .trace(&format!("skipped {:?}: {}", record.call_sign, reason));
                Vec::new()
            }
        }
    }
}

impl<L: HubLocator> ProcessingStage for HubMatcher<L> {
    type Input = FlightRecord;
    type Output = Vec<Match>;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        let locator_policy = self.locator.policy();
        if config.window != locator_policy {
            return Err(StageError::Configuration(format!(
                "hub matcher configured for {} window but locator applies {}",
                config.window, locator_policy
            )));
        }
        self.config = Some(*config);
        self.logger
            .record(&format!("ready with {} hub window", config.window));
        Ok(())
    }

    fn execute(&mut self, input: FlightRecord) -> StageResult<Vec<Match>> {
        if self.config.is_none() {
            return Err(StageError::Uninitialized("hub matcher".into()));
        }
        Ok(self.match_record(&input))
    }

    fn cleanup(&mut self) {
        self.config = None;
        self.logger.record("cleanup done");
    }
}
