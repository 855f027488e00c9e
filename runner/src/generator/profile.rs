use anyhow::{ensure, Context};
use hubcore::records::{AirportRecord, FlightRecord, NULL_PLACEHOLDER};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating synthetic state vectors around airports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: u64,
    /// Maximum offset from the chosen airport, in degrees, on each axis.
    pub spread_degrees: f64,
    /// Share of records given a `null` call sign or `null` coordinates.
    pub null_fraction: f64,
    pub carriers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 500,
            seed: 0,
            spread_degrees: 0.6,
            null_fraction: 0.05,
            carriers: ["DAL", "UAL", "AAL", "SWA", "JBU", "ASA", "FDX", "UPS"]
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.null_fraction),
            "null_fraction must be within [0, 1], got {}",
            self.null_fraction
        );
        ensure!(
            self.spread_degrees.is_finite() && self.spread_degrees >= 0.0,
            "spread_degrees must be a non-negative number, got {}",
            self.spread_degrees
        );
        ensure!(!self.carriers.is_empty(), "at least one carrier is required");
        Ok(())
    }
}

fn jitter(rng: &mut StdRng, spread: f64) -> f64 {
    if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    }
}

/// Builds `config.count` flight records scattered around `airports`.
pub fn build_flight_records(
    config: &GeneratorConfig,
    airports: &[AirportRecord],
) -> anyhow::Result<Vec<FlightRecord>> {
    config.validate()?;
    ensure!(!airports.is_empty(), "cannot generate flights without airports");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.count);

    for _ in 0..config.count {
        let airport = airports
            .choose(&mut rng)
            .context("choosing an airport for a synthetic flight")?;
        let carrier = config
            .carriers
            .choose(&mut rng)
            .context("choosing a carrier for a synthetic flight")?;

        let latitude = airport.latitude + jitter(&mut rng, config.spread_degrees);
        let longitude = airport.longitude + jitter(&mut rng, config.spread_degrees);
        let call_sign = format!("{}{:<5}", carrier, rng.gen_range(1..9999));
        let transponder = format!("{:06x}", rng.gen_range(0..0x00FF_FFFF));

        let mut record = FlightRecord::at_position(call_sign, latitude, longitude)
            .with_field("icao24", transponder)
            .with_field("origin_country", "United States");

        if rng.gen_bool(config.null_fraction) {
            if rng.gen_bool(0.5) {
                record.call_sign = NULL_PLACEHOLDER.to_string();
            } else {
                record.latitude = Some(NULL_PLACEHOLDER.to_string());
                record.longitude = Some(NULL_PLACEHOLDER.to_string());
            }
        }
        records.push(record);
    }

    Ok(records)
}
