//! Hub matching and carrier-frequency aggregation for flight state-vector streams.
//!
//! Records flow one at a time through a [`HubMatcher`](processing::HubMatcher),
//! which associates each flight with the airports whose hub window contains it,
//! and into a [`FrequencyAggregator`](processing::FrequencyAggregator), which keeps
//! per-airport carrier counts until the report is finalized.

pub mod enrichment;
pub mod geo;
pub mod index;
pub mod prelude;
pub mod processing;
pub mod records;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageConfig, StageError, StageResult};
