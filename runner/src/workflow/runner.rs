use crate::generator::profile::{build_flight_records, GeneratorConfig};
use crate::source::{airlines, airports, flights};
use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, bail, Context};
use hubcore::enrichment::AirlineDirectory;
use hubcore::index::AirportIndex;
use hubcore::prelude::{ProcessingStage, StageConfig};
use hubcore::processing::{FrequencyAggregator, FrequencyReport, HubMatcher};
use hubcore::records::FlightRecord;
use hubcore::telemetry::{MetricsRecorder, MetricsSnapshot, SkipReason};
use log::info;
use std::sync::Arc;
use std::thread;

pub struct WorkflowResult {
    pub report: FrequencyReport,
    pub metrics: MetricsSnapshot,
    pub airports_loaded: usize,
    pub records_read: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

/// Runs one partition of the stream through its own matcher and aggregator.
fn run_partition(
    index: Arc<AirportIndex>,
    records: Vec<FlightRecord>,
    stage_config: &StageConfig,
) -> anyhow::Result<(FrequencyAggregator, MetricsSnapshot)> {
    let metrics = Arc::new(MetricsRecorder::new());
    let mut matcher = HubMatcher::with_metrics(index, metrics.clone());
    matcher
        .initialize(stage_config)
        .context("initializing hub matcher")?;
    let mut aggregator = FrequencyAggregator::new();
    aggregator
        .initialize(stage_config)
        .context("initializing frequency aggregator")?;

    for record in records {
        for found in matcher.execute(record).context("executing hub matcher")? {
            aggregator
                .execute(found)
                .context("executing frequency aggregator")?;
        }
    }
    matcher.cleanup();

    Ok((aggregator, metrics.snapshot()))
}

/// Deals records round-robin so every worker sees a similar share.
fn partition(records: Vec<FlightRecord>, workers: usize) -> Vec<Vec<FlightRecord>> {
    let mut partitions: Vec<Vec<FlightRecord>> = (0..workers)
        .map(|_| Vec::with_capacity(records.len() / workers + 1))
        .collect();
    for (position, record) in records.into_iter().enumerate() {
        partitions[position % workers].push(record);
    }
    partitions
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Loads every configured source and runs the full pipeline.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let index = airports::load_index(&self.config.airports, self.config.window)?;
        let records = self.flight_records(&index)?;
        let directory = self
            .config
            .airlines
            .as_deref()
            .map(airlines::load_directory);
        self.process(index, records, directory.as_deref())
    }

    fn flight_records(&self, index: &AirportIndex) -> anyhow::Result<Vec<FlightRecord>> {
        if let Some(path) = &self.config.flights {
            return Ok(flights::read_flights(path)?.records);
        }
        if let Some(generator) = &self.config.synthetic {
            return self.synthetic_records(generator, index);
        }
        bail!("no flight source configured: set `flights` or `synthetic`")
    }

    fn synthetic_records(
        &self,
        generator: &GeneratorConfig,
        index: &AirportIndex,
    ) -> anyhow::Result<Vec<FlightRecord>> {
        let records = build_flight_records(generator, index.airports())
            .context("generating synthetic flights")?;
        info!(
            "generated {} synthetic flights (seed {})",
            records.len(),
            generator.seed
        );
        Ok(records)
    }

    /// Matches and aggregates `records`, fanning out over the configured
    /// number of workers, then finalizes and enriches the report.
    pub fn process(
        &self,
        index: AirportIndex,
        records: Vec<FlightRecord>,
        directory: Option<&dyn AirlineDirectory>,
    ) -> anyhow::Result<WorkflowResult> {
        let stage_config = self.config.to_stage_config();
        let workers = self.config.worker_count();
        let airports_loaded = index.len();
        let records_read = records.len();
        let metrics = MetricsRecorder::new();
        metrics.record_skips(SkipReason::MalformedAirportLine, index.skipped_lines());
        let index = Arc::new(index);

        let partials = if workers == 1 {
            vec![run_partition(index, records, &stage_config)?]
        } else {
            thread::scope(|scope| {
                let handles: Vec<_> = partition(records, workers)
                    .into_iter()
                    .map(|chunk| {
                        let index = index.clone();
                        let stage_config = &stage_config;
                        scope.spawn(move || run_partition(index, chunk, stage_config))
                    })
                    .collect();
                handles
                    .into_iter()
                    .enumerate()
                    .map(|(worker, handle)| {
                        handle
                            .join()
                            .map_err(|_| anyhow!("worker {} panicked", worker))?
                            .with_context(|| format!("running worker {}", worker))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })?
        };

        let mut merged = FrequencyAggregator::new();
        merged
            .initialize(&stage_config)
            .context("initializing merged aggregator")?;
        for (aggregator, snapshot) in partials {
            merged.merge(aggregator);
            metrics.absorb(&snapshot);
        }

        let mut report = merged.finalize().context("finalizing report")?;
        merged.cleanup();
        if let Some(directory) = directory {
            metrics.record_enrichment_misses(report.enrich(directory));
        }

        let snapshot = metrics.snapshot();
        info!(
            "processed {} records on {} worker(s): {} matches, {} skipped",
            records_read,
            workers,
            snapshot.matched,
            snapshot.skipped_records()
        );

        Ok(WorkflowResult {
            report,
            metrics: snapshot,
            airports_loaded,
            records_read,
        })
    }
}
