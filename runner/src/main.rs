use anyhow::Context;
use clap::Parser;
use generator::profile::GeneratorConfig;
use hubcore::geo::WindowPolicy;
use hubcore::processing::SortOrder;
use log::info;
use report::sink;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod source;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Per-airport carrier frequency from flight state vectors")]
struct Args {
    /// Load a workflow config from YAML; other flags override its values
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Airport list with `city,code,latitude,longitude` lines
    #[arg(long)]
    airports: Option<PathBuf>,
    /// State-vector feed (JSON snapshot or JSON Lines)
    #[arg(long)]
    flights: Option<PathBuf>,
    /// Airline table with `CODE,Airline Name` lines
    #[arg(long)]
    airlines: Option<PathBuf>,
    /// Hub window: fixed-degrees or distance-normalized
    #[arg(long)]
    window: Option<WindowPolicy>,
    /// Report order: by-call-sign-frequency or by-airport-code
    #[arg(long)]
    sort: Option<SortOrder>,
    #[arg(long)]
    workers: Option<usize>,
    /// Generate this many synthetic flights instead of reading a feed
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn build_config(args: Args) -> anyhow::Result<WorkflowConfig> {
    let mut config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let airports = args
            .airports
            .clone()
            .context("--airports is required when no --workflow is given")?;
        WorkflowConfig::from_args(
            airports,
            args.window.unwrap_or_default(),
            args.sort.unwrap_or_default(),
        )
    };

    if let Some(airports) = args.airports {
        config.airports = airports;
    }
    if let Some(flights) = args.flights {
        config.flights = Some(flights);
    }
    if let Some(airlines) = args.airlines {
        config.airlines = Some(airlines);
    }
    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(sort) = args.sort {
        config.sort_order = sort;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(count) = args.synthetic {
        config.synthetic = Some(GeneratorConfig {
            count,
            seed: args.seed,
            ..Default::default()
        });
        config.flights = None;
    }
    if let Some(json) = args.json {
        config.json_report = Some(json);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = build_config(Args::parse())?;
    let runner = Runner::new(config);

    let result = runner.execute()?;
    print!("{}", sink::render_text(&result.report));

    if let Some(path) = &runner.config().json_report {
        sink::write_json(&result.report, path)?;
        info!("report written to {}", path.display());
    }

    let metrics = &result.metrics;
    println!(
        "Run -> airports {}, records {}, matches {}, skipped {}, unnamed carriers {}",
        result.airports_loaded,
        result.records_read,
        metrics.matched,
        metrics.skipped_records(),
        metrics.enrichment_misses
    );

    Ok(())
}
