use anyhow::Context;
use hubcore::processing::{AirportStats, FrequencyReport, SortOrder};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

fn heading(sort_order: SortOrder) -> &'static str {
    match sort_order {
        SortOrder::ByAirportCode => "-- Airlines sorted by Airports' Codes --",
        SortOrder::ByCallSignFrequency => "-- Airlines sorted by Call Signs (# of flights) --",
    }
}

fn render_airport(f: &mut fmt::Formatter<'_>, stats: &AirportStats) -> fmt::Result {
    writeln!(f, "At Airport: {} ({})", stats.airport_code, stats.airport_city)?;
    for carrier in stats.carrier_counts() {
        write!(f, "\t{}: {}", carrier.carrier_code, carrier.count)?;
        if let Some(airline) = &carrier.airline {
            write!(f, " [{}]", airline)?;
        }
        writeln!(f)?;
    }
    writeln!(f, "Total #flights => {}", stats.total_flights())?;
    writeln!(f)
}

/// Console rendering of a finalized report.
pub struct TextReport<'a>(pub &'a FrequencyReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{}", heading(report.sort_order))?;
        for stats in &report.airports {
            render_airport(f, stats)?;
        }
        if report.airports.is_empty() {
            writeln!(f, "No flights matched any airport hub.")?;
        }
        Ok(())
    }
}

pub fn render_text(report: &FrequencyReport) -> String {
    TextReport(report).to_string()
}

pub fn write_json(report: &FrequencyReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("writing report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing report {}", path.display()))?;
    Ok(())
}
