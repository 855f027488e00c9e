use anyhow::Context;
use hubcore::geo::WindowPolicy;
use hubcore::prelude::StageConfig;
use hubcore::processing::SortOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::profile::GeneratorConfig;

fn default_workers() -> usize {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// `city,code,latitude,longitude` lines.
    pub airports: PathBuf,
    /// State-vector feed; when absent the synthetic generator is used.
    #[serde(default)]
    pub flights: Option<PathBuf>,
    /// `CODE,Airline Name` lines used to label carriers.
    #[serde(default)]
    pub airlines: Option<PathBuf>,
    #[serde(default)]
    pub window: WindowPolicy,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub synthetic: Option<GeneratorConfig>,
    /// Where to write the report as JSON, if anywhere.
    #[serde(default)]
    pub json_report: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(airports: PathBuf, window: WindowPolicy, sort_order: SortOrder) -> Self {
        Self {
            airports,
            flights: None,
            airlines: None,
            window,
            sort_order,
            workers: default_workers(),
            synthetic: None,
            json_report: None,
        }
    }

    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            window: self.window,
            sort_order: self.sort_order,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_stage_config() {
        let cfg = WorkflowConfig::from_args(
            PathBuf::from("airports.txt"),
            WindowPolicy::DistanceNormalized,
            SortOrder::ByAirportCode,
        );
        let stage = cfg.to_stage_config();
        assert_eq!(stage.window, WindowPolicy::DistanceNormalized);
        assert_eq!(stage.sort_order, SortOrder::ByAirportCode);
        assert_eq!(cfg.worker_count(), 1);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"airports: tools/data/airports.txt\n\
              flights: tools/data/flights.json\n\
              window: distance-normalized\n\
              sort_order: by-airport-code\n\
              workers: 3\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.window, WindowPolicy::DistanceNormalized);
        assert_eq!(cfg.sort_order, SortOrder::ByAirportCode);
        assert_eq!(cfg.workers, 3);
        assert!(cfg.airlines.is_none());
    }

    #[test]
    fn config_load_applies_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"airports: airports.txt\nsynthetic:\n  count: 10\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.window, WindowPolicy::FixedDegrees);
        assert_eq!(cfg.sort_order, SortOrder::ByCallSignFrequency);
        assert_eq!(cfg.synthetic.unwrap().count, 10);
    }

    #[test]
    fn config_load_rejects_unknown_window() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"airports: airports.txt\nwindow: circle\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
