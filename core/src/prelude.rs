use serde::{Deserialize, Serialize};

use crate::geo::WindowPolicy;
use crate::processing::SortOrder;

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub window: WindowPolicy,
    pub sort_order: SortOrder,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// The airport source could not be read at all; no index can be built.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("airport source unreadable: {0}")]
    AirportSource(#[from] std::io::Error),
    #[error("stage not initialized: {0}")]
    Uninitialized(String),
    #[error("unrecognized option: {0}")]
    UnknownOption(String),
}

impl StageError {
    /// True for failures that prevent the pipeline from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::AirportSource(_))
    }
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing a record-at-a-time pipeline stage.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self);
}
