pub mod frequency;
pub mod hub_matcher;
pub mod report;

pub use frequency::{AirportStats, CarrierCount, FrequencyAggregator};
pub use hub_matcher::{normalize_call_sign, HubMatcher, CARRIER_CODE_LEN};
pub use report::{FrequencyReport, SortOrder};
