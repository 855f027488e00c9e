pub mod airline;

pub use airline::{AirlineDirectory, AirlineInfo, AirlineTable, NoAirlineDirectory, NO_AIRLINE_INFO};
