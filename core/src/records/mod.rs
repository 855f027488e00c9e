pub mod airport;
pub mod flight;
pub mod matching;

pub use airport::AirportRecord;
pub use flight::{FlightRecord, NULL_PLACEHOLDER};
pub use matching::Match;
