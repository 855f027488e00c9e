pub mod airport_index;

pub use airport_index::{AirportIndex, HubLocator};
