///! Search execution: redundancy filtering, early termination and the
///! controller loop that drives an engine through a query plan

mod controller;
mod redundancy;
mod terminate;

pub use controller::{ControllerOptions, RunReport, SearchController};
pub use redundancy::redundant;
pub use terminate::TerminationTracker;
