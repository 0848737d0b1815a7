///! Error taxonomy for the search pipeline
///!
///! Validation errors surface before any engine work and abort the run.
///! Normalization errors abort a single result batch. Storage errors are
///! fatal and propagate. Engine faults travel as `anyhow::Error` and are
///! classified by the call site: search failures skip the query, setup
///! failures end the run.

use chrono::NaiveDate;
use thiserror::Error;

/// Bad search parameters, rejected before the pipeline runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unsupported airline website to search: {0}")]
    UnsupportedWebsite(String),

    #[error("Invalid date range: {start} - {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("{name} ({id}) only supports searching within the range: {min} - {max}")]
    OutsideValidRange {
        name: String,
        id: String,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}

/// A malformed scraped award. The whole batch it belongs to is discarded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Award has no segments")]
    MissingSegments,

    #[error("Award is missing fare codes")]
    MissingFares,

    #[error("Segment has invalid airline code: {0}")]
    InvalidAirlineCode(String),

    #[error("Segment is missing a flight number")]
    MissingFlight,

    #[error("Segment has invalid origin airport code: {0}")]
    InvalidOriginCode(String),

    #[error("Segment has invalid destination airport code: {0}")]
    InvalidDestinationCode(String),

    #[error("Segment has invalid departure date: {0}")]
    InvalidDate(String),

    #[error("Segment has invalid departure time: {0}")]
    InvalidDepartureTime(String),

    #[error("Segment has invalid arrival time: {0}")]
    InvalidArrivalTime(String),

    #[error("Segment has invalid lag days")]
    InvalidLagDays,
}

/// Persistence failure. Always fatal.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
