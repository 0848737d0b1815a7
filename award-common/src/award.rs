///! Award records: raw candidates from an engine parser, and the
///! validated form the pipeline persists
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::cabin::Cabin;

/// One flight segment as scraped, before validation. Date and times are
/// kept as raw strings so the normalizer can reject malformed values
/// instead of failing at deserialization with no context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentCandidate {
    pub airline: String,
    pub flight: String,
    pub from_city: String,
    pub to_city: String,
    /// Departure date, "YYYY-MM-DD"
    pub date: String,
    /// Local departure time, "HH:MM"
    pub departure: String,
    /// Local arrival time, "HH:MM"
    pub arrival: String,
    /// Days the arrival date is offset from the departure date
    pub lag_days: Option<i32>,
    pub cabin: Option<Cabin>,
    /// Minutes in the air, derived from the times if absent
    pub duration: Option<i64>,
    /// Minutes until the next segment departs, derived if absent
    pub next_connection: Option<i64>,
    pub stops: Option<u32>,
}

/// A validated flight segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub airline: String,
    pub flight: String,
    pub from_city: String,
    pub to_city: String,
    pub date: NaiveDate,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub lag_days: i32,
    pub cabin: Option<Cabin>,
    pub duration: i64,
    pub next_connection: Option<i64>,
    pub stops: u32,
}

impl Segment {
    pub fn departure_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.departure)
    }

    pub fn arrival_datetime(&self) -> NaiveDateTime {
        (self.date + Duration::days(self.lag_days as i64)).and_time(self.arrival)
    }
}

/// A raw award record produced by an engine's parse step. Every field the
/// normalizer can derive is optional; `fares` is optional only so that its
/// absence can be reported as a validation error rather than silently
/// defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardCandidate {
    pub engine: Option<String>,
    pub partner: Option<bool>,
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub date: Option<NaiveDate>,
    pub cabin: Option<Cabin>,
    pub mixed: Option<bool>,
    pub duration: Option<i64>,
    pub travel_time: Option<i64>,
    pub stops: Option<u32>,
    pub quantity: Option<u32>,
    /// Space-separated fare codes; an empty string is a confirmed empty
    /// result, a missing value is a parser bug
    pub fares: Option<String>,
    pub mileage: Option<u32>,
    pub segments: Vec<SegmentCandidate>,
}

/// A normalized, bookable award itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub engine: String,
    pub partner: bool,
    pub from_city: String,
    pub to_city: String,
    pub date: NaiveDate,
    pub cabin: Cabin,
    pub mixed: bool,
    /// Minutes from first departure to last arrival
    pub duration: i64,
    /// Minutes spent flying or connecting
    pub travel_time: i64,
    pub stops: u32,
    pub quantity: u32,
    /// Fare codes this itinerary is offered under; empty means the search
    /// ran and confirmed no availability
    pub fares: Vec<String>,
    pub mileage: Option<u32>,
    pub segments: Vec<Segment>,
}

impl Award {
    /// True when the search confirmed there is nothing bookable here.
    pub fn no_availability(&self) -> bool {
        self.fares.is_empty()
    }
}
