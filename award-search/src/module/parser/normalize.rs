///! Award normalization
///!
///! Validates raw candidates fail-closed (the first malformed record
///! aborts the whole batch) and resolves every derived field through a
///! named resolution function so defaulting stays auditable.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use award_common::{Award, AwardCandidate, Cabin, Query, Segment, SegmentCandidate};

use crate::engine::EngineCapabilities;
use crate::error::NormalizationError;

use super::validate::{parse_date, parse_time, valid_airline_code, valid_airport_code};

/// A segment that passed syntactic validation but still has unresolved
/// optional fields.
struct CheckedSegment {
    airline: String,
    flight: String,
    from_city: String,
    to_city: String,
    date: NaiveDate,
    departure: NaiveTime,
    arrival: NaiveTime,
    lag_days: i32,
    cabin: Option<Cabin>,
    duration: Option<i64>,
    next_connection: Option<i64>,
    stops: Option<u32>,
}

impl CheckedSegment {
    fn departure_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.departure)
    }

    fn arrival_datetime(&self) -> NaiveDateTime {
        (self.date + Duration::days(self.lag_days as i64)).and_time(self.arrival)
    }
}

pub struct AwardNormalizer<'a> {
    capabilities: &'a EngineCapabilities,
}

impl<'a> AwardNormalizer<'a> {
    pub fn new(capabilities: &'a EngineCapabilities) -> Self {
        Self { capabilities }
    }

    /// Normalize a whole batch. Fail-closed: one bad record rejects the
    /// batch and no partial output is produced.
    pub fn normalize_all(
        &self,
        query: &Query,
        candidates: Vec<AwardCandidate>,
    ) -> Result<Vec<Award>, NormalizationError> {
        candidates
            .into_iter()
            .map(|candidate| self.normalize(query, candidate))
            .collect()
    }

    pub fn normalize(
        &self,
        query: &Query,
        candidate: AwardCandidate,
    ) -> Result<Award, NormalizationError> {
        if candidate.segments.is_empty() {
            return Err(NormalizationError::MissingSegments);
        }

        // Fares must come from the source. An empty string is meaningful
        // (confirmed no availability); absence is a parser bug.
        let fares = resolve_fares(candidate.fares.as_deref())?;

        let checked: Vec<CheckedSegment> = candidate
            .segments
            .iter()
            .map(validate_segment)
            .collect::<Result<_, _>>()?;

        let mut segments = Vec::with_capacity(checked.len());
        for (i, seg) in checked.iter().enumerate() {
            let duration = match seg.duration {
                Some(minutes) => minutes,
                None => resolve_segment_duration(seg),
            };
            let next_connection = match seg.next_connection {
                Some(minutes) => Some(minutes),
                None => checked
                    .get(i + 1)
                    .map(|next| resolve_next_connection(seg, next)),
            };
            segments.push(Segment {
                airline: seg.airline.clone(),
                flight: seg.flight.clone(),
                from_city: seg.from_city.clone(),
                to_city: seg.to_city.clone(),
                date: seg.date,
                departure: seg.departure,
                arrival: seg.arrival,
                lag_days: seg.lag_days,
                cabin: seg.cabin,
                duration,
                next_connection,
                stops: seg.stops.unwrap_or(0),
            });
        }

        let first = &segments[0];
        let last = &segments[segments.len() - 1];

        let engine = candidate.engine.unwrap_or_else(|| query.engine.clone());
        let partner = candidate
            .partner
            .unwrap_or_else(|| resolve_partner(self.capabilities, &segments));
        let from_city = candidate
            .from_city
            .unwrap_or_else(|| first.from_city.clone());
        let to_city = candidate.to_city.unwrap_or_else(|| last.to_city.clone());
        let date = candidate.date.unwrap_or(first.date);
        let cabin = candidate
            .cabin
            .unwrap_or_else(|| resolve_best_cabin(&segments, query.cabin));
        let mixed = candidate.mixed.unwrap_or_else(|| resolve_mixed(&segments));
        let duration = candidate
            .duration
            .unwrap_or_else(|| resolve_total_duration(first, last));
        let travel_time = candidate
            .travel_time
            .unwrap_or_else(|| resolve_travel_time(&segments));
        let stops = candidate
            .stops
            .unwrap_or_else(|| resolve_total_stops(&segments));
        let quantity = candidate.quantity.unwrap_or(query.quantity);

        Ok(Award {
            engine,
            partner,
            from_city,
            to_city,
            date,
            cabin,
            mixed,
            duration,
            travel_time,
            stops,
            quantity,
            fares,
            mileage: candidate.mileage,
            segments,
        })
    }
}

fn validate_segment(c: &SegmentCandidate) -> Result<CheckedSegment, NormalizationError> {
    if !valid_airline_code(&c.airline) {
        return Err(NormalizationError::InvalidAirlineCode(c.airline.clone()));
    }
    if c.flight.trim().is_empty() {
        return Err(NormalizationError::MissingFlight);
    }
    if !valid_airport_code(&c.from_city) {
        return Err(NormalizationError::InvalidOriginCode(c.from_city.clone()));
    }
    if !valid_airport_code(&c.to_city) {
        return Err(NormalizationError::InvalidDestinationCode(
            c.to_city.clone(),
        ));
    }
    let date = parse_date(&c.date).ok_or_else(|| NormalizationError::InvalidDate(c.date.clone()))?;
    let departure = parse_time(&c.departure)
        .ok_or_else(|| NormalizationError::InvalidDepartureTime(c.departure.clone()))?;
    let arrival = parse_time(&c.arrival)
        .ok_or_else(|| NormalizationError::InvalidArrivalTime(c.arrival.clone()))?;
    let lag_days = match c.lag_days {
        Some(lag) if lag >= 0 => lag,
        _ => return Err(NormalizationError::InvalidLagDays),
    };
    Ok(CheckedSegment {
        airline: c.airline.clone(),
        flight: c.flight.clone(),
        from_city: c.from_city.clone(),
        to_city: c.to_city.clone(),
        date,
        departure,
        arrival,
        lag_days,
        cabin: c.cabin,
        duration: c.duration,
        next_connection: c.next_connection,
        stops: c.stops,
    })
}

/// Minutes from departure to arrival, lag days included.
fn resolve_segment_duration(seg: &CheckedSegment) -> i64 {
    (seg.arrival_datetime() - seg.departure_datetime()).num_minutes()
}

/// Minutes on the ground between a segment's arrival and the next
/// segment's departure.
fn resolve_next_connection(current: &CheckedSegment, next: &CheckedSegment) -> i64 {
    (next.departure_datetime() - current.arrival_datetime()).num_minutes()
}

/// Minutes from the itinerary's first departure to its last arrival.
fn resolve_total_duration(first: &Segment, last: &Segment) -> i64 {
    (last.arrival_datetime() - first.departure_datetime()).num_minutes()
}

/// Minutes spent flying plus minutes spent connecting.
fn resolve_travel_time(segments: &[Segment]) -> i64 {
    let flying: i64 = segments.iter().map(|s| s.duration).sum();
    let connecting: i64 = segments.iter().filter_map(|s| s.next_connection).sum();
    flying + connecting
}

/// Intermediate stops within segments, plus one per connection.
fn resolve_total_stops(segments: &[Segment]) -> u32 {
    let on_segments: u32 = segments.iter().map(|s| s.stops).sum();
    on_segments + (segments.len() as u32 - 1)
}

/// Highest service level flown on any segment; the query's cabin when no
/// segment reported one.
fn resolve_best_cabin(segments: &[Segment], fallback: Cabin) -> Cabin {
    segments
        .iter()
        .filter_map(|s| s.cabin)
        .max()
        .unwrap_or(fallback)
}

/// True when the reported segment cabins span more than one class.
fn resolve_mixed(segments: &[Segment]) -> bool {
    let mut cabins = segments.iter().filter_map(|s| s.cabin);
    match cabins.next() {
        Some(head) => cabins.any(|c| c != head),
        None => false,
    }
}

/// Partner award: any segment operated by a carrier outside the engine's
/// first-party airline set.
fn resolve_partner(capabilities: &EngineCapabilities, segments: &[Segment]) -> bool {
    segments.iter().any(|s| !capabilities.operates(&s.airline))
}

/// Split the raw space-separated fare string; "" becomes an empty list,
/// which records a confirmed lack of availability.
fn resolve_fares(raw: Option<&str>) -> Result<Vec<String>, NormalizationError> {
    let raw = raw.ok_or(NormalizationError::MissingFares)?;
    Ok(raw.split_whitespace().map(str::to_string).collect())
}
