///! Shared fixtures for unit tests
use chrono::NaiveDate;

use award_common::{
    Award, AwardCandidate, Cabin, Query, QueryAssets, Segment, SegmentCandidate,
};

use crate::engine::{DateValidation, EngineCapabilities};

pub(crate) fn test_caps() -> EngineCapabilities {
    EngineCapabilities {
        id: "SQ".to_string(),
        name: "Test Engine".to_string(),
        login_required: false,
        roundtrip_optimized: true,
        trip_min_days: 3,
        one_way_supported: true,
        airlines: vec!["SQ".to_string()],
        validation: DateValidation::default(),
    }
}

pub(crate) fn test_query(
    from: &str,
    to: &str,
    depart: &str,
    return_date: Option<&str>,
    quantity: u32,
) -> Query {
    Query {
        engine: "SQ".to_string(),
        partners: false,
        from_city: from.to_string(),
        to_city: to.to_string(),
        depart_date: depart.parse().unwrap(),
        return_date: return_date.map(|d| d.parse().unwrap()),
        cabin: Cabin::Business,
        quantity,
        assets: QueryAssets {
            json: format!("data/{}-{}-{}.json", from, to, depart).into(),
            html: format!("data/{}-{}-{}.html", from, to, depart).into(),
            screenshot: format!("data/{}-{}-{}.jpg", from, to, depart).into(),
        },
    }
}

fn test_segment(flight: &str, query: &Query) -> Segment {
    Segment {
        airline: "SQ".to_string(),
        flight: flight.to_string(),
        from_city: query.from_city.clone(),
        to_city: query.to_city.clone(),
        date: query.depart_date,
        departure: "09:00".parse().unwrap(),
        arrival: "17:00".parse().unwrap(),
        lag_days: 0,
        cabin: Some(query.cabin),
        duration: 480,
        next_connection: None,
        stops: 0,
    }
}

/// Normalized award carrying the given flights and fare codes.
pub(crate) fn award_with_fares(query: &Query, flights: &[&str], fares: &[&str]) -> Award {
    Award {
        engine: query.engine.clone(),
        partner: false,
        from_city: query.from_city.clone(),
        to_city: query.to_city.clone(),
        date: query.depart_date,
        cabin: query.cabin,
        mixed: false,
        duration: 480,
        travel_time: 480,
        stops: 0,
        quantity: query.quantity,
        fares: fares.iter().map(|f| f.to_string()).collect(),
        mileage: None,
        segments: flights.iter().map(|f| test_segment(f, query)).collect(),
    }
}

/// Confirmed-empty award: segments present, no fare codes.
pub(crate) fn empty_award(query: &Query) -> Award {
    award_with_fares(query, &["SQ31"], &[])
}

/// Valid raw candidate for the query's route, one nonstop segment.
pub(crate) fn raw_candidate(query: &Query) -> AwardCandidate {
    AwardCandidate {
        fares: Some("S".to_string()),
        segments: vec![SegmentCandidate {
            airline: "SQ".to_string(),
            flight: "SQ31".to_string(),
            from_city: query.from_city.clone(),
            to_city: query.to_city.clone(),
            date: query.depart_date.to_string(),
            departure: "09:00".to_string(),
            arrival: "17:00".to_string(),
            lag_days: Some(0),
            cabin: Some(query.cabin),
            ..SegmentCandidate::default()
        }],
        ..AwardCandidate::default()
    }
}

#[allow(dead_code)]
pub(crate) fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}
