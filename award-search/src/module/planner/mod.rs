///! Date-range query planner
///!
///! Expands a date range and route into an ordered, duplicate-free list of
///! queries covering exactly one departure per calendar day, while keeping
///! the number of round-trip queries minimal on engines that search both
///! legs at once. Output is deterministic: identical inputs always produce
///! the identical sequence.

mod assets;

pub use assets::{asset_base_name, query_assets};

use chrono::{Duration, NaiveDate};
use std::path::PathBuf;

use award_common::{Cabin, Query};

use crate::engine::EngineCapabilities;

/// Route, window and uniform query attributes for one run.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub from_city: String,
    pub to_city: String,
    pub start: NaiveDate,
    /// Inclusive
    pub end: NaiveDate,
    pub cabin: Cabin,
    pub quantity: u32,
    pub partners: bool,
    pub oneway: bool,
    pub reverse: bool,
}

/// Route + dates only; uniform attributes are attached after generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Skeleton {
    from_city: String,
    to_city: String,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

pub struct QueryPlanner {
    capabilities: EngineCapabilities,
    data_dir: PathBuf,
}

impl QueryPlanner {
    pub fn new(capabilities: EngineCapabilities, data_dir: PathBuf) -> Self {
        Self {
            capabilities,
            data_dir,
        }
    }

    /// Generate the run's query sequence.
    ///
    /// `valid_end` is the last departure date the engine can search, used
    /// to decide whether a head/tail round trip can anchor forward or has
    /// to flip backward. The caller computes it once from the engine so a
    /// plan never depends on the wall clock here.
    ///
    /// Precondition (enforced upstream): `start <= end`.
    pub fn generate(&self, request: &PlanRequest, valid_end: NaiveDate) -> Vec<Query> {
        let caps = &self.capabilities;
        let days = (request.end - request.start).num_days() + 1;
        let gap = if request.oneway || !caps.roundtrip_optimized {
            0
        } else {
            caps.trip_min_days.min(days)
        };
        let trip_min = Duration::days(caps.trip_min_days);

        let depart = (request.from_city.as_str(), request.to_city.as_str());
        let ret = (request.to_city.as_str(), request.from_city.as_str());
        let mut skeletons = Vec::with_capacity(days as usize + gap as usize);

        // Head: cover the return leg for the first `gap` days of the
        // window. One-way if the engine allows it, otherwise the shortest
        // round trip that still fits the engine's searchable range.
        for i in 0..gap {
            let date = request.start + Duration::days(i);
            if caps.one_way_supported {
                skeletons.push(skeleton(ret, date, None));
            } else if date + trip_min < valid_end {
                skeletons.push(skeleton(ret, date, Some(date + trip_min)));
            } else {
                skeletons.push(skeleton(depart, date - trip_min, Some(date)));
            }
        }

        // Body: one departure per remaining day.
        for i in 0..(days - gap) {
            let date = request.start + Duration::days(i);
            if caps.roundtrip_optimized {
                let return_date = if request.oneway {
                    None
                } else {
                    Some(date + Duration::days(gap))
                };
                skeletons.push(skeleton(depart, date, return_date));
            } else {
                skeletons.push(skeleton(depart, date, None));
                if !request.oneway {
                    skeletons.push(skeleton(ret, date, None));
                }
            }
        }

        // Tail: cover the outbound leg for the final `gap` days, ascending.
        for i in (0..gap).rev() {
            let date = request.end - Duration::days(i);
            if caps.one_way_supported {
                skeletons.push(skeleton(depart, date, None));
            } else if date + trip_min < valid_end {
                skeletons.push(skeleton(depart, date, Some(date + trip_min)));
            } else {
                skeletons.push(skeleton(ret, date - trip_min, Some(date)));
            }
        }

        // Head and tail can land on the same route/dates when the window
        // is short; keep the first occurrence of each identity.
        let mut seen = std::collections::HashSet::new();
        skeletons.retain(|s| seen.insert(s.clone()));

        let mut queries: Vec<Query> = skeletons
            .into_iter()
            .map(|s| self.attach(request, s))
            .collect();
        if request.reverse {
            queries.reverse();
        }
        queries
    }

    /// Fill in the attributes that are uniform for every query of the run.
    fn attach(&self, request: &PlanRequest, s: Skeleton) -> Query {
        let assets = query_assets(
            &self.data_dir,
            &self.capabilities.id,
            &s.from_city,
            &s.to_city,
            s.depart_date,
            s.return_date,
            request.cabin,
            request.quantity,
        );
        Query {
            engine: self.capabilities.id.clone(),
            partners: request.partners,
            from_city: s.from_city,
            to_city: s.to_city,
            depart_date: s.depart_date,
            return_date: s.return_date,
            cabin: request.cabin,
            quantity: request.quantity,
            assets,
        }
    }
}

fn skeleton(
    (from_city, to_city): (&str, &str),
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
) -> Skeleton {
    Skeleton {
        from_city: from_city.to_string(),
        to_city: to_city.to_string(),
        depart_date,
        return_date,
    }
}
