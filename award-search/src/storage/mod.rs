///! Persistent record of past requests and awards
///!
///! A request row is written for every query that produced a result set;
///! award rows are tied to the request that found them. The redundancy
///! filter reads this history back grouped by route leg.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use award_common::{Award, Cabin, Query, RouteKey, Segment};

use crate::engine::SearchResults;
use crate::error::StorageError;

pub type RequestId = u64;

/// One executed search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRequest {
    pub id: RequestId,
    pub engine: String,
    pub partners: bool,
    pub from_city: String,
    pub to_city: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub cabin: Cabin,
    pub quantity: u32,
    pub received_at: DateTime<Utc>,
}

/// One persisted award, immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAward {
    pub request_id: RequestId,
    pub engine: String,
    pub partner: bool,
    pub from_city: String,
    pub to_city: String,
    pub date: NaiveDate,
    pub cabin: Cabin,
    pub mixed: bool,
    pub quantity: u32,
    pub fares: Vec<String>,
    pub mileage: Option<u32>,
    pub segments: Vec<Segment>,
}

impl StoredAward {
    pub fn from_award(request_id: RequestId, award: &Award) -> Self {
        Self {
            request_id,
            engine: award.engine.clone(),
            partner: award.partner,
            from_city: award.from_city.clone(),
            to_city: award.to_city.clone(),
            date: award.date,
            cabin: award.cabin,
            mixed: award.mixed,
            quantity: award.quantity,
            fares: award.fares.clone(),
            mileage: award.mileage,
            segments: award.segments.clone(),
        }
    }

    /// A search that ran and found nothing bookable.
    pub fn confirmed_empty(&self) -> bool {
        !self.segments.is_empty() && self.fares.is_empty()
    }
}

/// Prior request issued for a route leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRecord {
    pub quantity: u32,
}

/// Prior award recorded for a route leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardRecord {
    pub quantity: u32,
    pub has_segments: bool,
    pub fares: Vec<String>,
}

impl AwardRecord {
    pub fn confirmed_empty(&self) -> bool {
        self.has_segments && self.fares.is_empty()
    }
}

/// Everything previously recorded for one route leg.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    pub requests: Vec<RequestRecord>,
    pub awards: Vec<AwardRecord>,
}

pub trait Storage {
    /// Look up prior requests and awards relevant to a query, grouped by
    /// directional route leg. Pure read.
    fn find(&self, query: &Query) -> Result<HashMap<RouteKey, RouteHistory>, StorageError>;

    fn save_request(&mut self, results: &SearchResults) -> Result<RequestId, StorageError>;

    fn save_awards(&mut self, request_id: RequestId, awards: &[Award]) -> Result<(), StorageError>;

    fn close(&mut self) -> Result<(), StorageError>;
}

/// Same engine/cabin/partners scope, either direction of the query's route.
fn matches_scope(query: &Query, engine: &str, cabin: Cabin, partners: bool) -> bool {
    engine == query.engine && cabin == query.cabin && partners == query.partners
}

fn matches_route(query: &Query, from: &str, to: &str) -> bool {
    (from == query.from_city && to == query.to_city)
        || (from == query.to_city && to == query.from_city)
}

/// Group stored rows by route leg for one query. Shared by every store
/// implementation so redundancy semantics cannot drift between them.
pub(crate) fn build_route_map(
    query: &Query,
    requests: &[StoredRequest],
    awards: &[StoredAward],
) -> HashMap<RouteKey, RouteHistory> {
    let mut map: HashMap<RouteKey, RouteHistory> = HashMap::new();

    for request in requests {
        if !matches_scope(query, &request.engine, request.cabin, request.partners)
            || !matches_route(query, &request.from_city, &request.to_city)
        {
            continue;
        }
        // A round-trip request answers both of its legs.
        let record = RequestRecord {
            quantity: request.quantity,
        };
        map.entry(RouteKey {
            from_city: request.from_city.clone(),
            to_city: request.to_city.clone(),
            date: request.depart_date,
        })
        .or_default()
        .requests
        .push(record);
        if let Some(return_date) = request.return_date {
            map.entry(RouteKey {
                from_city: request.to_city.clone(),
                to_city: request.from_city.clone(),
                date: return_date,
            })
            .or_default()
            .requests
            .push(record);
        }
    }

    for award in awards {
        // Awards are not filtered by the partner flag: a confirmed-empty
        // record answers the leg regardless of which carriers flew it.
        if award.engine != query.engine
            || award.cabin != query.cabin
            || !matches_route(query, &award.from_city, &award.to_city)
        {
            continue;
        }
        map.entry(RouteKey {
            from_city: award.from_city.clone(),
            to_city: award.to_city.clone(),
            date: award.date,
        })
        .or_default()
        .awards
        .push(AwardRecord {
            quantity: award.quantity,
            has_segments: !award.segments.is_empty(),
            fares: award.fares.clone(),
        });
    }

    map
}
