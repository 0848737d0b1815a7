///! Route keys for grouping prior requests and awards
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::Query;

/// Grouping key for one directional leg on one date. The engine, cabin and
/// partners dimensions are fixed by the `Storage::find` call that produced
/// the map, so they are not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub from_city: String,
    pub to_city: String,
    pub date: NaiveDate,
}

impl RouteKey {
    /// Key for the query's outbound leg.
    pub fn outbound(query: &Query) -> Self {
        Self {
            from_city: query.from_city.clone(),
            to_city: query.to_city.clone(),
            date: query.depart_date,
        }
    }

    /// Key for the query's inbound leg, when the query is a round trip.
    pub fn inbound(query: &Query) -> Option<Self> {
        query.return_date.map(|date| Self {
            from_city: query.to_city.clone(),
            to_city: query.from_city.clone(),
            date,
        })
    }
}
