///! In-memory store, for tests and dry runs
use std::collections::HashMap;

use award_common::{Award, Query, RouteKey};

use crate::engine::SearchResults;
use crate::error::StorageError;

use super::{
    build_route_map, RequestId, RouteHistory, Storage, StoredAward, StoredRequest,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    next_request_id: RequestId,
    pub requests: Vec<StoredRequest>,
    pub awards: Vec<StoredAward>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_request_id: 1,
            ..Self::default()
        }
    }
}

impl Storage for MemoryStore {
    fn find(&self, query: &Query) -> Result<HashMap<RouteKey, RouteHistory>, StorageError> {
        Ok(build_route_map(query, &self.requests, &self.awards))
    }

    fn save_request(&mut self, results: &SearchResults) -> Result<RequestId, StorageError> {
        let query = &results.query;
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.requests.push(StoredRequest {
            id,
            engine: query.engine.clone(),
            partners: query.partners,
            from_city: query.from_city.clone(),
            to_city: query.to_city.clone(),
            depart_date: query.depart_date,
            return_date: query.return_date,
            cabin: query.cabin,
            quantity: query.quantity,
            received_at: chrono::Utc::now(),
        });
        Ok(id)
    }

    fn save_awards(&mut self, request_id: RequestId, awards: &[Award]) -> Result<(), StorageError> {
        for award in awards {
            self.awards.push(StoredAward::from_award(request_id, award));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
