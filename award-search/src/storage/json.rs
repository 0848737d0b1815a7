///! JSON-file backed store
///!
///! The whole database is one JSON document under the data directory,
///! loaded at open and rewritten after every mutation. Runs are strictly
///! sequential with at most one write in flight, so this is safe and keeps
///! the stored data trivially inspectable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use award_common::{Award, Query, RouteKey};

use crate::engine::SearchResults;
use crate::error::StorageError;

use super::{
    build_route_map, RequestId, RouteHistory, Storage, StoredAward, StoredRequest,
};

const DB_FILE: &str = "awards-db.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    next_request_id: RequestId,
    requests: Vec<StoredRequest>,
    awards: Vec<StoredAward>,
}

pub struct JsonStore {
    path: PathBuf,
    state: StoreState,
}

impl JsonStore {
    /// Open (or create) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DB_FILE);
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            StoreState {
                next_request_id: 1,
                ..StoreState::default()
            }
        };
        tracing::debug!(
            "Opened store at {:?}: {} requests, {} awards",
            path,
            state.requests.len(),
            state.awards.len()
        );
        Ok(Self { path, state })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Storage for JsonStore {
    fn find(&self, query: &Query) -> Result<HashMap<RouteKey, RouteHistory>, StorageError> {
        Ok(build_route_map(
            query,
            &self.state.requests,
            &self.state.awards,
        ))
    }

    fn save_request(&mut self, results: &SearchResults) -> Result<RequestId, StorageError> {
        let query = &results.query;
        let id = self.state.next_request_id;
        self.state.next_request_id += 1;
        self.state.requests.push(StoredRequest {
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
        self.flush()?;
        Ok(id)
    }

    fn save_awards(&mut self, request_id: RequestId, awards: &[Award]) -> Result<(), StorageError> {
        for award in awards {
            self.state
                .awards
                .push(StoredAward::from_award(request_id, award));
        }
        self.flush()
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_award, test_query};

    fn temp_data_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "award-search-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_roundtrip() {
        let dir = temp_data_dir("roundtrip");
        let query = test_query("SFO", "SIN", "2024-03-01", None, 1);

        {
            let mut store = JsonStore::open(&dir).unwrap();
            let results = SearchResults::new(query.clone());
            let id = store.save_request(&results).unwrap();
            store.save_awards(id, &[empty_award(&query)]).unwrap();
            store.close().unwrap();
        }

        // Reopen and confirm the history survived the process boundary.
        let store = JsonStore::open(&dir).unwrap();
        let map = store.find(&query).unwrap();
        let history = map.get(&RouteKey::outbound(&query)).unwrap();
        assert_eq!(history.requests.len(), 1);
        assert_eq!(history.requests[0].quantity, 1);
        assert_eq!(history.awards.len(), 1);
        assert!(history.awards[0].confirmed_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_request_ids_monotonic() {
        let dir = temp_data_dir("ids");
        let mut store = JsonStore::open(&dir).unwrap();
        let query = test_query("SFO", "SIN", "2024-03-01", None, 1);
        let a = store.save_request(&SearchResults::new(query.clone())).unwrap();
        let b = store.save_request(&SearchResults::new(query)).unwrap();
        assert!(b > a);
        let _ = fs::remove_dir_all(&dir);
    }
}
