///! Search execution controller
///!
///! Consumes the planner's query sequence in order, one query in flight at
///! a time: redundancy check, lazy engine initialization, search,
///! normalize + dedup + persist, blocked backoff, early termination.
///! Engine and storage are closed on every exit path.

use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;

use award_common::Query;

use crate::accounts::Accounts;
use crate::engine::{Engine, InitOptions};
use crate::module::parser::{dedup_awards, AwardNormalizer};
use crate::storage::Storage;

use super::redundancy;
use super::terminate::TerminationTracker;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub parse: bool,
    pub headless: bool,
    /// Re-run queries even when stored data already answers them
    pub force: bool,
    /// Days without results before the run terminates early; 0 disables
    pub terminate: u32,
    /// Account index for engines that require login
    pub account: usize,
    /// Bounds of the random sleep after the remote side blocks us
    pub backoff_secs: (u64, u64),
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            parse: true,
            headless: false,
            force: false,
            terminate: 0,
            account: 0,
            backoff_secs: (65, 320),
        }
    }
}

/// What happened over a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Queries that reached the engine and produced a result set
    pub executed: u32,
    /// Queries skipped because stored data already answered them
    pub skipped: u32,
    pub requests_saved: u32,
    pub awards_saved: u32,
    pub terminated_early: bool,
}

pub struct SearchController<S: Storage> {
    engine: Box<dyn Engine>,
    storage: S,
    accounts: Accounts,
    options: ControllerOptions,
}

impl<S: Storage> SearchController<S> {
    pub fn new(
        engine: Box<dyn Engine>,
        storage: S,
        accounts: Accounts,
        options: ControllerOptions,
    ) -> Self {
        Self {
            engine,
            storage,
            accounts,
            options,
        }
    }

    /// Drive the plan to completion. Teardown always runs, whether the
    /// loop finished, terminated early, or failed.
    pub async fn run(mut self, queries: Vec<Query>) -> Result<RunReport> {
        let outcome = self.run_queries(&queries).await;

        if let Err(e) = self.engine.close().await {
            tracing::warn!("Failed to close engine: {:#}", e);
        }
        if let Err(e) = self.storage.close() {
            tracing::warn!("Failed to close storage: {:#}", e);
        }

        outcome
    }

    async fn run_queries(&mut self, queries: &[Query]) -> Result<RunReport> {
        let capabilities = self.engine.capabilities().clone();
        let mut report = RunReport::default();
        let mut initialized = false;
        let mut tracker = TerminationTracker::new(self.options.terminate);

        for query in queries {
            // Skip queries the stored data already answers.
            if !self.options.force && redundancy::redundant(&self.storage, query)? {
                report.skipped += 1;
                continue;
            }

            if self.options.parse && tracker.advance(query.depart_date) {
                tracing::info!(
                    "Terminating search after no award inventory found for {} days.",
                    self.options.terminate
                );
                report.terminated_early = true;
                break;
            }

            // Lazy engine setup, once per run. A failure here is fatal.
            if !initialized {
                let credentials = if capabilities.login_required {
                    Some(
                        self.accounts
                            .get_credentials(&capabilities.id, self.options.account)?,
                    )
                } else {
                    None
                };
                self.engine
                    .initialize(InitOptions {
                        credentials,
                        parse: self.options.parse,
                        headless: self.options.headless,
                    })
                    .await
                    .context("Engine initialization failed")?;
                initialized = true;
            }

            match query.return_date {
                Some(return_date) => tracing::info!(
                    "{} -> {} on {} (return {}), {} in {}",
                    query.from_city,
                    query.to_city,
                    query.depart_date,
                    return_date,
                    query.quantity,
                    query.cabin
                ),
                None => tracing::info!(
                    "{} -> {} on {}, {} in {}",
                    query.from_city,
                    query.to_city,
                    query.depart_date,
                    query.quantity,
                    query.cabin
                ),
            }

            // A search failure skips this query and the run continues.
            let results = match self.engine.search(query).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::error!("Unexpected error occurred while searching: {:#}", e);
                    continue;
                }
            };
            if let Some(message) = &results.error {
                tracing::error!("Search failed: {}", message);
                continue;
            }
            report.executed += 1;

            // The request is recorded even when its awards turn out to be
            // malformed; only the award batch is dropped in that case.
            let request_id = self.storage.save_request(&results)?;
            report.requests_saved += 1;

            if let Some(candidates) = results.awards {
                tracker.record_awards(candidates.len());
                let normalizer = AwardNormalizer::new(&capabilities);
                match normalizer.normalize_all(query, candidates) {
                    Ok(awards) => {
                        let awards = dedup_awards(awards);
                        self.storage.save_awards(request_id, &awards)?;
                        report.awards_saved += awards.len() as u32;
                    }
                    Err(e) => {
                        tracing::error!("Discarding malformed award batch: {}", e);
                    }
                }
            }

            if results.blocked {
                self.backoff().await;
            }
        }

        if report.skipped > 0 {
            tracing::info!("Skipped {} queries.", report.skipped);
        }
        Ok(report)
    }

    /// Sleep a uniformly random duration within the configured bounds.
    async fn backoff(&self) {
        let (min, max) = self.options.backoff_secs;
        let delay = rand::thread_rng().gen_range(min..=max.max(min));
        tracing::warn!("Blocked by server, waiting for {}s", delay);
        tokio::time::sleep(Duration::from_secs(delay)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    use award_common::AwardCandidate;

    use crate::engine::{EngineCapabilities, SearchResults};
    use crate::storage::{MemoryStore, Storage};
    use crate::test_support::{raw_candidate, test_caps, test_query};

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Scripted engine: yields a fixed number of award candidates per
    /// departure date, or a failure mode.
    struct ScriptedEngine {
        caps: EngineCapabilities,
        awards_by_date: HashMap<NaiveDate, usize>,
        fail_dates: Vec<NaiveDate>,
        error_marker_dates: Vec<NaiveDate>,
        invalid_dates: Vec<NaiveDate>,
        fail_init: bool,
        initialized: bool,
        closed: Arc<AtomicBool>,
        searches: usize,
    }

    impl ScriptedEngine {
        fn new() -> Self {
            Self {
                caps: test_caps(),
                awards_by_date: HashMap::new(),
                fail_dates: Vec::new(),
                error_marker_dates: Vec::new(),
                invalid_dates: Vec::new(),
                fail_init: false,
                initialized: false,
                closed: Arc::new(AtomicBool::new(false)),
                searches: 0,
            }
        }
    }

    #[async_trait]
    impl Engine for ScriptedEngine {
        fn capabilities(&self) -> &EngineCapabilities {
            &self.caps
        }

        async fn initialize(&mut self, _options: InitOptions) -> Result<()> {
            if self.fail_init {
                bail!("login rejected");
            }
            self.initialized = true;
            Ok(())
        }

        async fn search(&mut self, query: &Query) -> Result<SearchResults> {
            assert!(self.initialized, "search before initialize");
            self.searches += 1;
            if self.fail_dates.contains(&query.depart_date) {
                bail!("connection reset");
            }
            let mut results = SearchResults::new(query.clone());
            if self.error_marker_dates.contains(&query.depart_date) {
                results.error = Some("page layout changed".to_string());
                return Ok(results);
            }
            if self.invalid_dates.contains(&query.depart_date) {
                let mut bad = raw_candidate(query);
                bad.segments[0].airline = "QQQ".to_string();
                results.awards = Some(vec![bad]);
                return Ok(results);
            }
            let count = self
                .awards_by_date
                .get(&query.depart_date)
                .copied()
                .unwrap_or(0);
            let candidates: Vec<AwardCandidate> =
                (0..count).map(|_| raw_candidate(query)).collect();
            results.awards = Some(candidates);
            Ok(results)
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn plan(days: &[&str]) -> Vec<Query> {
        days.iter()
            .map(|d| test_query("SFO", "SIN", d, None, 1))
            .collect()
    }

    fn options(terminate: u32) -> ControllerOptions {
        ControllerOptions {
            terminate,
            backoff_secs: (0, 0),
            ..ControllerOptions::default()
        }
    }

    #[tokio::test]
    async fn test_early_termination_stops_the_run() {
        let engine = ScriptedEngine::new();
        let controller = SearchController::new(
            Box::new(engine),
            MemoryStore::new(),
            Accounts::empty(),
            options(2),
        );
        let queries = plan(&[
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-04",
            "2024-01-05",
        ]);

        let report = controller.run(queries).await.unwrap();
        assert!(report.terminated_early);
        // Three empty dates drain the countdown; the fourth never runs.
        assert_eq!(report.executed, 3);
        assert_eq!(report.awards_saved, 0);
    }

    #[tokio::test]
    async fn test_awards_reset_termination() {
        let mut engine = ScriptedEngine::new();
        engine
            .awards_by_date
            .insert("2024-01-03".parse().unwrap(), 1);
        let controller = SearchController::new(
            Box::new(engine),
            MemoryStore::new(),
            Accounts::empty(),
            options(2),
        );
        let queries = plan(&[
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-04",
            "2024-01-05",
        ]);

        let report = controller.run(queries).await.unwrap();
        // The award on day 3 resets the countdown; the plan completes.
        assert!(!report.terminated_early);
        assert_eq!(report.executed, 5);
        assert_eq!(report.awards_saved, 1);
    }

    #[tokio::test]
    async fn test_redundant_queries_are_skipped() {
        let mut store = MemoryStore::new();
        let prior = test_query("SFO", "SIN", "2024-01-01", None, 1);
        store.save_request(&SearchResults::new(prior)).unwrap();

        let controller = SearchController::new(
            Box::new(ScriptedEngine::new()),
            store,
            Accounts::empty(),
            options(0),
        );
        let queries = plan(&["2024-01-01", "2024-01-02"]);

        let report = controller.run(queries).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.executed, 1);
    }

    #[tokio::test]
    async fn test_force_overrides_redundancy() {
        let mut store = MemoryStore::new();
        let prior = test_query("SFO", "SIN", "2024-01-01", None, 1);
        store.save_request(&SearchResults::new(prior)).unwrap();

        let controller = SearchController::new(
            Box::new(ScriptedEngine::new()),
            store,
            Accounts::empty(),
            ControllerOptions {
                force: true,
                ..options(0)
            },
        );

        let report = controller.run(plan(&["2024-01-01"])).await.unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(report.executed, 1);
    }

    #[tokio::test]
    async fn test_search_failure_skips_query_and_continues() {
        let mut engine = ScriptedEngine::new();
        engine.fail_dates.push("2024-01-01".parse().unwrap());
        engine.error_marker_dates.push("2024-01-02".parse().unwrap());
        let controller = SearchController::new(
            Box::new(engine),
            MemoryStore::new(),
            Accounts::empty(),
            options(0),
        );
        let queries = plan(&["2024-01-01", "2024-01-02", "2024-01-03"]);

        let report = controller.run(queries).await.unwrap();
        // Both failure shapes skip their query without a request row.
        assert_eq!(report.executed, 1);
        assert_eq!(report.requests_saved, 1);
    }

    #[tokio::test]
    async fn test_setup_failure_is_fatal_but_still_tears_down() {
        let mut engine = ScriptedEngine::new();
        engine.fail_init = true;
        let closed = engine.closed.clone();
        let controller = SearchController::new(
            Box::new(engine),
            MemoryStore::new(),
            Accounts::empty(),
            options(0),
        );

        let outcome = controller.run(plan(&["2024-01-01"])).await;
        assert!(outcome.is_err());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_malformed_batch_keeps_request_drops_awards() {
        let mut engine = ScriptedEngine::new();
        engine.invalid_dates.push("2024-01-01".parse().unwrap());
        let mut store = MemoryStore::new();

        // Run through a plain &mut reference so the store can be
        // inspected afterward.
        struct Probe<'a>(&'a mut MemoryStore);
        impl Storage for Probe<'_> {
            fn find(
                &self,
                query: &Query,
            ) -> Result<
                HashMap<award_common::RouteKey, crate::storage::RouteHistory>,
                crate::error::StorageError,
            > {
                self.0.find(query)
            }
            fn save_request(
                &mut self,
                results: &SearchResults,
            ) -> Result<crate::storage::RequestId, crate::error::StorageError> {
                self.0.save_request(results)
            }
            fn save_awards(
                &mut self,
                request_id: crate::storage::RequestId,
                awards: &[award_common::Award],
            ) -> Result<(), crate::error::StorageError> {
                self.0.save_awards(request_id, awards)
            }
            fn close(&mut self) -> Result<(), crate::error::StorageError> {
                Ok(())
            }
        }

        let controller = SearchController::new(
            Box::new(engine),
            Probe(&mut store),
            Accounts::empty(),
            options(0),
        );
        let report = controller.run(plan(&["2024-01-01"])).await.unwrap();

        assert_eq!(report.requests_saved, 1);
        assert_eq!(report.awards_saved, 0);
        assert_eq!(store.requests.len(), 1);
        assert!(store.awards.is_empty());
    }
}
