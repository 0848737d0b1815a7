///! Engine abstraction: per-website capability descriptors and the
///! search interface the controller drives
///!
///! An engine knows how to run one date/route query against one travel
///! website and hand back raw assets plus parsed award candidates. The
///! pipeline never depends on how a concrete engine talks to its site.

mod assets;
mod feed;

pub use assets::save_json_asset;
pub use feed::FeedEngine;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use award_common::{AwardCandidate, Query};

use crate::accounts::Credentials;

/// How far from today an engine lets you search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateValidation {
    #[serde(default)]
    pub min_days: i64,
    #[serde(default = "default_max_days")]
    pub max_days: i64,
}

fn default_max_days() -> i64 {
    365
}

impl Default for DateValidation {
    fn default() -> Self {
        Self {
            min_days: 0,
            max_days: default_max_days(),
        }
    }
}

/// One `[engines.<id>]` table from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub name: String,
    pub base_url: String,

    #[serde(default)]
    pub login_required: bool,

    /// Engine searches both legs of a round trip in a single query
    #[serde(default)]
    pub roundtrip_optimized: bool,

    /// Shortest round trip the engine will accept, in days
    #[serde(default = "default_trip_min_days")]
    pub trip_min_days: i64,

    #[serde(default = "default_one_way_supported")]
    pub one_way_supported: bool,

    /// First-party carriers; segments on any other airline make an award
    /// a partner award. Defaults to the engine id itself.
    #[serde(default)]
    pub airlines: Vec<String>,

    #[serde(default)]
    pub validation: DateValidation,
}

fn default_trip_min_days() -> i64 {
    3
}

fn default_one_way_supported() -> bool {
    true
}

/// Resolved capability descriptor for one engine.
#[derive(Debug, Clone)]
pub struct EngineCapabilities {
    pub id: String,
    pub name: String,
    pub login_required: bool,
    pub roundtrip_optimized: bool,
    pub trip_min_days: i64,
    pub one_way_supported: bool,
    pub airlines: Vec<String>,
    pub validation: DateValidation,
}

impl EngineCapabilities {
    pub fn from_settings(id: &str, settings: &EngineSettings) -> Self {
        let airlines = if settings.airlines.is_empty() {
            vec![id.to_string()]
        } else {
            settings.airlines.clone()
        };
        Self {
            id: id.to_string(),
            name: settings.name.clone(),
            login_required: settings.login_required,
            roundtrip_optimized: settings.roundtrip_optimized,
            trip_min_days: settings.trip_min_days,
            one_way_supported: settings.one_way_supported,
            airlines,
            validation: settings.validation.clone(),
        }
    }

    /// Inclusive range of departure dates the engine can search.
    pub fn valid_date_range(&self) -> (NaiveDate, NaiveDate) {
        self.valid_date_range_from(Utc::now().date_naive())
    }

    /// Same, anchored at an explicit "today" so plans are reproducible.
    pub fn valid_date_range_from(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            today + Duration::days(self.validation.min_days),
            today + Duration::days(self.validation.max_days),
        )
    }

    /// Does this engine operate the segment's carrier itself?
    pub fn operates(&self, airline: &str) -> bool {
        self.airlines.iter().any(|a| a == airline)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub credentials: Option<Credentials>,
    pub parse: bool,
    pub headless: bool,
}

/// Outcome of one search. Either the engine hit a recoverable problem
/// (`error` is set), or it collected assets and, when parsing is enabled,
/// an award candidate list. `blocked` marks searches the remote side
/// throttled; the controller backs off before the next query.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub query: Query,
    pub error: Option<String>,
    pub blocked: bool,
    pub awards: Option<Vec<AwardCandidate>>,
}

impl SearchResults {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            error: None,
            blocked: false,
            awards: None,
        }
    }
}

/// A search engine for one travel website.
///
/// `initialize` is called lazily, once per run, before the first real
/// search; a failure there is fatal. A failure inside `search` only skips
/// the query at hand.
#[async_trait]
pub trait Engine: Send {
    fn capabilities(&self) -> &EngineCapabilities;

    async fn initialize(&mut self, options: InitOptions) -> Result<()>;

    async fn search(&mut self, query: &Query) -> Result<SearchResults>;

    async fn close(&mut self) -> Result<()>;
}

/// Ids of all engines the config file declares, sorted for stable output.
pub fn supported(engines: &HashMap<String, EngineSettings>) -> Vec<String> {
    let mut ids: Vec<String> = engines.keys().cloned().collect();
    ids.sort();
    ids
}

/// Build the engine for a website id.
pub fn create(id: &str, settings: &EngineSettings) -> Box<dyn Engine> {
    Box::new(FeedEngine::new(
        EngineCapabilities::from_settings(id, settings),
        settings.base_url.clone(),
    ))
}
