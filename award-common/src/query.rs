///! Search query emitted by the planner and consumed by an engine
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cabin::Cabin;

/// Destinations for the raw assets an engine saves while searching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAssets {
    pub json: PathBuf,
    pub html: PathBuf,
    pub screenshot: PathBuf,
}

/// A single date/route search against one engine.
///
/// Created by the planner for one run, consumed once by the controller,
/// then discarded. Planning identity is (from_city, to_city, depart_date,
/// return_date); everything else is attached uniformly after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub engine: String,
    pub partners: bool,
    pub from_city: String,
    pub to_city: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub cabin: Cabin,
    pub quantity: u32,
    pub assets: QueryAssets,
}

