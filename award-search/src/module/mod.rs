///! Search pipeline modules
///!
///! Data flow: validated search parameters -> `planner` (ordered query
///! list) -> `search` controller loop (redundancy check, engine search,
///! `parser` normalization and deduplication, storage).

pub mod parser;
pub mod planner;
pub mod search;
