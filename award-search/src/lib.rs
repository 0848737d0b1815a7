///! Award inventory search pipeline
///!
///! Turns a date range and route into a minimal ordered query plan, skips
///! queries already answered by stored data, and drives an engine through
///! the rest: normalize, deduplicate, persist, back off when blocked,
///! terminate early when days stay empty.

pub mod accounts;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod module;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
