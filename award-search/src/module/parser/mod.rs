///! Award normalization and deduplication
///!
///! Engines hand back raw award candidates scraped from a results page.
///! `normalize` validates each record fail-closed and fills every derived
///! field; `dedup` collapses records that describe the same bookable
///! itinerary under different fare codes.

mod dedup;
mod normalize;
mod validate;

pub use dedup::dedup_awards;
pub use normalize::AwardNormalizer;
