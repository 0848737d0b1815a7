///! Shared data model for the award search pipeline
///!
///! Types that cross crate boundaries: the query a planner emits and an
///! engine consumes, the raw award candidates an engine parses out of a
///! results page, and the validated awards the pipeline persists.

pub mod award;
pub mod cabin;
pub mod query;
pub mod route;

pub use award::{Award, AwardCandidate, Segment, SegmentCandidate};
pub use cabin::Cabin;
pub use query::{Query, QueryAssets};
pub use route::RouteKey;
