pub mod movie;
pub mod recommendation;

pub use movie::{MovieRecord, RawMovie};
pub use recommendation::{NoMatches, QueryResult, RecommendOutcome, Strategy};
