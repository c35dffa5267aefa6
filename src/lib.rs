//! # Quorum
//!
//! The boolean query execution core of an embedded full-text search engine.
//!
//! ## Features
//!
//! - Doc-at-a-time conjunction, disjunction and exclusion scorers
//! - Minimum-should-match quorums over optional clauses
//! - Coordination-factor scoring that is stable under repeated `score()` calls
//! - Top-N, counting and exhaustive result collectors
//! - Score explanations for individual documents

pub mod config;
pub mod error;
pub mod search;

pub mod prelude {
    pub use crate::config::BooleanConfig;
    pub use crate::error::{QuorumError, Result};
    pub use crate::search::boolean::{BooleanScorer, Occur};
    pub use crate::search::collector::{AllDocsCollector, Collector, CountCollector, TopDocsCollector};
    pub use crate::search::explanation::Explanation;
    pub use crate::search::posting::{Posting, PostingList, PostingScorer};
    pub use crate::search::scorer::Scorer;
    pub use crate::search::similarity::{ConstantCoord, DefaultSimilarity, Similarity};
    pub use crate::search::weight::{BooleanClause, BooleanWeight, PostingWeight, Weight};
    pub use crate::search::{DocId, SearchHit};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
