//! Doc-at-a-time boolean query execution.
//!
//! Every iterator in this module implements [`Scorer`](scorer::Scorer): a
//! cursor over strictly increasing document ids that can also report a score
//! for the document it is positioned on. The combinators
//! ([`ConjunctionScorer`](conjunction::ConjunctionScorer),
//! [`DisjunctionSumScorer`](disjunction::DisjunctionSumScorer),
//! [`ReqExclScorer`](req_excl::ReqExclScorer),
//! [`ReqOptSumScorer`](req_opt::ReqOptSumScorer)) own their sub-scorers and
//! are wired together by [`BooleanScorer`](boolean::BooleanScorer).

pub mod boolean;
pub mod collector;
pub mod conjunction;
pub mod coordinator;
pub mod disjunction;
pub mod doc_queue;
pub mod explanation;
pub mod non_matching;
pub mod posting;
pub mod req_excl;
pub mod req_opt;
pub mod scorer;
pub mod similarity;
pub mod weight;

use serde::{Deserialize, Serialize};

/// Document identifier. Non-negative while a scorer is positioned.
pub type DocId = i32;

/// Value reported by `doc()` before the first `next()`/`skip_to()`.
pub const UNPOSITIONED: DocId = -1;

/// Value reported by `doc()` on scorers that can never be positioned.
pub const NO_MORE_DOCS: DocId = DocId::MAX;

/// A search hit containing a document id and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document ID.
    pub doc_id: DocId,
    /// The relevance score.
    pub score: f32,
}
