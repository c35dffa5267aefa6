//! Placeholder scorer for compositions that can never match.

use crate::error::{QuorumError, Result};
use crate::search::scorer::Scorer;
use crate::search::{DocId, NO_MORE_DOCS};

/// A scorer that matches no documents.
///
/// Advancing it reports exhaustion immediately. It is never positioned, so
/// asking it for a score is a contract violation.
#[derive(Debug, Default)]
pub struct NonMatchingScorer;

impl NonMatchingScorer {
    /// Create a new non-matching scorer.
    pub fn new() -> Self {
        NonMatchingScorer
    }
}

impl Scorer for NonMatchingScorer {
    fn next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn skip_to(&mut self, _target: DocId) -> Result<bool> {
        Ok(false)
    }

    fn doc(&self) -> DocId {
        NO_MORE_DOCS
    }

    fn score(&mut self) -> Result<f32> {
        Err(QuorumError::unsupported(
            "score() on a scorer that matches no documents",
        ))
    }
}
