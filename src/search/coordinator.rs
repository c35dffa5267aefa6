//! Coordination: counting matched clauses per scored document.
//!
//! The [`Coordinator`] owns the `coord(i, max_coord)` table and a shared
//! [`MatchCounter`]. Every clause-level scorer inside a boolean composition is
//! wrapped in one of the counting decorators below, which add to the counter
//! when they contribute to a document's score. Each decorator counts a
//! document at most once, so repeated `score()` calls on the same document
//! leave the count unchanged.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::error::{QuorumError, Result};
use crate::search::conjunction::ConjunctionScorer;
use crate::search::disjunction::DisjunctionSumScorer;
use crate::search::scorer::Scorer;
use crate::search::similarity::Similarity;
use crate::search::{DocId, UNPOSITIONED};

/// Number of clauses that matched the document being scored.
///
/// Cloning yields another handle to the same count.
#[derive(Debug, Clone, Default)]
pub struct MatchCounter(Arc<AtomicUsize>);

impl MatchCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        MatchCounter::default()
    }

    /// Add `n` matched clauses.
    pub fn add(&self, n: usize) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    /// Current count.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset to zero.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Maps the per-document match count to a coordination multiplier.
#[derive(Debug)]
pub struct Coordinator {
    /// Number of non-prohibited clauses.
    max_coord: usize,
    /// `coord(i, max_coord)` for `i` in `0..=max_coord`; empty until `init`.
    coord_factors: Vec<f32>,
    counter: MatchCounter,
    /// Document the counter currently belongs to.
    current_doc: DocId,
}

impl Coordinator {
    /// Create a coordinator with no clauses.
    pub fn new() -> Self {
        Coordinator {
            max_coord: 0,
            coord_factors: Vec::new(),
            counter: MatchCounter::new(),
            current_doc: UNPOSITIONED,
        }
    }

    /// Register one more non-prohibited clause.
    pub fn add_clause(&mut self) {
        self.max_coord += 1;
    }

    /// Number of non-prohibited clauses.
    pub fn max_coord(&self) -> usize {
        self.max_coord
    }

    /// Whether the coordination table has been computed.
    pub fn is_initialized(&self) -> bool {
        !self.coord_factors.is_empty()
    }

    /// Compute the coordination table. `max_coord` must be final.
    pub fn init(&mut self, similarity: &dyn Similarity) {
        self.coord_factors = (0..=self.max_coord)
            .map(|i| similarity.coord(i, self.max_coord))
            .collect();
        trace!(
            "coordination table for {} clauses: {:?}",
            self.max_coord, self.coord_factors
        );
    }

    /// A handle for counting decorators.
    pub fn counter(&self) -> MatchCounter {
        self.counter.clone()
    }

    /// Prepare to score `doc`. The count restarts only when the document
    /// changes.
    pub fn init_doc(&mut self, doc: DocId) {
        if doc != self.current_doc {
            self.counter.reset();
            self.current_doc = doc;
        }
    }

    /// Number of clauses counted for the current document.
    pub fn nr_matchers(&self) -> usize {
        self.counter.get()
    }

    /// Coordination factor for the current document's match count.
    pub fn coord_factor(&self) -> Result<f32> {
        let nr_matchers = self.counter.get();
        self.coord_factors.get(nr_matchers).copied().ok_or_else(|| {
            QuorumError::internal(format!(
                "{nr_matchers} matchers counted for {} clauses",
                self.max_coord
            ))
        })
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a single clause scorer, counting one match per scored document.
#[derive(Debug)]
pub struct SingleMatchScorer {
    scorer: Box<dyn Scorer>,
    counter: MatchCounter,
    last_scored_doc: DocId,
}

impl SingleMatchScorer {
    pub fn new(scorer: Box<dyn Scorer>, counter: MatchCounter) -> Self {
        SingleMatchScorer {
            scorer,
            counter,
            last_scored_doc: UNPOSITIONED,
        }
    }
}

impl Scorer for SingleMatchScorer {
    fn next(&mut self) -> Result<bool> {
        self.scorer.next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        self.scorer.skip_to(target)
    }

    fn doc(&self) -> DocId {
        self.scorer.doc()
    }

    fn score(&mut self) -> Result<f32> {
        let doc = self.scorer.doc();
        if doc > self.last_scored_doc {
            self.last_scored_doc = doc;
            self.counter.add(1);
        }
        self.scorer.score()
    }
}

/// Conjunction of clause scorers, counting every clause on each match.
#[derive(Debug)]
pub struct CountingConjunctionScorer {
    inner: ConjunctionScorer,
    required_nr_matchers: usize,
    counter: MatchCounter,
    last_scored_doc: DocId,
}

impl CountingConjunctionScorer {
    pub fn new(
        similarity: &dyn Similarity,
        scorers: Vec<Box<dyn Scorer>>,
        counter: MatchCounter,
    ) -> Self {
        let required_nr_matchers = scorers.len();
        CountingConjunctionScorer {
            inner: ConjunctionScorer::new(similarity, scorers),
            required_nr_matchers,
            counter,
            last_scored_doc: UNPOSITIONED,
        }
    }
}

impl Scorer for CountingConjunctionScorer {
    fn next(&mut self) -> Result<bool> {
        self.inner.next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        self.inner.skip_to(target)
    }

    fn doc(&self) -> DocId {
        self.inner.doc()
    }

    fn score(&mut self) -> Result<f32> {
        let doc = self.inner.doc();
        if doc > self.last_scored_doc {
            self.last_scored_doc = doc;
            self.counter.add(self.required_nr_matchers);
        }
        self.inner.score()
    }
}

/// Disjunction of clause scorers, counting the sub-scorers that matched.
#[derive(Debug)]
pub struct CountingDisjunctionScorer {
    inner: DisjunctionSumScorer,
    counter: MatchCounter,
    last_scored_doc: DocId,
}

impl CountingDisjunctionScorer {
    pub fn new(
        scorers: Vec<Box<dyn Scorer>>,
        minimum_nr_matchers: usize,
        counter: MatchCounter,
    ) -> Result<Self> {
        Ok(CountingDisjunctionScorer {
            inner: DisjunctionSumScorer::new(scorers, minimum_nr_matchers)?,
            counter,
            last_scored_doc: UNPOSITIONED,
        })
    }
}

impl Scorer for CountingDisjunctionScorer {
    fn next(&mut self) -> Result<bool> {
        self.inner.next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        self.inner.skip_to(target)
    }

    fn doc(&self) -> DocId {
        self.inner.doc()
    }

    fn score(&mut self) -> Result<f32> {
        let doc = self.inner.doc();
        if doc > self.last_scored_doc {
            self.last_scored_doc = doc;
            self.counter.add(self.inner.nr_matchers());
        }
        self.inner.score()
    }
}
