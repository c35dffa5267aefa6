//! Disjunction (OR) of scorers with a minimum-match quorum.

use crate::error::{QuorumError, Result};
use crate::search::doc_queue::ScorerDocQueue;
use crate::search::scorer::Scorer;
use crate::search::{DocId, UNPOSITIONED};

/// Matches documents present in at least `minimum_nr_matchers` of its
/// sub-scorers, scoring each match with the sum of the sub-scorers that
/// contain it.
///
/// No coordination factor is applied here; [`nr_matchers`](Self::nr_matchers)
/// exposes the match count for the boolean coordinator.
#[derive(Debug)]
pub struct DisjunctionSumScorer {
    /// Sub-scorers waiting to be queued on the first advance.
    sub_scorers: Vec<Box<dyn Scorer>>,
    /// Number of sub-scorers the scorer was built with.
    nr_scorers: usize,
    /// Minimum number of sub-scorers that must match a document.
    minimum_nr_matchers: usize,
    /// Heap of positioned sub-scorers, built lazily.
    queue: Option<ScorerDocQueue>,
    /// Live entries in `queue`.
    queue_size: usize,
    current_doc: DocId,
    current_score: f32,
    /// Number of sub-scorers matching `current_doc`.
    nr_matchers: usize,
}

impl DisjunctionSumScorer {
    /// Create a disjunction over at least two scorers.
    pub fn new(sub_scorers: Vec<Box<dyn Scorer>>, minimum_nr_matchers: usize) -> Result<Self> {
        let nr_scorers = sub_scorers.len();
        if minimum_nr_matchers == 0 {
            return Err(QuorumError::invalid_argument(
                "minimum number of matchers must be at least 1",
            ));
        }
        if nr_scorers <= 1 {
            return Err(QuorumError::invalid_argument(format!(
                "a disjunction needs at least 2 sub-scorers, got {nr_scorers}"
            )));
        }

        Ok(DisjunctionSumScorer {
            sub_scorers,
            nr_scorers,
            minimum_nr_matchers,
            queue: None,
            queue_size: 0,
            current_doc: UNPOSITIONED,
            current_score: 0.0,
            nr_matchers: 0,
        })
    }

    /// Create a plain disjunction: any one sub-scorer suffices.
    pub fn any(sub_scorers: Vec<Box<dyn Scorer>>) -> Result<Self> {
        DisjunctionSumScorer::new(sub_scorers, 1)
    }

    /// Number of sub-scorers matching the current document.
    pub fn nr_matchers(&self) -> usize {
        self.nr_matchers
    }

    fn init_queue(&mut self) -> Result<()> {
        let mut queue = ScorerDocQueue::new(self.nr_scorers);
        self.queue_size = 0;
        for scorer in self.sub_scorers.drain(..) {
            if queue.insert(scorer)? {
                self.queue_size += 1;
            }
        }
        self.queue = Some(queue);
        Ok(())
    }

    /// Take the queue root as the candidate document, pull every sub-scorer
    /// on that document past it, and repeat until a candidate meets the
    /// quorum or too few sub-scorers remain.
    fn advance_after_current(&mut self) -> Result<bool> {
        let Some(queue) = self.queue.as_mut() else {
            return Ok(false);
        };

        loop {
            self.current_doc = queue.top_doc();
            self.current_score = queue.top_score()?;
            self.nr_matchers = 1;

            loop {
                if !queue.top_next_and_adjust_else_pop()? {
                    self.queue_size -= 1;
                    if self.queue_size == 0 {
                        break;
                    }
                }
                if queue.top_doc() != self.current_doc {
                    break;
                }
                self.current_score += queue.top_score()?;
                self.nr_matchers += 1;
            }

            if self.nr_matchers >= self.minimum_nr_matchers {
                return Ok(true);
            } else if self.queue_size < self.minimum_nr_matchers {
                return Ok(false);
            }
        }
    }
}

impl Scorer for DisjunctionSumScorer {
    fn next(&mut self) -> Result<bool> {
        if self.queue.is_none() {
            self.init_queue()?;
        }
        if self.queue_size < self.minimum_nr_matchers {
            return Ok(false);
        }
        self.advance_after_current()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        if self.queue.is_none() {
            self.init_queue()?;
        }
        if self.queue_size < self.minimum_nr_matchers {
            return Ok(false);
        }
        if target <= self.current_doc {
            return Ok(true);
        }

        loop {
            let Some(queue) = self.queue.as_mut() else {
                return Ok(false);
            };
            if queue.top_doc() >= target {
                return self.advance_after_current();
            }
            if !queue.top_skip_to_and_adjust_else_pop(target)? {
                self.queue_size -= 1;
                if self.queue_size < self.minimum_nr_matchers {
                    return Ok(false);
                }
            }
        }
    }

    fn doc(&self) -> DocId {
        self.current_doc
    }

    fn score(&mut self) -> Result<f32> {
        Ok(self.current_score)
    }
}
