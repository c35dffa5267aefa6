//! Conjunction (AND) of scorers.

use std::collections::VecDeque;

use crate::error::Result;
use crate::search::scorer::Scorer;
use crate::search::similarity::Similarity;
use crate::search::{DocId, UNPOSITIONED};

/// Matches documents present in every sub-scorer.
///
/// The sub-scorers are kept ordered by current document. Each round skips
/// the minimum to the maximum and rotates it to the back, until the first
/// and last agree on a document or some sub-scorer runs out.
#[derive(Debug)]
pub struct ConjunctionScorer {
    /// Sub-scorers, ascending by current document once initialized.
    scorers: VecDeque<Box<dyn Scorer>>,
    /// Whether no advance has been issued yet.
    first_time: bool,
    /// Whether more matches may follow.
    more: bool,
    /// `coord(n, n)` for the number of sub-scorers.
    coord: f32,
}

impl ConjunctionScorer {
    /// Create a conjunction over `scorers`, taking ownership of them.
    pub fn new(similarity: &dyn Similarity, scorers: Vec<Box<dyn Scorer>>) -> Self {
        let n = scorers.len();
        ConjunctionScorer {
            scorers: scorers.into(),
            first_time: true,
            more: n > 0,
            coord: similarity.coord(n, n),
        }
    }

    /// Number of sub-scorers.
    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    /// Whether there are no sub-scorers (which never matches).
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    fn first_doc(&self) -> DocId {
        self.scorers.front().map(|s| s.doc()).unwrap_or(UNPOSITIONED)
    }

    fn last_doc(&self) -> DocId {
        self.scorers.back().map(|s| s.doc()).unwrap_or(UNPOSITIONED)
    }

    fn init(&mut self) -> Result<()> {
        self.first_time = false;
        self.more = !self.scorers.is_empty();
        for scorer in self.scorers.iter_mut() {
            if !self.more {
                break;
            }
            self.more = scorer.next()?;
        }
        if self.more {
            self.sort_scorers();
        }
        Ok(())
    }

    fn sort_scorers(&mut self) {
        self.scorers.make_contiguous().sort_by_key(|s| s.doc());
    }

    fn do_next(&mut self) -> Result<bool> {
        while self.more && self.first_doc() < self.last_doc() {
            let target = self.last_doc();
            if let Some(mut first) = self.scorers.pop_front() {
                self.more = first.skip_to(target)?;
                self.scorers.push_back(first);
            }
        }
        Ok(self.more)
    }
}

impl Scorer for ConjunctionScorer {
    fn next(&mut self) -> Result<bool> {
        if self.first_time {
            self.init()?;
        } else if self.more {
            // The back of the list holds the current match.
            if let Some(last) = self.scorers.back_mut() {
                self.more = last.next()?;
            }
        }
        self.do_next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        if self.first_time {
            self.init()?;
        }
        for scorer in self.scorers.iter_mut() {
            if !self.more {
                break;
            }
            self.more = scorer.skip_to(target)?;
        }
        if self.more {
            self.sort_scorers();
        }
        self.do_next()
    }

    fn doc(&self) -> DocId {
        self.first_doc()
    }

    fn score(&mut self) -> Result<f32> {
        let mut sum = 0.0;
        for scorer in self.scorers.iter_mut() {
            sum += scorer.score()?;
        }
        Ok(sum * self.coord)
    }
}
