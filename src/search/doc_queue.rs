//! A binary min-heap of scorers keyed by their current document.
//!
//! The heap key is a cached copy of each scorer's `doc()`. Heapified scorers
//! must only be advanced through [`ScorerDocQueue::top_next_and_adjust_else_pop`]
//! and [`ScorerDocQueue::top_skip_to_and_adjust_else_pop`], which pair every
//! move of the root with the matching heap fix-up (or removal on exhaustion).

use crate::error::{QuorumError, Result};
use crate::search::scorer::Scorer;
use crate::search::{DocId, NO_MORE_DOCS, UNPOSITIONED};

/// A heap entry: the scorer plus its cached current document.
#[derive(Debug)]
struct HeapedScorerDoc {
    scorer: Box<dyn Scorer>,
    doc: DocId,
}

impl HeapedScorerDoc {
    fn new(scorer: Box<dyn Scorer>) -> Self {
        let doc = scorer.doc();
        HeapedScorerDoc { scorer, doc }
    }

    fn refresh_doc(&mut self) {
        self.doc = self.scorer.doc();
    }
}

/// Fixed-capacity min-heap of positioned scorers ordered by current doc.
#[derive(Debug)]
pub struct ScorerDocQueue {
    heap: Vec<HeapedScorerDoc>,
    max_size: usize,
}

impl ScorerDocQueue {
    /// Create a queue holding at most `max_size` scorers.
    pub fn new(max_size: usize) -> Self {
        ScorerDocQueue {
            heap: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Insert a scorer, positioning it with `next()` first if it is unstarted.
    ///
    /// Returns `false` (dropping the scorer) when it has no documents.
    pub fn insert(&mut self, mut scorer: Box<dyn Scorer>) -> Result<bool> {
        if self.heap.len() >= self.max_size {
            return Err(QuorumError::invalid_operation(format!(
                "scorer queue is full ({} entries)",
                self.max_size
            )));
        }

        let positioned = match scorer.doc() {
            UNPOSITIONED => scorer.next()?,
            NO_MORE_DOCS => false,
            _ => true,
        };
        if !positioned {
            return Ok(false);
        }

        self.heap.push(HeapedScorerDoc::new(scorer));
        self.up_heap(self.heap.len() - 1);
        Ok(true)
    }

    /// Number of scorers in the queue.
    pub fn size(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The scorer with the smallest current document.
    pub fn top(&self) -> Option<&dyn Scorer> {
        self.heap.first().map(|entry| entry.scorer.as_ref())
    }

    /// The smallest current document, or [`NO_MORE_DOCS`] when empty.
    pub fn top_doc(&self) -> DocId {
        self.heap.first().map(|entry| entry.doc).unwrap_or(NO_MORE_DOCS)
    }

    /// Score of the root scorer.
    pub fn top_score(&mut self) -> Result<f32> {
        match self.heap.first_mut() {
            Some(entry) => entry.scorer.score(),
            None => Err(QuorumError::invalid_operation("top_score() on an empty queue")),
        }
    }

    /// Remove and return the root scorer without advancing it.
    pub fn pop(&mut self) -> Option<Box<dyn Scorer>> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.down_heap(0);
        }
        Some(entry.scorer)
    }

    /// Advance the root with `next()` and restore heap order, or drop the
    /// root if it is exhausted. Returns `false` if the root was dropped.
    pub fn top_next_and_adjust_else_pop(&mut self) -> Result<bool> {
        let advanced = match self.heap.first_mut() {
            Some(entry) => entry.scorer.next()?,
            None => return Ok(false),
        };
        Ok(self.check_adjust_else_pop(advanced))
    }

    /// Same as [`Self::top_next_and_adjust_else_pop`] using `skip_to(target)`.
    pub fn top_skip_to_and_adjust_else_pop(&mut self, target: DocId) -> Result<bool> {
        let advanced = match self.heap.first_mut() {
            Some(entry) => entry.scorer.skip_to(target)?,
            None => return Ok(false),
        };
        Ok(self.check_adjust_else_pop(advanced))
    }

    fn check_adjust_else_pop(&mut self, advanced: bool) -> bool {
        if advanced {
            self.heap[0].refresh_doc();
            self.down_heap(0);
        } else {
            // Dropping the exhausted scorer releases it.
            self.pop();
        }
        advanced
    }

    fn up_heap(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].doc >= self.heap[parent].doc {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn down_heap(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.heap[right].doc < self.heap[left].doc {
                right
            } else {
                left
            };
            if self.heap[smallest].doc >= self.heap[i].doc {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}
