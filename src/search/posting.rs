//! In-memory posting lists.
//!
//! The index layer hands the boolean core one leaf scorer per term. This
//! module provides the in-memory form of that leaf: a sorted list of
//! `(doc_id, weight)` postings with binary-search skipping.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{QuorumError, Result};
use crate::search::scorer::Scorer;
use crate::search::{DocId, UNPOSITIONED};

/// A single posting: a document and the weight the term contributes to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// The document ID.
    pub doc_id: DocId,
    /// The per-document score contribution before boosting.
    pub weight: f32,
}

impl Posting {
    /// Create a new posting.
    pub fn new(doc_id: DocId, weight: f32) -> Self {
        Posting { doc_id, weight }
    }
}

/// An immutable, sorted, duplicate-free posting list.
#[derive(Debug, Clone)]
pub struct PostingList {
    postings: Arc<[Posting]>,
}

impl PostingList {
    /// Build a posting list. Postings are sorted by document and the first
    /// posting wins for duplicate documents.
    pub fn new(mut postings: Vec<Posting>) -> Result<Self> {
        if let Some(bad) = postings.iter().find(|p| p.doc_id < 0) {
            return Err(QuorumError::invalid_argument(format!(
                "negative document id {} in posting list",
                bad.doc_id
            )));
        }

        postings.sort_by_key(|p| p.doc_id);
        postings.dedup_by_key(|p| p.doc_id);

        Ok(PostingList {
            postings: postings.into(),
        })
    }

    /// Build a posting list where every document carries the same weight.
    pub fn from_docs(doc_ids: &[DocId], weight: f32) -> Result<Self> {
        PostingList::new(doc_ids.iter().map(|&d| Posting::new(d, weight)).collect())
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Whether the list has no postings.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Look up the posting for `doc_id`.
    pub fn get(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|idx| &self.postings[idx])
    }

    /// Create an unstarted scorer over this list.
    pub fn scorer(&self, boost: f32) -> PostingScorer {
        PostingScorer {
            postings: Arc::clone(&self.postings),
            boost,
            current_index: 0,
            started: false,
        }
    }
}

/// A leaf scorer over a [`PostingList`].
#[derive(Debug)]
pub struct PostingScorer {
    /// Sorted postings.
    postings: Arc<[Posting]>,
    /// Multiplier applied to every posting weight.
    boost: f32,
    /// Index of the current posting once started.
    current_index: usize,
    /// Whether `next()` or `skip_to()` has been called.
    started: bool,
}

impl PostingScorer {
    /// Convenience constructor for fixtures. Negative ids are dropped.
    pub fn from_docs(doc_ids: &[DocId], weight: f32) -> Self {
        let mut postings: Vec<Posting> = doc_ids
            .iter()
            .filter(|&&d| d >= 0)
            .map(|&d| Posting::new(d, weight))
            .collect();
        postings.sort_by_key(|p| p.doc_id);
        postings.dedup_by_key(|p| p.doc_id);

        PostingScorer {
            postings: postings.into(),
            boost: 1.0,
            current_index: 0,
            started: false,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.started && self.current_index >= self.postings.len()
    }
}

impl Scorer for PostingScorer {
    fn next(&mut self) -> Result<bool> {
        if !self.started {
            self.started = true;
        } else if self.current_index < self.postings.len() {
            self.current_index += 1;
        }
        Ok(!self.is_exhausted())
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        if target < 0 {
            return Err(QuorumError::invalid_argument(format!(
                "skip target must be non-negative, got {target}"
            )));
        }
        self.started = true;
        if self.is_exhausted() {
            return Ok(false);
        }

        // Binary search for the first doc_id >= target
        let remaining = &self.postings[self.current_index..];
        self.current_index += remaining.partition_point(|p| p.doc_id < target);
        Ok(!self.is_exhausted())
    }

    fn doc(&self) -> DocId {
        if !self.started {
            UNPOSITIONED
        } else {
            self.postings
                .get(self.current_index)
                .map(|p| p.doc_id)
                .unwrap_or(DocId::MAX)
        }
    }

    fn score(&mut self) -> Result<f32> {
        if !self.started {
            return Err(QuorumError::unsupported("score() before next()"));
        }
        match self.postings.get(self.current_index) {
            Some(posting) => Ok(posting.weight * self.boost),
            None => Err(QuorumError::unsupported("score() on an exhausted scorer")),
        }
    }
}
