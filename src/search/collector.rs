//! Sinks for the `(doc, score)` pairs a scorer produces.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use crate::error::Result;
use crate::search::{DocId, SearchHit};

/// Receives matches from [`Scorer::score_all`](crate::search::scorer::Scorer::score_all)
/// and [`Scorer::score_until`](crate::search::scorer::Scorer::score_until),
/// in increasing document order.
pub trait Collector: Send + Debug {
    /// Accept one matching document.
    fn collect(&mut self, doc_id: DocId, score: f32) -> Result<()>;

    /// Number of documents collected so far.
    fn total_hits(&self) -> u64;

    /// Forget everything collected.
    fn reset(&mut self);
}

/// Keeps the `max_docs` best-scoring documents.
#[derive(Debug)]
pub struct TopDocsCollector {
    max_docs: usize,
    /// Min-heap: the root is the hit evicted next.
    hits: BinaryHeap<ScoredDoc>,
    total_hits: u64,
}

#[derive(Debug, Clone, Copy)]
struct ScoredDoc {
    doc_id: DocId,
    score: f32,
}

impl PartialEq for ScoredDoc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Worse hits compare greater, so the heap root is evicted next.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl TopDocsCollector {
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs),
            total_hits: 0,
        }
    }

    /// The kept hits, best score first, ties broken by ascending document.
    pub fn results(&self) -> Vec<SearchHit> {
        let mut kept: Vec<ScoredDoc> = self.hits.iter().copied().collect();
        kept.sort();
        kept.into_iter()
            .map(|d| SearchHit {
                doc_id: d.doc_id,
                score: d.score,
            })
            .collect()
    }
}

impl Collector for TopDocsCollector {
    fn collect(&mut self, doc_id: DocId, score: f32) -> Result<()> {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return Ok(());
        }

        if self.hits.len() < self.max_docs {
            self.hits.push(ScoredDoc { doc_id, score });
        } else if let Some(mut worst) = self.hits.peek_mut() {
            // Equal scores keep the earlier document.
            if score > worst.score {
                *worst = ScoredDoc { doc_id, score };
            }
        }
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.total_hits
    }

    fn reset(&mut self) {
        self.hits.clear();
        self.total_hits = 0;
    }
}

/// Counts matches without keeping them.
#[derive(Debug, Default)]
pub struct CountCollector {
    count: u64,
}

impl CountCollector {
    pub fn new() -> Self {
        CountCollector::default()
    }
}

impl Collector for CountCollector {
    fn collect(&mut self, _doc_id: DocId, _score: f32) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.count
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Keeps every match in collection (document) order.
#[derive(Debug, Default)]
pub struct AllDocsCollector {
    hits: Vec<SearchHit>,
}

impl AllDocsCollector {
    pub fn new() -> Self {
        AllDocsCollector::default()
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|hit| hit.doc_id).collect()
    }
}

impl Collector for AllDocsCollector {
    fn collect(&mut self, doc_id: DocId, score: f32) -> Result<()> {
        self.hits.push(SearchHit { doc_id, score });
        Ok(())
    }

    fn total_hits(&self) -> u64 {
        self.hits.len() as u64
    }

    fn reset(&mut self) {
        self.hits.clear();
    }
}
