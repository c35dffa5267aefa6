//! Coordination functions supplied by the ranking layer.

use std::fmt::Debug;

/// The ranking-layer hook consulted by boolean scoring.
///
/// Only coordination is needed here: per-term statistics are already folded
/// into each leaf scorer's `score()`.
pub trait Similarity: Send + Sync + Debug {
    /// Score multiplier for a document matching `overlap` of `max_overlap`
    /// non-prohibited clauses. Need not be monotonic.
    fn coord(&self, overlap: usize, max_overlap: usize) -> f32;
}

/// Coordination proportional to the fraction of matched clauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSimilarity;

impl Similarity for DefaultSimilarity {
    fn coord(&self, overlap: usize, max_overlap: usize) -> f32 {
        if max_overlap == 0 {
            0.0
        } else {
            overlap as f32 / max_overlap as f32
        }
    }
}

/// Coordination disabled: every document gets a factor of 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantCoord;

impl Similarity for ConstantCoord {
    fn coord(&self, _overlap: usize, _max_overlap: usize) -> f32 {
        1.0
    }
}
