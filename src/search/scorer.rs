//! The scorer contract shared by posting lists and every combinator.

use std::fmt::Debug;

use crate::error::Result;
use crate::search::DocId;
use crate::search::collector::Collector;

/// A doc-at-a-time cursor over matching documents.
///
/// A scorer is *unstarted* until the first `next()`/`skip_to()`, then
/// *positioned* while those calls return `true`, and *exhausted* after one of
/// them returns `false`. Only `doc()` and `score()` of a positioned scorer are
/// meaningful, and no advance may be issued once exhausted. Successive
/// positions are strictly increasing.
pub trait Scorer: Send + Debug {
    /// Move to the next matching document. Returns `false` when exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Move to the first matching document >= `target`.
    ///
    /// When already positioned on a document >= `target` this is a no-op
    /// returning `true`.
    fn skip_to(&mut self, target: DocId) -> Result<bool>;

    /// The current document id.
    fn doc(&self) -> DocId;

    /// The score of the current document.
    fn score(&mut self) -> Result<f32>;

    /// Drain this scorer, passing every match to `collector`.
    fn score_all(&mut self, collector: &mut dyn Collector) -> Result<()> {
        while self.next()? {
            let doc = self.doc();
            let score = self.score()?;
            collector.collect(doc, score)?;
        }
        Ok(())
    }

    /// Collect matches while `doc() < max_doc`.
    ///
    /// `next()` must have returned `true` once before the first call.
    ///
    /// The returned flag means *more may remain*, not *exhausted*:
    /// `Ok(true)` leaves the scorer positioned on its first document
    /// `>= max_doc` (uncollected), `Ok(false)` means the scorer ran out.
    fn score_until(&mut self, collector: &mut dyn Collector, max_doc: DocId) -> Result<bool> {
        while self.doc() < max_doc {
            let doc = self.doc();
            let score = self.score()?;
            collector.collect(doc, score)?;
            if !self.next()? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Scorer for Box<dyn Scorer> {
    #[inline]
    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    #[inline]
    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        (**self).skip_to(target)
    }

    #[inline]
    fn doc(&self) -> DocId {
        (**self).doc()
    }

    #[inline]
    fn score(&mut self) -> Result<f32> {
        (**self).score()
    }

    fn score_all(&mut self, collector: &mut dyn Collector) -> Result<()> {
        (**self).score_all(collector)
    }

    fn score_until(&mut self, collector: &mut dyn Collector, max_doc: DocId) -> Result<bool> {
        (**self).score_until(collector, max_doc)
    }
}
