//! Required scorer minus a prohibited (excluded) scorer.

use crate::error::{QuorumError, Result};
use crate::search::DocId;
use crate::search::scorer::Scorer;

/// Yields the documents of `req` that are not in `excl`, with `req`'s scores.
///
/// Both streams advance in lock-step. Once either side is exhausted it is
/// dropped: without an exclusion stream, required documents pass through
/// unchanged.
#[derive(Debug)]
pub struct ReqExclScorer {
    req: Option<Box<dyn Scorer>>,
    excl: Option<Box<dyn Scorer>>,
    first_time: bool,
}

impl ReqExclScorer {
    /// Create a scorer yielding `req` minus `excl`.
    pub fn new(req: Box<dyn Scorer>, excl: Box<dyn Scorer>) -> Self {
        ReqExclScorer {
            req: Some(req),
            excl: Some(excl),
            first_time: true,
        }
    }

    /// Advance `req` from its current document to the first document not
    /// present in `excl`. `req` must be positioned.
    fn to_non_excluded(&mut self) -> Result<bool> {
        let (req, excl) = match (self.req.as_mut(), self.excl.as_mut()) {
            (Some(req), Some(excl)) => (req, excl),
            (req, _) => return Ok(req.is_some()),
        };

        let mut excl_doc = excl.doc();
        loop {
            let req_doc = req.doc();
            if req_doc < excl_doc {
                return Ok(true);
            } else if req_doc > excl_doc {
                if !excl.skip_to(req_doc)? {
                    self.excl = None;
                    return Ok(true);
                }
                excl_doc = excl.doc();
                if excl_doc > req_doc {
                    return Ok(true);
                }
            }
            // req_doc == excl_doc: excluded
            if !req.next()? {
                break;
            }
        }
        self.req = None;
        Ok(false)
    }
}

impl Scorer for ReqExclScorer {
    fn next(&mut self) -> Result<bool> {
        if self.first_time {
            self.first_time = false;
            if let Some(excl) = self.excl.as_mut() {
                if !excl.next()? {
                    self.excl = None;
                }
            }
        }

        let Some(req) = self.req.as_mut() else {
            return Ok(false);
        };
        if !req.next()? {
            self.req = None;
            return Ok(false);
        }
        if self.excl.is_none() {
            return Ok(true);
        }
        self.to_non_excluded()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        if self.first_time {
            self.first_time = false;
            if let Some(excl) = self.excl.as_mut() {
                if !excl.skip_to(target)? {
                    self.excl = None;
                }
            }
        }

        let Some(req) = self.req.as_mut() else {
            return Ok(false);
        };
        if self.excl.is_none() {
            return req.skip_to(target);
        }
        if !req.skip_to(target)? {
            self.req = None;
            return Ok(false);
        }
        self.to_non_excluded()
    }

    fn doc(&self) -> DocId {
        self.req.as_ref().map(|r| r.doc()).unwrap_or(DocId::MAX)
    }

    fn score(&mut self) -> Result<f32> {
        match self.req.as_mut() {
            Some(req) => req.score(),
            None => Err(QuorumError::unsupported("score() on an exhausted scorer")),
        }
    }
}
