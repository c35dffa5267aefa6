//! Required scorer with an optional bonus scorer.

use crate::error::Result;
use crate::search::DocId;
use crate::search::scorer::Scorer;

/// Iterates exactly the documents of `req`; when `opt` also matches the
/// current document its score is added on top.
///
/// `opt` is only advanced from `score()`, so documents that are never
/// scored never touch it.
#[derive(Debug)]
pub struct ReqOptSumScorer {
    req: Box<dyn Scorer>,
    opt: Option<Box<dyn Scorer>>,
    first_time_opt: bool,
}

impl ReqOptSumScorer {
    /// Create a scorer over `req` with bonus scores from `opt`.
    pub fn new(req: Box<dyn Scorer>, opt: Box<dyn Scorer>) -> Self {
        ReqOptSumScorer {
            req,
            opt: Some(opt),
            first_time_opt: true,
        }
    }
}

impl Scorer for ReqOptSumScorer {
    fn next(&mut self) -> Result<bool> {
        self.req.next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        self.req.skip_to(target)
    }

    fn doc(&self) -> DocId {
        self.req.doc()
    }

    fn score(&mut self) -> Result<f32> {
        let cur_doc = self.req.doc();
        let req_score = self.req.score()?;

        let Some(opt) = self.opt.as_mut() else {
            return Ok(req_score);
        };
        if (self.first_time_opt || opt.doc() < cur_doc) && !opt.skip_to(cur_doc)? {
            self.first_time_opt = false;
            self.opt = None;
            return Ok(req_score);
        }
        self.first_time_opt = false;

        if opt.doc() == cur_doc {
            Ok(req_score + opt.score()?)
        } else {
            Ok(req_score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::posting::PostingScorer;

    fn boxed(docs: &[DocId], weight: f32) -> Box<dyn Scorer> {
        Box::new(PostingScorer::from_docs(docs, weight))
    }

    fn drain(scorer: &mut ReqOptSumScorer) -> Vec<(DocId, f32)> {
        let mut out = Vec::new();
        while scorer.next().unwrap() {
            out.push((scorer.doc(), scorer.score().unwrap()));
        }
        out
    }

    #[test]
    fn test_req_opt_sum_scorer() {
        let mut scorer = ReqOptSumScorer::new(boxed(&[2, 4, 6], 1.0), boxed(&[4, 5, 6], 1.0));
        assert_eq!(drain(&mut scorer), vec![(2, 1.0), (4, 2.0), (6, 2.0)]);
    }

    #[test]
    fn test_req_opt_sum_scorer_optional_exhausts_first() {
        let mut scorer = ReqOptSumScorer::new(boxed(&[1, 5, 9], 1.0), boxed(&[1], 0.5));
        assert_eq!(drain(&mut scorer), vec![(1, 1.5), (5, 1.0), (9, 1.0)]);
    }

    #[test]
    fn test_req_opt_sum_scorer_scores_are_repeatable() {
        let mut scorer = ReqOptSumScorer::new(boxed(&[3, 7], 1.0), boxed(&[3], 2.0));
        assert!(scorer.next().unwrap());
        assert_eq!(scorer.score().unwrap(), 3.0);
        assert_eq!(scorer.score().unwrap(), 3.0);
        assert!(scorer.skip_to(7).unwrap());
        assert_eq!(scorer.score().unwrap(), 1.0);
    }
}
