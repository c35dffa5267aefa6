//! Boolean scorer: combining MUST, SHOULD and MUST_NOT clause scorers.

use std::fmt;
use std::mem;
use std::sync::Arc;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::BooleanConfig;
use crate::error::{QuorumError, Result};
use crate::search::conjunction::ConjunctionScorer;
use crate::search::coordinator::{
    Coordinator, CountingConjunctionScorer, CountingDisjunctionScorer, SingleMatchScorer,
};
use crate::search::disjunction::DisjunctionSumScorer;
use crate::search::non_matching::NonMatchingScorer;
use crate::search::req_excl::ReqExclScorer;
use crate::search::req_opt::ReqOptSumScorer;
use crate::search::scorer::Scorer;
use crate::search::similarity::{DefaultSimilarity, Similarity};
use crate::search::{DocId, UNPOSITIONED};

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occur::Must => write!(f, "+"),
            Occur::Should => Ok(()),
            Occur::MustNot => write!(f, "-"),
        }
    }
}

/// Scores documents matching a set of required, optional and prohibited
/// clause scorers.
///
/// The composition is chosen once, on the first `next()`, `skip_to()` or
/// `score()`, from the clause counts and `minimum_should_match`:
///
/// - no required clauses: nothing matches unless at least
///   `max(minimum_should_match, 1)` optional clauses exist; exactly that
///   many become a conjunction (or the single clause itself), more become a
///   quorum disjunction.
/// - some required clauses: fewer optional clauses than
///   `minimum_should_match` matches nothing; exactly that many are
///   intersected with the required ones; more are either intersected as a
///   quorum disjunction (`minimum_should_match > 0`) or only add bonus score
///   to the required matches.
///
/// Prohibited clauses are then subtracted from the result. Every document's
/// score is the sum of its matching clauses multiplied by
/// `coord(matched, max_coord)`, where `max_coord` counts required and
/// optional clauses.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use quorum::config::BooleanConfig;
/// use quorum::search::boolean::{BooleanScorer, Occur};
/// use quorum::search::posting::PostingScorer;
/// use quorum::search::scorer::Scorer;
/// use quorum::search::similarity::DefaultSimilarity;
///
/// let mut scorer = BooleanScorer::new(Arc::new(DefaultSimilarity), BooleanConfig::default())?;
/// scorer.add(Box::new(PostingScorer::from_docs(&[1, 2, 3, 4], 1.0)), Occur::Must)?;
/// scorer.add(Box::new(PostingScorer::from_docs(&[3], 1.0)), Occur::MustNot)?;
///
/// let mut docs = Vec::new();
/// while scorer.next()? {
///     docs.push(scorer.doc());
/// }
/// assert_eq!(docs, vec![1, 2, 4]);
/// # Ok::<(), quorum::error::QuorumError>(())
/// ```
#[derive(Debug)]
pub struct BooleanScorer {
    similarity: Arc<dyn Similarity>,
    config: BooleanConfig,
    required: Vec<Box<dyn Scorer>>,
    optional: Vec<Box<dyn Scorer>>,
    prohibited: Vec<Box<dyn Scorer>>,
    coordinator: Coordinator,
    /// The composed scorer tree, built on first use.
    counting_sum_scorer: Option<Box<dyn Scorer>>,
}

impl BooleanScorer {
    /// Create an empty boolean scorer.
    pub fn new(similarity: Arc<dyn Similarity>, config: BooleanConfig) -> Result<Self> {
        config.validate()?;
        Ok(BooleanScorer {
            similarity,
            config,
            required: Vec::new(),
            optional: Vec::new(),
            prohibited: Vec::new(),
            coordinator: Coordinator::new(),
            counting_sum_scorer: None,
        })
    }

    /// Add a clause scorer. Ownership moves into the boolean scorer.
    pub fn add(&mut self, scorer: Box<dyn Scorer>, occur: Occur) -> Result<()> {
        if self.counting_sum_scorer.is_some() {
            return Err(QuorumError::invalid_operation(
                "cannot add clauses once scoring has started",
            ));
        }

        let count = self.clause_count() + 1;
        if count > self.config.max_clause_count {
            warn!(
                "rejecting boolean clause: {} clauses exceed the limit of {}",
                count, self.config.max_clause_count
            );
            return Err(QuorumError::too_many_clauses(
                count,
                self.config.max_clause_count,
            ));
        }

        match occur {
            Occur::Must => {
                self.coordinator.add_clause();
                self.required.push(scorer);
            }
            Occur::Should => {
                self.coordinator.add_clause();
                self.optional.push(scorer);
            }
            Occur::MustNot => self.prohibited.push(scorer),
        }
        Ok(())
    }

    /// Number of clauses added so far.
    pub fn clause_count(&self) -> usize {
        self.required.len() + self.optional.len() + self.prohibited.len()
    }

    /// Number of clauses that count towards coordination.
    pub fn max_coord(&self) -> usize {
        self.coordinator.max_coord()
    }

    /// Number of clauses that matched the most recently scored document.
    pub fn nr_matchers(&self) -> usize {
        self.coordinator.nr_matchers()
    }

    fn counting_sum_scorer(&mut self) -> Result<&mut Box<dyn Scorer>> {
        if self.counting_sum_scorer.is_none() {
            self.coordinator.init(self.similarity.as_ref());
            let scorer = self.make_counting_sum_scorer()?;
            trace!("boolean composition: {:?}", scorer);
            self.counting_sum_scorer = Some(scorer);
        }
        self.counting_sum_scorer
            .as_mut()
            .ok_or_else(|| QuorumError::internal("boolean composition missing"))
    }

    fn make_counting_sum_scorer(&mut self) -> Result<Box<dyn Scorer>> {
        let required = mem::take(&mut self.required);
        let optional = mem::take(&mut self.optional);
        let prohibited = mem::take(&mut self.prohibited);

        debug!(
            "composing boolean scorer: {} required, {} optional, {} prohibited, minimum_should_match {}",
            required.len(),
            optional.len(),
            prohibited.len(),
            self.config.minimum_should_match
        );

        if required.is_empty() {
            self.make_counting_sum_scorer_no_req(optional, prohibited)
        } else {
            self.make_counting_sum_scorer_some_req(required, optional, prohibited)
        }
    }

    fn make_counting_sum_scorer_no_req(
        &self,
        mut optional: Vec<Box<dyn Scorer>>,
        prohibited: Vec<Box<dyn Scorer>>,
    ) -> Result<Box<dyn Scorer>> {
        let nr_opt_required = self.config.minimum_should_match.max(1);
        if optional.len() < nr_opt_required {
            debug!("too few optional clauses, nothing can match");
            return Ok(Box::new(NonMatchingScorer::new()));
        }

        let required_counting_sum_scorer = if optional.len() > nr_opt_required {
            self.counting_disjunction_sum_scorer(optional, nr_opt_required)?
        } else if optional.len() == 1 {
            self.single_match_scorer(optional.pop())
        } else {
            self.counting_conjunction_sum_scorer(optional)
        };
        self.add_prohibited_scorers(required_counting_sum_scorer, prohibited)
    }

    fn make_counting_sum_scorer_some_req(
        &self,
        mut required: Vec<Box<dyn Scorer>>,
        mut optional: Vec<Box<dyn Scorer>>,
        prohibited: Vec<Box<dyn Scorer>>,
    ) -> Result<Box<dyn Scorer>> {
        let minimum = self.config.minimum_should_match;
        if optional.len() < minimum {
            debug!("too few optional clauses, nothing can match");
            return Ok(Box::new(NonMatchingScorer::new()));
        }

        if optional.len() == minimum {
            // Every optional clause is needed: treat them as required.
            required.append(&mut optional);
            let all_required = self.counting_conjunction_sum_scorer(required);
            return self.add_prohibited_scorers(all_required, prohibited);
        }

        let required_counting_sum_scorer = if required.len() == 1 {
            self.single_match_scorer(required.pop())
        } else {
            self.counting_conjunction_sum_scorer(required)
        };

        if minimum > 0 {
            let optional_quorum = self.counting_disjunction_sum_scorer(optional, minimum)?;
            let both = self.dual_conjunction_sum_scorer(required_counting_sum_scorer, optional_quorum);
            self.add_prohibited_scorers(both, prohibited)
        } else {
            let optional_bonus = if optional.len() == 1 {
                self.single_match_scorer(optional.pop())
            } else {
                self.counting_disjunction_sum_scorer(optional, 1)?
            };
            let req = self.add_prohibited_scorers(required_counting_sum_scorer, prohibited)?;
            Ok(Box::new(ReqOptSumScorer::new(req, optional_bonus)))
        }
    }

    fn single_match_scorer(&self, scorer: Option<Box<dyn Scorer>>) -> Box<dyn Scorer> {
        match scorer {
            Some(scorer) => Box::new(SingleMatchScorer::new(scorer, self.coordinator.counter())),
            None => Box::new(NonMatchingScorer::new()),
        }
    }

    fn counting_conjunction_sum_scorer(&self, scorers: Vec<Box<dyn Scorer>>) -> Box<dyn Scorer> {
        Box::new(CountingConjunctionScorer::new(
            &DefaultSimilarity,
            scorers,
            self.coordinator.counter(),
        ))
    }

    fn counting_disjunction_sum_scorer(
        &self,
        scorers: Vec<Box<dyn Scorer>>,
        minimum_nr_matchers: usize,
    ) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(CountingDisjunctionScorer::new(
            scorers,
            minimum_nr_matchers,
            self.coordinator.counter(),
        )?))
    }

    fn dual_conjunction_sum_scorer(
        &self,
        req1: Box<dyn Scorer>,
        req2: Box<dyn Scorer>,
    ) -> Box<dyn Scorer> {
        // The operands count their own clauses.
        Box::new(ConjunctionScorer::new(&DefaultSimilarity, vec![req1, req2]))
    }

    fn add_prohibited_scorers(
        &self,
        required_counting_sum_scorer: Box<dyn Scorer>,
        mut prohibited: Vec<Box<dyn Scorer>>,
    ) -> Result<Box<dyn Scorer>> {
        let excluded: Box<dyn Scorer> = match prohibited.len() {
            0 => return Ok(required_counting_sum_scorer),
            1 => match prohibited.pop() {
                Some(scorer) => scorer,
                None => return Ok(required_counting_sum_scorer),
            },
            _ => Box::new(DisjunctionSumScorer::any(prohibited)?),
        };
        Ok(Box::new(ReqExclScorer::new(
            required_counting_sum_scorer,
            excluded,
        )))
    }
}

impl Scorer for BooleanScorer {
    fn next(&mut self) -> Result<bool> {
        self.counting_sum_scorer()?.next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        if target < 0 {
            return Err(QuorumError::invalid_argument(format!(
                "skip target must be non-negative, got {target}"
            )));
        }
        self.counting_sum_scorer()?.skip_to(target)
    }

    fn doc(&self) -> DocId {
        self.counting_sum_scorer
            .as_ref()
            .map(|s| s.doc())
            .unwrap_or(UNPOSITIONED)
    }

    fn score(&mut self) -> Result<f32> {
        self.counting_sum_scorer()?;
        let Some(scorer) = self.counting_sum_scorer.as_mut() else {
            return Err(QuorumError::internal("boolean composition missing"));
        };
        self.coordinator.init_doc(scorer.doc());
        let sum = scorer.score()?;
        Ok(sum * self.coordinator.coord_factor()?)
    }
}
