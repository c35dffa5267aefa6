//! Weights: per-query factories for scorers and score explanations.
//!
//! A [`Weight`] is what a query compiles to. It produces the scorer tree for
//! execution and, separately, can explain the score of one known document by
//! walking its clauses again rather than replaying live scorer state.

use std::fmt::Debug;
use std::sync::Arc;

use log::warn;

use crate::config::BooleanConfig;
use crate::error::{QuorumError, Result};
use crate::search::DocId;
use crate::search::boolean::{BooleanScorer, Occur};
use crate::search::explanation::Explanation;
use crate::search::posting::PostingList;
use crate::search::scorer::Scorer;
use crate::search::similarity::Similarity;

/// A compiled query.
pub trait Weight: Send + Sync + Debug {
    /// Create a fresh, unstarted scorer.
    fn scorer(&self) -> Result<Box<dyn Scorer>>;

    /// Explain the score of `doc`.
    fn explain(&self, doc: DocId) -> Result<Explanation>;

    /// Get a human-readable description of this weight.
    fn description(&self) -> String;
}

/// Weight of a single posting list, e.g. one term in one field.
#[derive(Debug, Clone)]
pub struct PostingWeight {
    name: String,
    postings: PostingList,
    boost: f32,
}

impl PostingWeight {
    /// Create a weight named `name` over `postings`.
    pub fn new<S: Into<String>>(name: S, postings: PostingList) -> Self {
        PostingWeight {
            name: name.into(),
            postings,
            boost: 1.0,
        }
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

impl Weight for PostingWeight {
    fn scorer(&self) -> Result<Box<dyn Scorer>> {
        Ok(Box::new(self.postings.scorer(self.boost)))
    }

    fn explain(&self, doc: DocId) -> Result<Explanation> {
        let Some(posting) = self.postings.get(doc) else {
            return Ok(Explanation::no_match(format!(
                "no matching posting for {} in {}",
                self.name, doc
            )));
        };

        // A posting matches even when its weight or the boost is zero.
        let value = posting.weight * self.boost;
        if self.boost == 1.0 {
            return Ok(Explanation::with_match(
                true,
                value,
                format!("weight({} in {})", self.name, doc),
            ));
        }
        Ok(Explanation::with_match(
            true,
            value,
            format!("weight({} in {}), product of:", self.name, doc),
        )
        .detail(Explanation::with_match(
            true,
            posting.weight,
            "posting weight",
        ))
        .detail(Explanation::with_match(true, self.boost, "boost")))
    }

    fn description(&self) -> String {
        if self.boost == 1.0 {
            self.name.clone()
        } else {
            format!("{}^{}", self.name, self.boost)
        }
    }
}

/// A clause in a boolean weight.
#[derive(Debug)]
pub struct BooleanClause {
    /// The weight for this clause.
    pub weight: Box<dyn Weight>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(weight: Box<dyn Weight>, occur: Occur) -> Self {
        BooleanClause { weight, occur }
    }
}

/// Weight combining clause weights with boolean logic.
#[derive(Debug)]
pub struct BooleanWeight {
    clauses: Vec<BooleanClause>,
    similarity: Arc<dyn Similarity>,
    config: BooleanConfig,
}

impl BooleanWeight {
    /// Create an empty boolean weight.
    pub fn new(similarity: Arc<dyn Similarity>, config: BooleanConfig) -> Result<Self> {
        config.validate()?;
        Ok(BooleanWeight {
            clauses: Vec::new(),
            similarity,
            config,
        })
    }

    /// Add a clause, enforcing the configured clause limit.
    pub fn add_clause(&mut self, clause: BooleanClause) -> Result<()> {
        let count = self.clauses.len() + 1;
        if count > self.config.max_clause_count {
            warn!(
                "rejecting boolean clause {}: limit is {}",
                clause.weight.description(),
                self.config.max_clause_count
            );
            return Err(QuorumError::too_many_clauses(
                count,
                self.config.max_clause_count,
            ));
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, weight: Box<dyn Weight>) -> Result<()> {
        self.add_clause(BooleanClause::new(weight, Occur::Must))
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, weight: Box<dyn Weight>) -> Result<()> {
        self.add_clause(BooleanClause::new(weight, Occur::Should))
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, weight: Box<dyn Weight>) -> Result<()> {
        self.add_clause(BooleanClause::new(weight, Occur::MustNot))
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Minimum number of SHOULD clauses that must match.
    pub fn minimum_should_match(&self) -> usize {
        self.config.minimum_should_match
    }
}

impl Weight for BooleanWeight {
    fn scorer(&self) -> Result<Box<dyn Scorer>> {
        let mut scorer = BooleanScorer::new(Arc::clone(&self.similarity), self.config.clone())?;
        for clause in &self.clauses {
            scorer.add(clause.weight.scorer()?, clause.occur)?;
        }
        Ok(Box::new(scorer))
    }

    fn explain(&self, doc: DocId) -> Result<Explanation> {
        let minimum_should_match = self.config.minimum_should_match;
        let mut sum_expl = Explanation::new(0.0, "sum of:");
        let mut coord = 0;
        let mut max_coord = 0;
        let mut sum = 0.0;
        let mut fail = false;
        let mut should_match_count = 0;

        for clause in &self.clauses {
            let expl = clause.weight.explain(doc)?;
            if clause.occur != Occur::MustNot {
                max_coord += 1;
            }

            if expl.is_match {
                if clause.occur != Occur::MustNot {
                    sum += expl.value;
                    coord += 1;
                    sum_expl.add_detail(expl);
                } else {
                    let description = format!(
                        "match on prohibited clause ({})",
                        clause.weight.description()
                    );
                    sum_expl.add_detail(Explanation::new(0.0, description).detail(expl));
                    fail = true;
                }
                if clause.occur == Occur::Should {
                    should_match_count += 1;
                }
            } else if clause.occur == Occur::Must {
                let description = format!(
                    "no match on required clause ({})",
                    clause.weight.description()
                );
                sum_expl.add_detail(Explanation::new(0.0, description).detail(expl));
                fail = true;
            }
        }

        if fail {
            sum_expl.is_match = false;
            sum_expl.value = 0.0;
            sum_expl.description =
                "Failure to meet condition(s) of required/prohibited clause(s)".to_string();
            return Ok(sum_expl);
        }
        if should_match_count < minimum_should_match {
            sum_expl.is_match = false;
            sum_expl.value = 0.0;
            sum_expl.description = format!(
                "Failure to match minimum number of optional clauses: {minimum_should_match}"
            );
            return Ok(sum_expl);
        }

        sum_expl.is_match = coord > 0;
        sum_expl.value = sum;

        let coord_factor = self.similarity.coord(coord, max_coord);
        if coord_factor == 1.0 {
            return Ok(sum_expl);
        }

        let is_match = sum_expl.is_match;
        Ok(
            Explanation::with_match(is_match, sum * coord_factor, "product of:")
                .detail(sum_expl)
                .detail(Explanation::new(
                    coord_factor,
                    format!("coord({coord}/{max_coord})"),
                )),
        )
    }

    fn description(&self) -> String {
        let clauses: Vec<String> = self
            .clauses
            .iter()
            .map(|c| format!("{}{}", c.occur, c.weight.description()))
            .collect();
        let minimum_should_match = self.config.minimum_should_match;
        if minimum_should_match > 0 {
            format!("({})~{}", clauses.join(" "), minimum_should_match)
        } else {
            format!("({})", clauses.join(" "))
        }
    }
}
