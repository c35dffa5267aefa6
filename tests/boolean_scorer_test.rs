//! Integration tests for BooleanScorer compositions.

use std::collections::BTreeMap;
use std::sync::Arc;

use quorum::prelude::*;
use quorum::search::conjunction::ConjunctionScorer;
use quorum::search::disjunction::DisjunctionSumScorer;
use quorum::search::req_excl::ReqExclScorer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_DOC: DocId = 200;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn boxed(docs: &[DocId], weight: f32) -> Box<dyn Scorer> {
    Box::new(PostingScorer::from_docs(docs, weight))
}

fn drain(scorer: &mut dyn Scorer) -> Result<Vec<(DocId, f32)>> {
    let mut out = Vec::new();
    while scorer.next()? {
        out.push((scorer.doc(), scorer.score()?));
    }
    Ok(out)
}

fn random_docs(rng: &mut StdRng, density: f64) -> Vec<DocId> {
    (0..MAX_DOC).filter(|_| rng.random_bool(density)).collect()
}

fn boolean_scorer(similarity: Arc<dyn Similarity>, minimum_should_match: usize) -> BooleanScorer {
    BooleanScorer::new(
        similarity,
        BooleanConfig::default().with_minimum_should_match(minimum_should_match),
    )
    .unwrap()
}

#[test]
fn test_single_required_clause() -> Result<()> {
    init_logging();
    let similarity = Arc::new(DefaultSimilarity);
    let mut scorer = boolean_scorer(similarity.clone(), 0);
    scorer.add(boxed(&[1, 3, 5], 1.0), Occur::Must)?;

    let coord = similarity.coord(1, 1);
    assert_eq!(
        drain(&mut scorer)?,
        vec![(1, coord), (3, coord), (5, coord)]
    );
    Ok(())
}

#[test]
fn test_two_optional_clauses() -> Result<()> {
    init_logging();
    let similarity = Arc::new(DefaultSimilarity);
    let mut scorer = boolean_scorer(similarity.clone(), 1);
    scorer.add(boxed(&[1, 2, 3], 1.0), Occur::Should)?;
    scorer.add(boxed(&[2, 3, 4], 1.0), Occur::Should)?;

    let expected = vec![
        (1, 1.0 * similarity.coord(1, 2)),
        (2, 2.0 * similarity.coord(2, 2)),
        (3, 2.0 * similarity.coord(2, 2)),
        (4, 1.0 * similarity.coord(1, 2)),
    ];
    assert_eq!(drain(&mut scorer)?, expected);
    Ok(())
}

#[test]
fn test_required_minus_prohibited() -> Result<()> {
    init_logging();
    let mut scorer = boolean_scorer(Arc::new(DefaultSimilarity), 0);
    scorer.add(boxed(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 1.0), Occur::Must)?;
    scorer.add(boxed(&[5, 6], 1.0), Occur::MustNot)?;

    let docs: Vec<DocId> = drain(&mut scorer)?.into_iter().map(|(d, _)| d).collect();
    assert_eq!(docs, vec![1, 2, 3, 4, 7, 8, 9, 10]);
    Ok(())
}

#[test]
fn test_required_with_optional_bonus() -> Result<()> {
    init_logging();
    let mut scorer = boolean_scorer(Arc::new(DefaultSimilarity), 0);
    scorer.add(boxed(&[2, 4, 6], 1.0), Occur::Must)?;
    scorer.add(boxed(&[4, 5, 6], 1.0), Occur::Should)?;

    let results = drain(&mut scorer)?;
    let docs: Vec<DocId> = results.iter().map(|(d, _)| *d).collect();
    assert_eq!(docs, vec![2, 4, 6]);
    assert!(results[1].1 > results[0].1);
    assert!(results[2].1 > results[0].1);
    assert_eq!(results[1].1, results[2].1);
    Ok(())
}

#[test]
fn test_unreachable_minimum_should_match() -> Result<()> {
    init_logging();
    let mut scorer = boolean_scorer(Arc::new(DefaultSimilarity), 2);
    scorer.add(boxed(&[1], 1.0), Occur::Should)?;

    assert!(drain(&mut scorer)?.is_empty());
    Ok(())
}

#[test]
fn test_score_twice_returns_same_value() -> Result<()> {
    init_logging();
    let mut scorer = boolean_scorer(Arc::new(DefaultSimilarity), 0);
    scorer.add(boxed(&[1, 2, 3, 4], 1.0), Occur::Must)?;
    scorer.add(boxed(&[2, 4], 0.5), Occur::Should)?;
    scorer.add(boxed(&[4], 0.25), Occur::Should)?;
    scorer.add(boxed(&[3], 1.0), Occur::MustNot)?;

    while scorer.next()? {
        let first = scorer.score()?;
        let second = scorer.score()?;
        let third = scorer.score()?;
        assert_eq!(first, second, "doc {}", scorer.doc());
        assert_eq!(second, third, "doc {}", scorer.doc());
    }
    Ok(())
}

#[test]
fn test_score_all_and_score_until() -> Result<()> {
    init_logging();
    let build = || -> Result<BooleanScorer> {
        let mut scorer = boolean_scorer(Arc::new(ConstantCoord), 0);
        scorer.add(boxed(&[1, 3, 5, 7, 9], 1.0), Occur::Should)?;
        scorer.add(boxed(&[2, 3, 8], 1.0), Occur::Should)?;
        Ok(scorer)
    };

    let mut all = AllDocsCollector::new();
    build()?.score_all(&mut all)?;
    assert_eq!(all.doc_ids(), vec![1, 2, 3, 5, 7, 8, 9]);

    let mut scorer = build()?;
    let mut partial = AllDocsCollector::new();
    assert!(scorer.next()?);
    assert!(scorer.score_until(&mut partial, 5)?);
    assert_eq!(partial.doc_ids(), vec![1, 2, 3]);
    assert_eq!(scorer.doc(), 5);
    assert!(!scorer.score_until(&mut partial, MAX_DOC)?);
    assert_eq!(partial.doc_ids(), all.doc_ids());

    let mut top = TopDocsCollector::new(2);
    build()?.score_all(&mut top)?;
    let hits = top.results();
    assert_eq!(hits[0], SearchHit { doc_id: 3, score: 2.0 });
    assert_eq!(hits[1].doc_id, 1);
    assert_eq!(top.total_hits(), 7);
    Ok(())
}

#[test]
fn test_nested_boolean_weights() -> Result<()> {
    init_logging();
    let similarity: Arc<dyn Similarity> = Arc::new(ConstantCoord);

    let mut inner = BooleanWeight::new(similarity.clone(), BooleanConfig::default())?;
    inner.add_should(Box::new(PostingWeight::new(
        "a",
        PostingList::from_docs(&[1, 2, 3], 1.0)?,
    )))?;
    inner.add_should(Box::new(PostingWeight::new(
        "b",
        PostingList::from_docs(&[3, 4], 1.0)?,
    )))?;

    let mut outer = BooleanWeight::new(similarity, BooleanConfig::default())?;
    outer.add_must(Box::new(inner))?;
    outer.add_must_not(Box::new(PostingWeight::new(
        "c",
        PostingList::from_docs(&[2], 1.0)?,
    )))?;

    assert_eq!(outer.description(), "(+(a b) -c)");

    let mut scorer = outer.scorer()?;
    assert_eq!(drain(&mut scorer)?, vec![(1, 1.0), (3, 2.0), (4, 1.0)]);

    let expl = outer.explain(3)?;
    assert!(expl.is_match);
    assert_eq!(expl.value, 2.0);
    assert!(!outer.explain(2)?.is_match);
    Ok(())
}

#[test]
fn test_conjunction_matches_set_intersection() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.random_range(1..=5);
        let lists: Vec<Vec<DocId>> = (0..n).map(|_| random_docs(&mut rng, 0.5)).collect();

        let expected: Vec<DocId> = (0..MAX_DOC)
            .filter(|d| lists.iter().all(|l| l.contains(d)))
            .collect();

        let scorers = lists.iter().map(|l| boxed(l, 1.0)).collect();
        let mut scorer = ConjunctionScorer::new(&DefaultSimilarity, scorers);
        let actual: Vec<DocId> = drain(&mut scorer)?.into_iter().map(|(d, _)| d).collect();
        assert_eq!(actual, expected);
    }
    Ok(())
}

#[test]
fn test_disjunction_matches_quorum_union() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let n = rng.random_range(2..=6);
        let minimum = rng.random_range(1..=n);
        let lists: Vec<Vec<DocId>> = (0..n).map(|_| random_docs(&mut rng, 0.3)).collect();

        // Integral weights keep the sums exact.
        let mut expected = BTreeMap::new();
        for doc in 0..MAX_DOC {
            let matching: Vec<usize> = (0..n).filter(|&i| lists[i].contains(&doc)).collect();
            if matching.len() >= minimum {
                let score: f32 = matching.iter().map(|&i| (i + 1) as f32).sum();
                expected.insert(doc, score);
            }
        }

        let scorers = lists
            .iter()
            .enumerate()
            .map(|(i, l)| boxed(l, (i + 1) as f32))
            .collect();
        let mut scorer = DisjunctionSumScorer::new(scorers, minimum)?;
        let actual: BTreeMap<DocId, f32> = drain(&mut scorer)?.into_iter().collect();
        assert_eq!(actual, expected, "n={n} minimum={minimum}");
    }
    Ok(())
}

#[test]
fn test_exclusion_matches_set_difference() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..50 {
        let required = random_docs(&mut rng, 0.5);
        let prohibited = random_docs(&mut rng, 0.3);

        let expected: Vec<(DocId, f32)> = required
            .iter()
            .filter(|d| !prohibited.contains(d))
            .map(|&d| (d, 1.5))
            .collect();

        let mut scorer = ReqExclScorer::new(boxed(&required, 1.5), boxed(&prohibited, 9.0));
        assert_eq!(drain(&mut scorer)?, expected);
    }
    Ok(())
}

struct RandomQuery {
    required: Vec<Vec<DocId>>,
    optional: Vec<Vec<DocId>>,
    prohibited: Vec<Vec<DocId>>,
    minimum_should_match: usize,
}

impl RandomQuery {
    fn generate(rng: &mut StdRng) -> Self {
        let nr_required = rng.random_range(0..=2);
        let nr_optional = rng.random_range(0..=4);
        let nr_prohibited = rng.random_range(0..=2);
        RandomQuery {
            required: (0..nr_required).map(|_| random_docs(rng, 0.6)).collect(),
            optional: (0..nr_optional).map(|_| random_docs(rng, 0.4)).collect(),
            prohibited: (0..nr_prohibited).map(|_| random_docs(rng, 0.2)).collect(),
            minimum_should_match: rng.random_range(0..=3),
        }
    }

    fn scorer(&self, similarity: Arc<dyn Similarity>) -> Result<BooleanScorer> {
        let mut scorer = boolean_scorer(similarity, self.minimum_should_match);
        for l in &self.required {
            scorer.add(boxed(l, 1.0), Occur::Must)?;
        }
        for (i, l) in self.optional.iter().enumerate() {
            scorer.add(boxed(l, (i + 2) as f32), Occur::Should)?;
        }
        for l in &self.prohibited {
            scorer.add(boxed(l, 1.0), Occur::MustNot)?;
        }
        Ok(scorer)
    }

    fn expected(&self, similarity: &dyn Similarity) -> Vec<(DocId, f32)> {
        let max_coord = self.required.len() + self.optional.len();
        let needed = if self.required.is_empty() {
            self.minimum_should_match.max(1)
        } else {
            self.minimum_should_match
        };

        (0..MAX_DOC)
            .filter_map(|doc| {
                if self.required.iter().any(|l| !l.contains(&doc))
                    || self.prohibited.iter().any(|l| l.contains(&doc))
                {
                    return None;
                }
                let matched: Vec<usize> = (0..self.optional.len())
                    .filter(|&i| self.optional[i].contains(&doc))
                    .collect();
                if matched.len() < needed || max_coord == 0 {
                    return None;
                }
                let sum = self.required.len() as f32
                    + matched.iter().map(|&i| (i + 2) as f32).sum::<f32>();
                let coord = similarity.coord(self.required.len() + matched.len(), max_coord);
                Some((doc, sum * coord))
            })
            .collect()
    }
}

#[test]
fn test_boolean_scorer_matches_reference_model() -> Result<()> {
    init_logging();
    let similarity: Arc<dyn Similarity> = Arc::new(DefaultSimilarity);
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let query = RandomQuery::generate(&mut rng);
        let expected = query.expected(similarity.as_ref());

        let mut scorer = query.scorer(similarity.clone())?;
        let actual = drain(&mut scorer)?;

        assert_eq!(actual.len(), expected.len());
        for ((doc, score), (expected_doc, expected_score)) in actual.iter().zip(&expected) {
            assert_eq!(doc, expected_doc);
            assert!(
                (score - expected_score).abs() < 1e-4,
                "doc {doc}: {score} != {expected_score}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_skip_to_agrees_with_next() -> Result<()> {
    let similarity: Arc<dyn Similarity> = Arc::new(DefaultSimilarity);
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..100 {
        let query = RandomQuery::generate(&mut rng);

        let mut stepping = query.scorer(similarity.clone())?;
        let all = drain(&mut stepping)?;

        let mut skipping = query.scorer(similarity.clone())?;
        let mut target = 0;
        loop {
            target += rng.random_range(1..=20);
            let expected = all.iter().find(|(d, _)| *d >= target);
            let found = skipping.skip_to(target)?;
            match expected {
                Some((doc, score)) => {
                    assert!(found, "skip_to({target}) should reach {doc}");
                    assert_eq!(skipping.doc(), *doc);
                    assert!((skipping.score()? - score).abs() < 1e-4);
                    target = *doc;
                }
                None => {
                    assert!(!found, "skip_to({target}) should be exhausted");
                    break;
                }
            }
        }
    }
    Ok(())
}

/// `skip_to` at or behind the current document leaves the scorer where it is.
fn assert_skip_back_is_noop(scorer: &mut dyn Scorer, expected: &[(DocId, f32)]) -> Result<()> {
    let (first, rest) = expected.split_at(2);
    assert!(scorer.next()?);
    assert!(scorer.next()?);
    let (doc, score) = first[1];
    assert_eq!(scorer.doc(), doc);
    assert_eq!(scorer.score()?, score);

    for target in [0, first[0].0, doc - 1, doc] {
        assert!(scorer.skip_to(target)?, "skip_to({target})");
        assert_eq!(scorer.doc(), doc);
        assert_eq!(scorer.score()?, score);
    }

    for &(doc, score) in rest {
        assert!(scorer.next()?);
        assert_eq!(scorer.doc(), doc);
        assert_eq!(scorer.score()?, score);
    }
    assert!(!scorer.next()?);
    Ok(())
}

#[test]
fn test_skip_to_behind_current_doc() -> Result<()> {
    init_logging();

    let mut conjunction = ConjunctionScorer::new(
        &DefaultSimilarity,
        vec![boxed(&[1, 4, 6, 9], 1.0), boxed(&[4, 6, 9], 1.0)],
    );
    assert_skip_back_is_noop(&mut conjunction, &[(4, 2.0), (6, 2.0), (9, 2.0)])?;

    let mut excl = ReqExclScorer::new(boxed(&[1, 3, 5, 7], 1.0), boxed(&[3, 8], 1.0));
    assert_skip_back_is_noop(&mut excl, &[(1, 1.0), (5, 1.0), (7, 1.0)])?;

    let mut scorer = boolean_scorer(Arc::new(DefaultSimilarity), 0);
    scorer.add(boxed(&[2, 4, 6, 8], 1.0), Occur::Must)?;
    scorer.add(boxed(&[4, 8], 1.0), Occur::Should)?;
    scorer.add(boxed(&[6], 1.0), Occur::MustNot)?;
    assert_skip_back_is_noop(&mut scorer, &[(2, 0.5), (4, 2.0), (8, 2.0)])?;
    assert_eq!(scorer.nr_matchers(), 2);
    Ok(())
}
