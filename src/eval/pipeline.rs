//! End-to-end evaluation: pool -> metric -> scoreboard
//!
//! One call scores every method at every requested depth against a pool
//! rebuilt from scratch, then merges the results into the session's
//! scoreboard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::eval::metrics::ndcg_at_k;
use crate::eval::pool::RelevancePool;
use crate::eval::scoreboard::Scoreboard;
use crate::types::MethodResults;

/// Default cutoff depths evaluated per query
pub const DEFAULT_DEPTHS: [usize; 3] = [1, 2, 3];

/// Scores produced by one evaluation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// depth -> method -> score
    pub scores: BTreeMap<usize, BTreeMap<String, f64>>,
    /// Unique documents across all methods, for annotation-coverage reporting
    pub unique_document_count: usize,
}

impl EvaluationReport {
    pub fn score(&self, method: &str, depth: usize) -> Option<f64> {
        self.scores.get(&depth).and_then(|m| m.get(method)).copied()
    }
}

/// Score every method at every depth and merge into the scoreboard
///
/// The ranked input per method is its own top-k combined grades in native
/// rank order; the pool is shared by all methods. The calculator runs once
/// per (method, depth) pair because each method's ranking differs even
/// though the ideal reference is common.
pub fn evaluate_methods(
    methods: &[MethodResults],
    depths: &[usize],
    scoreboard: &mut Scoreboard,
) -> EvaluationReport {
    let pool = RelevancePool::build(methods);
    debug!(
        unique_documents = pool.unique_document_count(),
        methods = methods.len(),
        "built relevance pool"
    );

    let mut scores: BTreeMap<usize, BTreeMap<String, f64>> = BTreeMap::new();

    for &depth in depths {
        let at_depth = scores.entry(depth).or_default();
        for results in methods {
            let ranked = results.top_k_grades(depth);
            let score = ndcg_at_k(&ranked, depth, pool.grades());
            at_depth.insert(results.method.clone(), score);
            scoreboard.record(&results.method, depth, score);
        }
    }

    EvaluationReport {
        scores,
        unique_document_count: pool.unique_document_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentJudgment, RetrievedDocument};

    fn judgment(title: &str, relevance: u32, completeness: u32) -> DocumentJudgment {
        DocumentJudgment::new(
            RetrievedDocument {
                title: title.to_string(),
                content: format!("content of {title}"),
                score: 1.0,
                image_data: None,
            },
            relevance,
            completeness,
        )
    }

    #[test]
    fn test_evaluate_worked_scenario() {
        // A=[4,3,2], B=[2,4,3]: distinct documents, pool [4,3,2,2,4,3]
        let methods = vec![
            MethodResults::new(
                "a",
                vec![judgment("a1", 2, 2), judgment("a2", 2, 1), judgment("a3", 1, 1)],
            ),
            MethodResults::new(
                "b",
                vec![judgment("b1", 1, 1), judgment("b2", 2, 2), judgment("b3", 2, 1)],
            ),
        ];

        let mut board = Scoreboard::new();
        let report = evaluate_methods(&methods, &[2], &mut board);

        assert_eq!(report.unique_document_count, 6);
        let score_a = report.score("a", 2).unwrap();
        let score_b = report.score("b", 2).unwrap();
        assert!((score_a - 0.9033).abs() < 1e-3);
        assert!((score_b - 0.6934).abs() < 1e-3);
        assert_eq!(board.get("a", 2), Some(score_a));
    }

    #[test]
    fn test_evaluate_default_depths() {
        let methods = vec![MethodResults::new("only", vec![judgment("d", 1, 0)])];
        let mut board = Scoreboard::new();

        let report = evaluate_methods(&methods, &DEFAULT_DEPTHS, &mut board);
        assert_eq!(report.scores.len(), 3);
        assert_eq!(board.depths(), vec![1, 2, 3]);
    }

    #[test]
    fn test_evaluate_all_irrelevant_scores_zero() {
        let methods = vec![
            MethodResults::new("a", vec![judgment("x", 0, 0)]),
            MethodResults::new("b", vec![judgment("y", 0, 0)]),
        ];
        let mut board = Scoreboard::new();

        let report = evaluate_methods(&methods, &[1], &mut board);
        assert_eq!(report.score("a", 1), Some(0.0));
        assert_eq!(report.score("b", 1), Some(0.0));
    }

    #[test]
    fn test_reevaluation_overwrites_scoreboard() {
        let mut board = Scoreboard::new();

        let first = vec![MethodResults::new("m", vec![judgment("d", 0, 0)])];
        evaluate_methods(&first, &[1], &mut board);
        assert_eq!(board.get("m", 1), Some(0.0));

        let second = vec![MethodResults::new("m", vec![judgment("d", 2, 2)])];
        evaluate_methods(&second, &[1], &mut board);
        assert_eq!(board.get("m", 1), Some(1.0));
    }
}
