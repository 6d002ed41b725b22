// Retrieval evaluation and model selection
//
// This module implements the per-query evaluation flow: pool human
// judgments across methods, score each method's ranking at several cutoff
// depths, and pick the winning method with fair tie-breaking.
//
// Components:
// - Pool: deduplicated combined grades, the shared ideal-ranking reference
// - Metrics: normalized cumulative-gain calculator
// - Scoreboard: (method, depth) -> score store
// - Selector: score-descending ranking with randomized tie groups
// - Pipeline: one-call evaluation of all methods at all depths

pub mod metrics;
pub mod pipeline;
pub mod pool;
pub mod scoreboard;
pub mod selector;

// Re-export key types
pub use pipeline::{evaluate_methods, EvaluationReport, DEFAULT_DEPTHS};
pub use pool::RelevancePool;
pub use scoreboard::{ScoreKey, Scoreboard};
pub use selector::{RankedMethod, SelectionOutcome, TieAwareSelector};
