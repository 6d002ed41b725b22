//! Per-method, per-depth score storage
//!
//! Scores are keyed by the typed pair (method, depth) rather than the flat
//! `{method}_ndcg@{k}` strings the reporting side consumes; the flat keys
//! exist only as an export view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Durable score store for one query session
///
/// Merging is last-write-wins: each evaluation call recomputes every score
/// deterministically from its own input snapshot, so racing re-evaluations
/// of the same query converge. Serializes as a flat entry list because map
/// keys must be strings on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ScoreEntry>", into = "Vec<ScoreEntry>")]
pub struct Scoreboard {
    scores: BTreeMap<ScoreKey, f64>,
}

/// Typed composite key: which method, at which cutoff depth
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScoreKey {
    pub method: String,
    pub depth: usize,
}

/// Wire representation of one scoreboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub method: String,
    pub depth: usize,
    pub score: f64,
}

impl From<Vec<ScoreEntry>> for Scoreboard {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Scoreboard::new();
        for entry in entries {
            board.record(entry.method, entry.depth, entry.score);
        }
        board
    }
}

impl From<Scoreboard> for Vec<ScoreEntry> {
    fn from(board: Scoreboard) -> Self {
        board
            .scores
            .into_iter()
            .map(|(key, score)| ScoreEntry {
                method: key.method,
                depth: key.depth,
                score,
            })
            .collect()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one method's score at one depth, replacing any prior value
    pub fn record(&mut self, method: impl Into<String>, depth: usize, score: f64) {
        self.scores.insert(
            ScoreKey {
                method: method.into(),
                depth,
            },
            score,
        );
    }

    /// Every method's score at the given depth
    ///
    /// Empty when no evaluation has run at that depth; the selector turns
    /// that into a reportable condition.
    pub fn scores_at_depth(&self, depth: usize) -> Vec<(String, f64)> {
        self.scores
            .iter()
            .filter(|(key, _)| key.depth == depth)
            .map(|(key, &score)| (key.method.clone(), score))
            .collect()
    }

    /// Look up a single score
    pub fn get(&self, method: &str, depth: usize) -> Option<f64> {
        self.scores
            .get(&ScoreKey {
                method: method.to_string(),
                depth,
            })
            .copied()
    }

    /// Depths that have at least one recorded score
    pub fn depths(&self) -> Vec<usize> {
        let mut depths: Vec<usize> = self.scores.keys().map(|key| key.depth).collect();
        depths.sort_unstable();
        depths.dedup();
        depths
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Flat `{method}_ndcg@{k}` view for the reporting/export collaborator
    pub fn export_flat(&self) -> BTreeMap<String, f64> {
        self.scores
            .iter()
            .map(|(key, &score)| (format!("{}_ndcg@{}", key.method, key.depth), score))
            .collect()
    }
}
