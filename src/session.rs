//! Per-query session store
//!
//! All engine state for one query lives here: the query text, each method's
//! annotated result list, and the scoreboard. Sessions are the unit of
//! isolation: concurrent queries never share one, so the engine needs no
//! locking, and racing re-evaluations of the same session are
//! last-write-wins because every call recomputes from its own snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eval::{evaluate_methods, EvaluationReport, Scoreboard};
use crate::types::MethodResults;

/// Evaluation state for a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySession {
    pub id: Uuid,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub methods: Vec<MethodResults>,
    pub scoreboard: Scoreboard,
}

impl QuerySession {
    /// Start an empty session for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            created_at: Utc::now(),
            methods: Vec::new(),
            scoreboard: Scoreboard::new(),
        }
    }

    /// Start a session with annotated method results already attached
    pub fn with_methods(query: impl Into<String>, methods: Vec<MethodResults>) -> Self {
        let mut session = Self::new(query);
        session.methods = methods;
        session
    }

    /// One method's result list by name
    pub fn method_results(&self, method: &str) -> Option<&MethodResults> {
        self.methods.iter().find(|m| m.method == method)
    }

    /// Score every attached method at the given depths
    ///
    /// Rebuilds the pool from scratch and merges scores into this session's
    /// scoreboard.
    pub fn evaluate(&mut self, depths: &[usize]) -> EvaluationReport {
        evaluate_methods(&self.methods, depths, &mut self.scoreboard)
    }
}
