//! Relevance pool construction
//!
//! The pool is the query-wide set of combined grades, one per unique
//! document across every method's result list. It is the shared
//! ideal-ranking reference for all per-method metric computations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{DedupKey, MethodResults};

/// Deduplicated combined grades for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevancePool {
    grades: Vec<u32>,
    unique_documents: usize,
}

impl RelevancePool {
    /// Build the pool from every method's result list
    ///
    /// Methods are walked in the caller's order and each document's first
    /// appearance wins; documents shared between methods are counted once.
    /// The resulting order is stable for a given input ordering, though the
    /// metric sorts it before use.
    pub fn build(methods: &[MethodResults]) -> Self {
        let mut seen: HashSet<DedupKey> = HashSet::new();
        let mut grades = Vec::new();

        for results in methods {
            for judgment in &results.documents {
                if seen.insert(judgment.dedup_key()) {
                    grades.push(judgment.combined_grade());
                }
            }
        }

        let unique_documents = grades.len();
        Self {
            grades,
            unique_documents,
        }
    }

    /// Combined grades in first-appearance order
    pub fn grades(&self) -> &[u32] {
        &self.grades
    }

    /// Number of unique documents across all methods
    ///
    /// Diagnostic for annotation-coverage reporting.
    pub fn unique_document_count(&self) -> usize {
        self.unique_documents
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}
