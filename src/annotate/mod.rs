//! Annotation matching
//!
//! Annotator submissions arrive as free-standing (title, content, grades)
//! records; this module attaches them to the retrieved documents they judge.
//! Matching uses the same whitespace-stripped identity as pool
//! deduplication, so formatting drift between the annotation UI and the
//! search backend does not lose grades. Near-duplicates differing by
//! punctuation or field content do not match; that is accepted behavior,
//! not something to patch with fuzzy matching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::types::{dedup_key, Annotation, DedupKey, DocumentJudgment, MethodResults, RetrievedDocument};

/// Result of applying annotations to one method's retrieved documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub results: MethodResults,
    /// Documents no annotation covered; not eligible for evaluation
    pub unmatched: Vec<RetrievedDocument>,
}

/// Attach annotator grades to retrieved documents by normalized identity
///
/// Documents keep their retrieval order. A document without a matching
/// annotation is excluded from the graded list and returned in `unmatched`
/// so callers can report annotation coverage; the evaluation engine only
/// ever sees fully graded documents.
pub fn apply_annotations(
    method: impl Into<String>,
    documents: Vec<RetrievedDocument>,
    annotations: &[Annotation],
) -> MatchOutcome {
    let method = method.into();
    let by_key: HashMap<DedupKey, &Annotation> = annotations
        .iter()
        .map(|a| (dedup_key(&a.title, &a.content), a))
        .collect();

    let mut judged = Vec::with_capacity(documents.len());
    let mut unmatched = Vec::new();

    for document in documents {
        let key = dedup_key(&document.title, &document.content);
        match by_key.get(&key) {
            Some(annotation) => {
                judged.push(DocumentJudgment::new(
                    document,
                    annotation.relevance,
                    annotation.completeness,
                ));
            }
            None => {
                warn!(method = %method, title = %document.title, "document matched no annotation");
                unmatched.push(document);
            }
        }
    }

    MatchOutcome {
        results: MethodResults::new(method, judged),
        unmatched,
    }
}

/// Apply one annotation set across every method's result list
pub fn apply_annotations_all(
    retrieved: Vec<(String, Vec<RetrievedDocument>)>,
    annotations: &[Annotation],
) -> Vec<MatchOutcome> {
    retrieved
        .into_iter()
        .map(|(method, documents)| apply_annotations(method, documents, annotations))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, content: &str, score: f32) -> RetrievedDocument {
        RetrievedDocument {
            title: title.to_string(),
            content: content.to_string(),
            score,
            image_data: None,
        }
    }

    fn annotation(title: &str, content: &str, relevance: u32, completeness: u32) -> Annotation {
        Annotation {
            title: title.to_string(),
            content: content.to_string(),
            relevance,
            completeness,
        }
    }

    #[test]
    fn test_grades_attach_by_identity() {
        let outcome = apply_annotations(
            "bm25",
            vec![doc("Wheat Exports", "by region", 2.1)],
            &[annotation("Wheat Exports", "by region", 3, 2)],
        );

        assert!(outcome.unmatched.is_empty());
        assert_eq!(outcome.results.documents.len(), 1);
        assert_eq!(outcome.results.documents[0].combined_grade(), 5);
    }

    #[test]
    fn test_whitespace_differences_still_match() {
        let outcome = apply_annotations(
            "mistral",
            vec![doc("Wheat  Exports", "by\tregion", 1.0)],
            &[annotation("Wheat Exports", "by region", 1, 1)],
        );

        assert!(outcome.unmatched.is_empty());
        assert_eq!(outcome.results.documents[0].combined_grade(), 2);
    }

    #[test]
    fn test_unmatched_documents_reported_not_graded() {
        let outcome = apply_annotations(
            "clip",
            vec![doc("Covered", "yes", 1.0), doc("Uncovered", "no", 0.9)],
            &[annotation("Covered", "yes", 2, 0)],
        );

        assert_eq!(outcome.results.documents.len(), 1);
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].title, "Uncovered");
    }

    #[test]
    fn test_punctuation_difference_does_not_match() {
        let outcome = apply_annotations(
            "bm25",
            vec![doc("Wheat Exports", "by region.", 1.0)],
            &[annotation("Wheat Exports", "by region", 1, 1)],
        );

        assert!(outcome.results.documents.is_empty());
        assert_eq!(outcome.unmatched.len(), 1);
    }

    #[test]
    fn test_retrieval_order_preserved() {
        let outcome = apply_annotations(
            "bm25",
            vec![doc("B", "second", 0.8), doc("A", "first", 0.9)],
            &[
                annotation("A", "first", 1, 0),
                annotation("B", "second", 2, 0),
            ],
        );

        let titles: Vec<&str> = outcome
            .results
            .documents
            .iter()
            .map(|j| j.document.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_apply_all_methods() {
        let retrieved = vec![
            ("bm25".to_string(), vec![doc("X", "x", 1.0)]),
            ("clip".to_string(), vec![doc("X", "x", 0.7)]),
        ];
        let annotations = vec![annotation("X", "x", 1, 1)];

        let outcomes = apply_annotations_all(retrieved, &annotations);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.unmatched.is_empty()));
    }
}
