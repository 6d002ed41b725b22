//! Document types flowing through the evaluation engine
//!
//! A document passes through three representations: `RetrievedDocument`
//! (what a search backend returns, ungraded), `Annotation` (what a human
//! annotator submits), and `DocumentJudgment` (the union of both, eligible
//! for evaluation). Only annotation matching constructs a judgment, so the
//! engine never sees a half-graded document.

use serde::{Deserialize, Serialize};

/// A document as returned by one retrieval method
///
/// `score` is the method's own similarity/relevance score; lists arrive
/// ordered by it, descending. `image_data` is an opaque base64 blob passed
/// through to prompt assembly unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub title: String,
    pub content: String,
    pub score: f32,
    #[serde(default)]
    pub image_data: Option<String>,
}

/// One annotator submission for a single document
///
/// `relevance` and `completeness` are independently graded. Matching back
/// to a retrieved document uses the same normalized identity as pool
/// deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub title: String,
    pub content: String,
    pub relevance: u32,
    pub completeness: u32,
}

/// A fully graded document, eligible for evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentJudgment {
    pub document: RetrievedDocument,
    pub relevance: u32,
    pub completeness: u32,
}

impl DocumentJudgment {
    /// Create a judgment from a document and its matched annotation grades
    pub fn new(document: RetrievedDocument, relevance: u32, completeness: u32) -> Self {
        Self {
            document,
            relevance,
            completeness,
        }
    }

    /// Combined grade used for all ranking metrics
    pub fn combined_grade(&self) -> u32 {
        self.relevance + self.completeness
    }

    /// Deduplication identity of the underlying document
    pub fn dedup_key(&self) -> DedupKey {
        dedup_key(&self.document.title, &self.document.content)
    }
}

/// The ordered result list of one retrieval method for one query
///
/// Order is the method's native ranking (retrieval score descending), not
/// the annotation grades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodResults {
    pub method: String,
    pub documents: Vec<DocumentJudgment>,
}

impl MethodResults {
    pub fn new(method: impl Into<String>, documents: Vec<DocumentJudgment>) -> Self {
        Self {
            method: method.into(),
            documents,
        }
    }

    /// Combined grades of the top-k documents in native rank order
    pub fn top_k_grades(&self, k: usize) -> Vec<u32> {
        self.documents
            .iter()
            .take(k)
            .map(|d| d.combined_grade())
            .collect()
    }
}

/// Whitespace-stripped (title, content) pair identifying a document
pub type DedupKey = (String, String);

/// Compute the dedup identity for a title/content pair
///
/// Normalization strips all whitespace, interior included, so trivial
/// formatting differences do not create duplicates. Documents differing in
/// punctuation or actual field content stay distinct; no fuzzy matching.
pub fn dedup_key(title: &str, content: &str) -> DedupKey {
    (strip_whitespace(title), strip_whitespace(content))
}

fn strip_whitespace(s: &str) -> String {
    s.split_whitespace().collect()
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

    #[test]
    fn test_combined_grade_is_sum() {
        let judgment = DocumentJudgment::new(doc("t", "c", 0.9), 3, 2);
        assert_eq!(judgment.combined_grade(), 5);
    }

    #[test]
    fn test_dedup_key_strips_interior_whitespace() {
        let a = dedup_key("World  Population", "rises\tsteadily");
        let b = dedup_key("World Population", "rises steadily");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dedup_key_keeps_punctuation_distinct() {
        let a = dedup_key("World Population", "rises steadily.");
        let b = dedup_key("World Population", "rises steadily");
        assert_ne!(a, b);
    }

    #[test]
    fn test_top_k_grades_in_native_order() {
        let results = MethodResults::new(
            "bm25",
            vec![
                DocumentJudgment::new(doc("a", "1", 0.9), 1, 1),
                DocumentJudgment::new(doc("b", "2", 0.8), 2, 2),
                DocumentJudgment::new(doc("c", "3", 0.7), 0, 1),
            ],
        );
        assert_eq!(results.top_k_grades(2), vec![2, 4]);
    }

    #[test]
    fn test_top_k_grades_short_list() {
        let results = MethodResults::new(
            "clip",
            vec![DocumentJudgment::new(doc("a", "1", 0.5), 1, 0)],
        );
        assert_eq!(results.top_k_grades(3), vec![1]);
    }

    #[test]
    fn test_document_serialization_roundtrip() {
        let judgment = DocumentJudgment::new(doc("t", "c", 1.5), 2, 3);
        let json = serde_json::to_string(&judgment).unwrap();
        let back: DocumentJudgment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.combined_grade(), 5);
        assert_eq!(back.document.title, "t");
    }
}
