//! Type definitions module
//!
//! Core document and judgment types shared by every engine component.

pub mod documents;

// Re-export commonly used types
pub use documents::{
    dedup_key, Annotation, DedupKey, DocumentJudgment, MethodResults, RetrievedDocument,
};
