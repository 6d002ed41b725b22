//! Normalized cumulative-gain ranking metric
//!
//! Gain for a document at 1-indexed rank i is `grade / log2(i + 1)`; the
//! normalized score divides a ranking's cumulative gain by the ideal
//! cumulative gain of the pool sorted descending. Linear gain, not the
//! exponential 2^rel - 1 variant.

/// Discounted cumulative gain of the first k grades
///
/// Grades beyond position k are ignored; a list shorter than k contributes
/// only what it has.
pub fn dcg_at_k(grades: &[u32], k: usize) -> f64 {
    grades
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, &grade)| grade as f64 / ((i + 2) as f64).log2())
        .sum()
}

/// Normalized DCG of `ranked` at depth k against the pool
///
/// The ideal ordering is the pool sorted descending, truncated to k. A zero
/// ideal gain (empty pool, or every pool grade zero) yields a score of 0,
/// never NaN and never an error: a query where every candidate was graded
/// irrelevant is a normal outcome.
pub fn ndcg_at_k(ranked: &[u32], k: usize, pool: &[u32]) -> f64 {
    let mut sorted = pool.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let idcg = dcg_at_k(&sorted, k);
    if idcg == 0.0 {
        return 0.0;
    }
    dcg_at_k(ranked, k) / idcg
}
