//! Claim deduplication and influencer score aggregation.

use crate::types::scoring::mean_trust_score;

/// Default similarity above which two claims count as the same claim.
pub const DUPLICATE_THRESHOLD: f64 = 0.6;

/// Indel similarity ratio in `[0, 1]`: `1 - indel / (len(a) + len(b))`.
///
/// Only insertions and deletions count, so a claim restated with extra
/// words stays close to the shorter one. Identical strings score 1.0,
/// including two empty strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    rapidfuzz::distance::indel::normalized_similarity(a.chars(), b.chars())
}

/// Index of the first existing claim `candidate` duplicates, if any.
///
/// Scans in the given order and stops at the first similarity strictly
/// above `threshold`.
pub fn find_duplicate<'a, I>(candidate: &str, existing: I, threshold: f64) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .position(|text| similarity(candidate, text) > threshold)
}

pub fn is_duplicate<'a, I>(candidate: &str, existing: I, threshold: f64) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    find_duplicate(candidate, existing, threshold).is_some()
}

/// Aggregate score for an influencer's full claim set, `None` when empty.
pub fn aggregate_trust_score(claim_scores: &[f64]) -> Option<f64> {
    mean_trust_score(claim_scores)
}
