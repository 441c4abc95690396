use std::collections::HashSet;

use tracing::debug;

use crate::models::{AggregateStats, ReviewBatch};

/// Drop repeated reviews, keeping the first occurrence of each identity key
/// in server order. Deterministic and order-preserving; running it on its
/// own output is a no-op.
pub fn dedupe(mut batch: ReviewBatch) -> ReviewBatch {
    let before = batch.reviews.len();
    let mut seen = HashSet::with_capacity(before);
    batch.reviews.retain(|review| seen.insert(review.identity_key()));

    if batch.reviews.len() < before {
        debug!(
            dropped = before - batch.reviews.len(),
            kept = batch.reviews.len(),
            "Dropped duplicate reviews"
        );
    }

    batch
}

/// Header numbers for display: the independently fetched stats take
/// precedence over the batch-embedded values when present. The review
/// sequence itself is never affected by the overlay.
pub fn display_summary(batch: &ReviewBatch, stats: Option<&AggregateStats>) -> (f64, u64) {
    match stats {
        Some(s) => (s.average_rating, s.total_count),
        None => (batch.average_rating, batch.count),
    }
}
