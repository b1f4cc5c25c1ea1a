use std::collections::HashMap;

use crate::model::{MatchSummary, MatchedPair};

/// Compute summary statistics for a finished run.
pub fn compute_summary(left_total: usize, right_total: usize, pairs: &[MatchedPair]) -> MatchSummary {
    let mut claims: HashMap<usize, usize> = HashMap::new();
    for p in pairs {
        *claims.entry(p.right_index).or_insert(0) += 1;
    }

    let scores = pairs.iter().map(|p| p.score);
    let total: u64 = scores.clone().map(u64::from).sum();

    MatchSummary {
        left_total,
        right_total,
        matched: pairs.len(),
        unmatched_left: left_total.saturating_sub(pairs.len()),
        right_claimed: claims.len(),
        right_shared: claims.values().filter(|n| **n > 1).count(),
        average_score: (!pairs.is_empty()).then(|| total as f64 / pairs.len() as f64),
        max_score: scores.clone().max(),
        min_score: scores.min(),
    }
}
