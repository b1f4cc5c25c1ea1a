//! Matching pipeline: pairs each left record with its best right record.
//!
//! Cost is O(|left| * |right|) scorer calls, each quadratic in name length.
//! Fine for hundreds to low thousands of records per side; beyond that the
//! full cross product becomes the bottleneck.

use std::time::Instant;

use log::{debug, info, trace, warn};

use crate::config::{Assignment, MatchConfig};
use crate::error::ReconError;
use crate::model::{MatchMeta, MatchOutput, MatchResult, MatchedPair, RecordSet};
use crate::scorer::Scorer;
use crate::selector::{select, select_available, CandidatePool};
use crate::summary::compute_summary;

pub const DEFAULT_CUTOFF: i64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub cutoff: i64,
    pub assignment: Assignment,
    /// Spread left records across the rayon pool. Ignored for exclusive
    /// assignment and when built without the `parallel` feature.
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            assignment: Assignment::ManyToOne,
            parallel: true,
        }
    }
}

impl MatchOptions {
    pub fn with_cutoff(cutoff: i64) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }
}

/// Check that a cutoff lies in the score range.
pub fn validate_cutoff(cutoff: i64) -> Result<u8, ReconError> {
    u8::try_from(cutoff)
        .ok()
        .filter(|c| *c <= 100)
        .ok_or(ReconError::InvalidCutoff(cutoff))
}

/// Pair every left record with its best-scoring right record.
///
/// Output is in left input order, at most one pair per left record. Left
/// records whose best score is below the cutoff are left out. Fails before
/// any scoring on an invalid cutoff or a record without a name.
pub fn match_records<S>(
    left: &RecordSet,
    right: &RecordSet,
    options: &MatchOptions,
    scorer: &S,
) -> Result<Vec<MatchedPair>, ReconError>
where
    S: Scorer + Sync + ?Sized,
{
    let cutoff = validate_cutoff(options.cutoff)?;
    let queries = left.names()?;
    let pool = CandidatePool::from_records(scorer, right)?;

    debug!(
        "matching {} left against {} right records (cutoff {cutoff}, {})",
        queries.len(),
        pool.len(),
        options.assignment
    );

    let results = match options.assignment {
        Assignment::ManyToOne => best_matches(&queries, &pool, cutoff, scorer, options.parallel),
        Assignment::Exclusive => {
            if options.parallel {
                debug!("exclusive assignment runs sequentially");
            }
            exclusive_matches(&queries, &pool, cutoff, scorer)
        }
    };

    let pairs = results
        .into_iter()
        .enumerate()
        .filter_map(|(li, result)| {
            let MatchResult { index: ri, score } = result?;
            trace!("left {li} -> right {ri} ({score})");
            Some(MatchedPair {
                left_index: li,
                right_index: ri,
                score,
                left: left.records[li].clone(),
                right: right.records[ri].clone(),
            })
        })
        .collect();

    Ok(pairs)
}

/// Independent best match per query, in query order.
fn best_matches<S>(
    queries: &[&str],
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
    parallel: bool,
) -> Vec<Option<MatchResult>>
where
    S: Scorer + Sync + ?Sized,
{
    if parallel {
        return par_best_matches(queries, pool, cutoff, scorer);
    }
    queries
        .iter()
        .map(|q| select(q, pool, cutoff, scorer))
        .collect()
}

#[cfg(feature = "parallel")]
fn par_best_matches<S>(
    queries: &[&str],
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
) -> Vec<Option<MatchResult>>
where
    S: Scorer + Sync + ?Sized,
{
    use rayon::prelude::*;

    // Indexed collect keeps query order.
    queries
        .par_iter()
        .map(|q| select(q, pool, cutoff, scorer))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn par_best_matches<S>(
    queries: &[&str],
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
) -> Vec<Option<MatchResult>>
where
    S: Scorer + Sync + ?Sized,
{
    queries
        .iter()
        .map(|q| select(q, pool, cutoff, scorer))
        .collect()
}

/// Greedy one-to-one: each query claims its best unclaimed candidate, then
/// claims below the cutoff are dropped.
///
/// Claims are made at cutoff 0 so the assignment itself does not depend on
/// the cutoff; raising it can only remove pairs.
fn exclusive_matches<S>(
    queries: &[&str],
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
) -> Vec<Option<MatchResult>>
where
    S: Scorer + ?Sized,
{
    let capacity = pool.iter().map(|c| c.index + 1).max().unwrap_or(0);
    let mut claimed = vec![false; capacity];

    queries
        .iter()
        .map(|q| {
            let result = select_available(q, pool, 0, scorer, |i| !claimed[i]);
            if let Some(m) = result {
                claimed[m.index] = true;
            }
            result.filter(|m| m.score >= cutoff)
        })
        .collect()
}

/// Run matching per config. Returns pairs in left input order plus summary.
pub fn run(
    config: &MatchConfig,
    left: &RecordSet,
    right: &RecordSet,
) -> Result<MatchOutput, ReconError> {
    let cutoff = validate_cutoff(config.cutoff)?;
    let scorer = config.scorer.build();
    let options = config.match_options();

    let start = Instant::now();
    let pairs = match_records(left, right, &options, &scorer)?;
    let summary = compute_summary(left.len(), right.len(), &pairs);

    info!(
        "'{}': {} of {} left records matched in {}ms",
        config.name,
        summary.matched,
        summary.left_total,
        start.elapsed().as_millis()
    );
    if summary.matched == 0 && !left.is_empty() {
        warn!("'{}': no left record reached cutoff {cutoff}", config.name);
    }

    Ok(MatchOutput {
        meta: MatchMeta {
            config_name: config.name.clone(),
            cutoff,
            metric: config.scorer.metric.to_string(),
            assignment: config.matching.assignment.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        pairs,
    })
}
