use crate::error::ReconError;
use crate::model::{MatchResult, RecordSet};
use crate::scorer::Scorer;

/// A pool entry: index into the source collection plus the prepared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub prepared: String,
}

/// Candidate names prepared once per run and scanned read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    /// Build from `(index, raw name)` pairs, preparing each name with `scorer`.
    pub fn new<'a, S, I>(scorer: &S, names: I) -> Self
    where
        S: Scorer + ?Sized,
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let candidates = names
            .into_iter()
            .map(|(index, raw)| Candidate {
                index,
                prepared: scorer.prepare(raw),
            })
            .collect();
        Self { candidates }
    }

    /// Build from every record's name field. A record without one is malformed.
    pub fn from_records<S: Scorer + ?Sized>(scorer: &S, set: &RecordSet) -> Result<Self, ReconError> {
        let names = set.names()?;
        Ok(Self::new(scorer, names.into_iter().enumerate()))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }
}

/// Best candidate for `query`, or `None` when the best score is below `cutoff`
/// (or the pool is empty).
///
/// Ties go to the candidate encountered first in pool order.
pub fn select<S: Scorer + ?Sized>(
    query: &str,
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
) -> Option<MatchResult> {
    select_available(query, pool, cutoff, scorer, |_| true)
}

/// [`select`] restricted to candidates whose index passes `available`.
pub fn select_available<S, F>(
    query: &str,
    pool: &CandidatePool,
    cutoff: u8,
    scorer: &S,
    available: F,
) -> Option<MatchResult>
where
    S: Scorer + ?Sized,
    F: Fn(usize) -> bool,
{
    let prepared = scorer.prepare(query);
    let mut best: Option<MatchResult> = None;

    for candidate in pool.iter() {
        if !available(candidate.index) {
            continue;
        }
        let score = scorer.compare(&prepared, &candidate.prepared);
        // Strict `>` keeps the first of equal scores.
        if best.map_or(true, |b| score > b.score) {
            best = Some(MatchResult {
                index: candidate.index,
                score,
            });
            if score == 100 {
                break;
            }
        }
    }

    best.filter(|b| b.score >= cutoff)
}
