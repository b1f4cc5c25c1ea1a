//! `fuzzyrecon-recon`: fuzzy name reconciliation engine.
//!
//! Pairs records from two collections that lack a shared key by scoring
//! their name fields with a token-sort ratio and keeping each left record's
//! best right candidate at or above a cutoff.
//!
//! Pure engine crate: receives pre-loaded records, returns matched pairs.
//! CSV helpers take text and writers; no filesystem access.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod scorer;
pub mod selector;
pub mod sink;
pub mod source;
pub mod summary;

pub use config::MatchConfig;
pub use error::ReconError;
pub use model::{MatchOutput, MatchResult, MatchedPair, Record, RecordSet, Side};
pub use pipeline::{match_records, run, MatchOptions};
pub use scorer::{Scorer, TokenSortRatio};
pub use selector::{select, CandidatePool};
