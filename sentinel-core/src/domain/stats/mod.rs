// sentinel-core/src/domain/stats/mod.rs
//
// Aggregation primitives shared by the analyzers.

pub mod correlation;
pub mod group;
pub mod ks;
pub mod summary;

pub use correlation::{factorize, pearson};
pub use group::{GroupMean, extremes, filtered_mean, group_means};
pub use ks::{KsOutcome, ks_two_sample};
pub use summary::RunningStats;
