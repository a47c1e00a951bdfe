// sentinel-core/src/ports/dataset.rs

// What the engine needs from a data feed, without knowing where the records
// come from (generator, file export, production sample).

use crate::domain::dataset::{Dataset, DatasetMode};
use crate::error::SentinelError;

pub trait DatasetProvider: Send + Sync {
    /// Current decisions for the given feed.
    fn dataset(&self, mode: DatasetMode) -> Result<Dataset, SentinelError>;

    /// The reference distribution the model was validated on.
    fn baseline(&self) -> Result<Dataset, SentinelError>;
}
