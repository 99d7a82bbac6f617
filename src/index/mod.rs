mod envelope_index;
mod in_memory;
mod point_index;
mod tin_index;

pub use envelope_index::EnvelopeIndex;
pub use in_memory::{InMemoryTinIndex, InMemoryTinIndexBuilder};
pub use point_index::TinPointIndex;
pub use tin_index::{TinIndex, TinTopology};

use crate::elevation::EmptyResultPolicy;

/// Parameters controlling how a TIN index is built and how it reports
/// empty query results.
#[derive(Debug, Clone, Copy)]
pub struct IndexParams {
    /// Width of one elevation band.
    pub elevation_interval: f64,
    /// Whether queries that match nothing fail or return an empty list.
    pub empty_results: EmptyResultPolicy,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            elevation_interval: 1.0,
            empty_results: EmptyResultPolicy::Error,
        }
    }
}
