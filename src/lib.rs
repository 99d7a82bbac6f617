pub mod elevation;
pub mod error;
pub mod index;
pub mod math;
pub mod operations;
pub mod tin;

pub use elevation::{ElevationIndex, ElevationSpec, EmptyResultPolicy, HasElevation};
pub use error::{Result, TinError};
pub use index::{InMemoryTinIndex, InMemoryTinIndexBuilder, IndexParams, TinIndex, TinTopology};
