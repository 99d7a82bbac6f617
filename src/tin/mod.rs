//! TIN entities: vertices, triangle faces, edges, breaklines and boundaries.
//!
//! Entities are immutable once built. Indices refer to them through typed
//! arena ids.

pub mod edge;
pub mod face;
pub mod point;
pub mod polyline;

pub use edge::TinEdge;
pub use face::{FaceId, TinFace};
pub use point::{PointId, TinPoint};
pub use polyline::{BoundaryId, BreaklineId, TinBoundary, TinBreakline};
