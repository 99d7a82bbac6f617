use thiserror::Error;

/// Top-level error type for the TIN index.
#[derive(Debug, Error)]
pub enum TinError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors raised while constructing TIN entities.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y}, {z})")]
    NonFinite { x: f64, y: f64, z: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised by index population and queries.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("nothing found: {0}")]
    NotFound(String),

    #[error("elevation interval must be finite and positive, got {0}")]
    InvalidInterval(f64),

    #[error("invalid elevation range [{low}, {high}]")]
    InvalidElevation { low: f64, high: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),
}

/// Errors raised while triangulating input points.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("triangulation needs at least 3 points, got {0}")]
    InsufficientPoints(usize),

    #[error("triangulation failed: {0}")]
    Failed(String),
}

impl TinError {
    /// Returns `true` if this error reports an empty query result.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Index(IndexError::NotFound(_)))
    }
}

/// Convenience type alias for results using [`TinError`].
pub type Result<T> = std::result::Result<T, TinError>;
