//! Elevation banding: a 1D index over fixed-width integer levels.

mod index;

pub use index::ElevationIndex;

use crate::error::{IndexError, Result};

/// How an element reports its elevation.
///
/// The variant is resolved once when the element is indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElevationSpec {
    /// A single representative z-value.
    Primary(f64),
    /// A closed z-range.
    Range { low: f64, high: f64 },
}

impl ElevationSpec {
    /// Lowest z the element reaches.
    #[must_use]
    pub fn lowest(&self) -> f64 {
        match *self {
            Self::Primary(z) => z,
            Self::Range { low, .. } => low,
        }
    }

    /// Highest z the element reaches.
    #[must_use]
    pub fn highest(&self) -> f64 {
        match *self {
            Self::Primary(z) => z,
            Self::Range { high, .. } => high,
        }
    }

    /// Checks that all values are finite and the range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidElevation` otherwise.
    pub fn validate(&self) -> Result<()> {
        let (low, high) = (self.lowest(), self.highest());
        if low.is_finite() && high.is_finite() && low <= high {
            Ok(())
        } else {
            Err(IndexError::InvalidElevation { low, high }.into())
        }
    }
}

/// Anything that can be placed in an [`ElevationIndex`].
pub trait HasElevation {
    fn elevation(&self) -> ElevationSpec;
}

impl HasElevation for ElevationSpec {
    fn elevation(&self) -> ElevationSpec {
        *self
    }
}

/// What a query that matches nothing returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyResultPolicy {
    /// Fail with `IndexError::NotFound`.
    #[default]
    Error,
    /// Return an empty collection.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_and_highest() {
        let p = ElevationSpec::Primary(4.0);
        assert!((p.lowest() - 4.0).abs() < 1e-12);
        assert!((p.highest() - 4.0).abs() < 1e-12);
        let r = ElevationSpec::Range { low: 1.0, high: 3.0 };
        assert!((r.lowest() - 1.0).abs() < 1e-12);
        assert!((r.highest() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_inverted_and_nan() {
        assert!(ElevationSpec::Range { low: 1.0, high: 3.0 }.validate().is_ok());
        assert!(ElevationSpec::Range { low: 3.0, high: 1.0 }.validate().is_err());
        assert!(ElevationSpec::Primary(f64::NAN).validate().is_err());
        assert!(ElevationSpec::Range {
            low: 0.0,
            high: f64::INFINITY
        }
        .validate()
        .is_err());
    }

    #[test]
    fn default_policy_is_error() {
        assert_eq!(EmptyResultPolicy::default(), EmptyResultPolicy::Error);
    }
}
