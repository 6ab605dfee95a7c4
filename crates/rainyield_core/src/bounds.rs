//! Accepted ranges for rainfall input and yield output.

use derive_getters::Getters;
use rainyield_error::{
    PredictionError, PredictionErrorKind, RequestError, RequestErrorKind,
};
use serde::{Deserialize, Serialize};

/// Smallest accepted annual rainfall in millimetres.
pub const MIN_RAINFALL_MM: f64 = 0.0;

/// Largest accepted annual rainfall in millimetres.
pub const MAX_RAINFALL_MM: f64 = 5000.0;

/// Check a submitted rainfall figure.
///
/// Returns the value unchanged when it is finite and within
/// [`MIN_RAINFALL_MM`]..=[`MAX_RAINFALL_MM`].
#[track_caller]
pub fn validate_rainfall(rainfall: f64) -> Result<f64, RequestError> {
    if !rainfall.is_finite() {
        return Err(RequestError::new(RequestErrorKind::RainfallNotFinite));
    }
    if !(MIN_RAINFALL_MM..=MAX_RAINFALL_MM).contains(&rainfall) {
        return Err(RequestError::new(RequestErrorKind::RainfallOutOfRange {
            value: rainfall,
            min: MIN_RAINFALL_MM,
            max: MAX_RAINFALL_MM,
        }));
    }
    Ok(rainfall)
}

/// Plausible yield range in metric tons per hectare.
///
/// # Examples
///
/// ```
/// use rainyield_core::YieldBounds;
///
/// let bounds = YieldBounds::new(0.5, 8.0);
/// assert!(bounds.check(3.2).is_ok());
/// assert!(bounds.check(12.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct YieldBounds {
    /// Lower bound (inclusive)
    min: f64,
    /// Upper bound (inclusive)
    max: f64,
}

impl YieldBounds {
    /// Creates bounds from a lower and upper limit.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max` and both are finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Accept the value if it lies inside the bounds. Never clamps.
    #[track_caller]
    pub fn check(&self, value: f64) -> Result<f64, PredictionError> {
        if value.is_finite() && (self.min..=self.max).contains(&value) {
            Ok(value)
        } else {
            Err(PredictionError::new(PredictionErrorKind::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            }))
        }
    }
}

impl Default for YieldBounds {
    fn default() -> Self {
        Self::new(0.0, 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainfall_edges_are_inclusive() {
        assert_eq!(validate_rainfall(0.0).unwrap(), 0.0);
        assert_eq!(validate_rainfall(5000.0).unwrap(), 5000.0);
    }

    #[test]
    fn test_rainfall_out_of_range() {
        for value in [-0.1, 5000.01, -800.0] {
            let err = validate_rainfall(value).unwrap_err();
            assert!(matches!(
                err.kind,
                RequestErrorKind::RainfallOutOfRange { .. }
            ));
        }
    }

    #[test]
    fn test_rainfall_not_finite() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = validate_rainfall(value).unwrap_err();
            assert_eq!(err.kind, RequestErrorKind::RainfallNotFinite);
        }
    }

    #[test]
    fn test_yield_bounds_reject_without_clamping() {
        let bounds = YieldBounds::new(1.0, 6.0);
        let err = bounds.check(6.5).unwrap_err();
        assert_eq!(
            err.kind,
            PredictionErrorKind::OutOfRange {
                value: 6.5,
                min: 1.0,
                max: 6.0
            }
        );
        assert!(bounds.check(f64::NAN).is_err());
        assert_eq!(bounds.check(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_bounds_validity() {
        assert!(YieldBounds::default().is_valid());
        assert!(!YieldBounds::new(5.0, 1.0).is_valid());
    }
}
