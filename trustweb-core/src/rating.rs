use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TrustError;

/// Lowest rating a participant may assign.
pub const MIN_RATING: f64 = -100.0;

/// Highest rating a participant may assign.
pub const MAX_RATING: f64 = 100.0;

/// A direct trust rating in the closed range `[-100, 100]`.
///
/// Negative values express distrust. Out-of-range input is rejected, never
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Creates a `Rating` from a value in `[-100, 100]`.
    ///
    /// # Errors
    /// Returns [`TrustError::RatingOutOfRange`] if `value` is outside the range
    /// or is not finite.
    pub fn new(value: f64) -> Result<Self, TrustError> {
        if value.is_nan() || !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(TrustError::RatingOutOfRange { value });
        }
        // Adding +0.0 folds -0.0 into +0.0.
        Ok(Self(value + 0.0))
    }

    /// Returns the inner `f64` value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` for strictly negative ratings.
    ///
    /// Opinions of a distrusted contact are never propagated.
    #[must_use]
    pub fn is_distrust(self) -> bool {
        self.0 < 0.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = TrustError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for Rating {
    type Error = TrustError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(f64::from(value))
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = format!("{:.4}", self.0);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        f.write_str(if trimmed == "-0" { "0" } else { trimmed })
    }
}
