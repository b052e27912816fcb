use crate::error::ToleranceError;

use super::Point2;

/// Maximum numeric distance at which two values are treated as equal.
///
/// Every coordinate that enters a mesh is snapped to the nearest multiple of
/// the tolerance, so two inputs that normalize to the same value are the same
/// vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Tolerance used by [`Tolerance::default`].
    pub const DEFAULT: f64 = 1e-9;

    /// Creates a tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ToleranceError::Invalid`] if `value` is zero, negative, or
    /// not finite.
    pub fn new(value: f64) -> Result<Self, ToleranceError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ToleranceError::Invalid { value })
        }
    }

    /// Returns the epsilon value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Snaps `v` to the nearest multiple of epsilon.
    #[must_use]
    pub fn normalize(self, v: f64) -> f64 {
        // `+ 0.0` folds a negative zero into positive zero.
        (v / self.0).round() * self.0 + 0.0
    }

    /// Snaps both coordinates of `p`.
    #[must_use]
    pub fn normalize_point(self, p: &Point2) -> Point2 {
        Point2::new(self.normalize(p.x), self.normalize(p.y))
    }

    /// Returns `true` if `a` and `b` differ by at most epsilon.
    #[must_use]
    pub fn matches(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.0
    }

    /// Returns `true` if both coordinates of `a` and `b` match.
    #[must_use]
    pub fn matches_point(self, a: &Point2, b: &Point2) -> bool {
        self.matches(a.x, b.x) && self.matches(a.y, b.y)
    }

    /// Integer grid step of `v`: the multiple of epsilon that `normalize`
    /// snaps it to.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn grid_step(self, v: f64) -> i64 {
        (v / self.0).round() as i64
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
