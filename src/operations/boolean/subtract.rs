use tracing::instrument;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean subtraction of one geometry from another.
pub struct Subtract<'g> {
    a: &'g Geometry,
    b: &'g Geometry,
}

impl<'g> Subtract<'g> {
    /// Creates a new `Subtract` operation (A - B).
    #[must_use]
    pub fn new(a: &'g Geometry, b: &'g Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the subtraction. Returns `None` if `B` covers `A`.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate cannot be inserted into the
    /// arrangement.
    #[instrument(skip_all, fields(a = self.a.kind(), b = self.b.kind()))]
    pub fn execute(&self, tolerance: Tolerance) -> Result<Option<Geometry>> {
        boolean_execute(self.a, self.b, BooleanOp::Subtract, tolerance)
    }
}
