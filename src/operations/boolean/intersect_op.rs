use tracing::instrument;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean intersection of two geometries.
pub struct Intersect<'g> {
    a: &'g Geometry,
    b: &'g Geometry,
}

impl<'g> Intersect<'g> {
    /// Creates a new `Intersect` operation.
    #[must_use]
    pub fn new(a: &'g Geometry, b: &'g Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the intersection. Returns `None` if the operands share no point.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate cannot be inserted into the
    /// arrangement.
    #[instrument(skip_all, fields(a = self.a.kind(), b = self.b.kind()))]
    pub fn execute(&self, tolerance: Tolerance) -> Result<Option<Geometry>> {
        boolean_execute(self.a, self.b, BooleanOp::Intersect, tolerance)
    }
}
