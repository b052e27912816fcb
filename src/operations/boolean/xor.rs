use tracing::instrument;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the symmetric difference of two geometries.
pub struct Xor<'g> {
    a: &'g Geometry,
    b: &'g Geometry,
}

impl<'g> Xor<'g> {
    /// Creates a new `Xor` operation.
    #[must_use]
    pub fn new(a: &'g Geometry, b: &'g Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the symmetric difference. Returns `None` if the operands are
    /// topologically equal.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate cannot be inserted into the
    /// arrangement.
    #[instrument(skip_all, fields(a = self.a.kind(), b = self.b.kind()))]
    pub fn execute(&self, tolerance: Tolerance) -> Result<Option<Geometry>> {
        boolean_execute(self.a, self.b, BooleanOp::Xor, tolerance)
    }
}
