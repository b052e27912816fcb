use tracing::instrument;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Tolerance;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean union of two geometries.
pub struct Union<'g> {
    a: &'g Geometry,
    b: &'g Geometry,
}

impl<'g> Union<'g> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(a: &'g Geometry, b: &'g Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the union. Returns `None` if both operands are empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate cannot be inserted into the
    /// arrangement.
    #[instrument(skip_all, fields(a = self.a.kind(), b = self.b.kind()))]
    pub fn execute(&self, tolerance: Tolerance) -> Result<Option<Geometry>> {
        boolean_execute(self.a, self.b, BooleanOp::Union, tolerance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::super::test_support::{init_tracing, line, polygon, square, tol};
    use super::*;

    fn union(a: &Geometry, b: &Geometry) -> Option<Geometry> {
        init_tracing();
        Union::new(a, b).execute(tol()).unwrap()
    }

    #[test]
    fn union_with_self_is_identity() {
        let a = square(0.0, 0.0, 4.0);
        assert_eq!(union(&a, &a), Some(a.normalize()));
    }

    #[test]
    fn self_union_keeps_adjacent_members_apart() {
        let pair = Geometry::Collection(vec![square(0.0, 0.0, 2.0), square(2.0, 0.0, 2.0)]);
        assert_eq!(union(&pair, &pair), Some(pair.normalize()));
    }

    #[test]
    fn overlapping_squares_merge() {
        let result = union(&square(0.0, 0.0, 4.0), &square(2.0, 2.0, 4.0)).unwrap();
        let expected = polygon(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (6.0, 2.0),
            (6.0, 6.0),
            (2.0, 6.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ]);
        assert_eq!(result, expected.normalize());
        let Geometry::Polygon(p) = result else {
            panic!("expected a polygon");
        };
        assert_abs_diff_eq!(p.area(), 28.0, epsilon = 1e-9);
    }

    #[test]
    fn adjacent_squares_lose_shared_edge() {
        let result = union(&square(0.0, 0.0, 2.0), &square(2.0, 0.0, 2.0));
        let expected = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        assert_eq!(result, Some(expected.normalize()));
    }

    #[test]
    fn contained_square_is_absorbed() {
        let outer = square(0.0, 0.0, 10.0);
        assert_eq!(union(&outer, &square(2.0, 2.0, 2.0)), Some(outer.normalize()));
    }

    #[test]
    fn line_is_clipped_to_the_outside() {
        let result = union(&square(0.0, 0.0, 4.0), &line(&[(2.0, 2.0), (8.0, 2.0)]));
        let expected = Geometry::Collection(vec![
            square(0.0, 0.0, 4.0),
            line(&[(4.0, 2.0), (8.0, 2.0)]),
        ]);
        assert_eq!(result, Some(expected.normalize()));
    }

    #[test]
    fn crossing_lines_are_noded() {
        let result = union(
            &line(&[(0.0, 0.0), (4.0, 4.0)]),
            &line(&[(0.0, 4.0), (4.0, 0.0)]),
        )
        .unwrap();
        let Geometry::Collection(members) = result else {
            panic!("expected a collection");
        };
        assert_eq!(members.len(), 4);
        assert!(members
            .iter()
            .all(|m| matches!(m, Geometry::LineString(l) if l.points().len() == 2)));
    }

    #[test]
    fn empty_operands() {
        assert!(union(&Geometry::empty(), &Geometry::empty()).is_none());
        let a = square(0.0, 0.0, 1.0);
        assert_eq!(union(&a, &Geometry::empty()), Some(a.normalize()));
    }
}
