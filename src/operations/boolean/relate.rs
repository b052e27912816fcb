use std::ops::ControlFlow;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::geometry::{Geometry, Location};
use crate::math::{Point2, Tolerance};
use crate::relation::Relation;
use crate::topology::Mesh;

use super::classify::relate_point;
use super::engine::{bounds_disjoint, build_meshes};

/// Computes the topological relation between two geometries.
pub struct Relate<'g> {
    a: &'g Geometry,
    b: &'g Geometry,
}

impl<'g> Relate<'g> {
    /// Creates a new `Relate` operation.
    #[must_use]
    pub fn new(a: &'g Geometry, b: &'g Geometry) -> Self {
        Self { a, b }
    }

    /// Executes the relation test.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate cannot be inserted into the
    /// arrangement.
    #[instrument(skip_all, fields(a = self.a.kind(), b = self.b.kind()))]
    pub fn execute(&self, tolerance: Tolerance) -> Result<Relation> {
        let (a, b) = (self.a, self.b);
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ok(Relation::NONE),
            (true, false) => return Ok(Relation::B_OUTSIDE_A),
            (false, true) => return Ok(Relation::A_OUTSIDE_B),
            (false, false) => {}
        }
        if bounds_disjoint(a, b, tolerance) {
            return Ok(Relation::DISJOINT);
        }
        if let Some(relation) = relate_point_fast(a, b, tolerance) {
            return Ok(relation);
        }

        let (mut rings, lines) = build_meshes(a, b, tolerance)?;
        let mut relation = sample(&rings, a, b, tolerance);
        if relation != Relation::ALL {
            relation |= sample(&lines, a, b, tolerance);
        }

        if !relation.contains_all(Relation::OVERLAP) {
            rings.cull_links(|mid| {
                a.locate(mid, tolerance) == Location::Outside
                    || b.locate(mid, tolerance) == Location::Outside
            });
            let shared_ring = rings.for_each_linear_ring(|_| ControlFlow::Break(())).is_break();
            if shared_ring {
                relation |= Relation::OVERLAP;
            }
        }
        debug!(%relation, "related");
        Ok(relation)
    }
}

/// Point/point and point/line or point/polygon relations, answered without a
/// mesh. Collections may be covered by the point and take the general path.
fn relate_point_fast(a: &Geometry, b: &Geometry, tolerance: Tolerance) -> Option<Relation> {
    match (a, b) {
        (Geometry::Point(p), Geometry::Point(q)) => Some(if tolerance.matches_point(p, q) {
            Relation::TOUCH
        } else {
            Relation::DISJOINT
        }),
        (Geometry::Point(p), other @ (Geometry::LineString(_) | Geometry::Polygon(_))) => {
            Some(point_against(p, other, tolerance))
        }
        (other @ (Geometry::LineString(_) | Geometry::Polygon(_)), Geometry::Point(q)) => {
            Some(point_against(q, other, tolerance).flip_ab())
        }
        _ => None,
    }
}

/// Relation of a point `A` against a line string or polygon `B`, which
/// always has material outside a single point.
fn point_against(p: &Point2, other: &Geometry, tolerance: Tolerance) -> Relation {
    let located = match other.locate(p, tolerance) {
        Location::Outside => Relation::A_OUTSIDE_B,
        Location::Boundary => Relation::TOUCH,
        Location::Inside => Relation::A_INSIDE_B,
    };
    located | Relation::B_OUTSIDE_A
}

/// ORs the relation of every vertex and link midpoint of `mesh`, stopping
/// once every bit is set.
fn sample(mesh: &Mesh, a: &Geometry, b: &Geometry, tolerance: Tolerance) -> Relation {
    let mut relation = Relation::NONE;
    for p in mesh
        .points()
        .chain(mesh.links().map(|(p, q)| nalgebra::center(&p, &q)))
    {
        relation |= relate_point(a, b, &p, tolerance);
        if relation == Relation::ALL {
            break;
        }
    }
    relation
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{init_tracing, line, polygon, square, tol};
    use super::*;

    fn relate(a: &Geometry, b: &Geometry) -> Relation {
        init_tracing();
        Relate::new(a, b).execute(tol()).unwrap()
    }

    #[test]
    fn identical_squares_are_topologically_equal() {
        let a = square(0.0, 0.0, 4.0);
        let r = relate(&a, &a);
        assert!(r.contains_all(Relation::TOUCH));
        assert_eq!(r, Relation::TOUCH | Relation::OVERLAP);
        assert!(r.equals_topo());
    }

    #[test]
    fn far_apart_is_disjoint() {
        assert_eq!(relate(&square(0.0, 0.0, 1.0), &square(5.0, 5.0, 1.0)), Relation::DISJOINT);
    }

    #[test]
    fn interleaved_but_apart_is_disjoint() {
        let l = polygon(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 4.0),
            (0.0, 4.0),
        ]);
        let r = relate(&l, &square(2.0, 2.0, 2.0));
        assert_eq!(r, Relation::DISJOINT);
        assert!(r.is_disjoint());
    }

    #[test]
    fn nested_square_is_within() {
        let r = relate(&square(1.0, 1.0, 2.0), &square(0.0, 0.0, 4.0));
        assert_eq!(r, Relation::B_OUTSIDE_A | Relation::OVERLAP);
        assert!(r.within());
        assert!(!r.contains());
        assert!(r.flip_ab().contains());
    }

    #[test]
    fn adjacent_squares_touch() {
        let r = relate(&square(0.0, 0.0, 2.0), &square(2.0, 0.0, 2.0));
        assert_eq!(r, Relation::DISJOINT | Relation::TOUCH);
        assert!(r.touches());
    }

    #[test]
    fn overlapping_squares_overlap() {
        let r = relate(&square(0.0, 0.0, 4.0), &square(2.0, 2.0, 4.0));
        assert_eq!(r, Relation::ALL);
        assert!(r.overlaps());
    }

    #[test]
    fn point_fast_paths() {
        let p = Geometry::point(1.0, 1.0).unwrap();
        let q = Geometry::point(1.0, 1.0).unwrap();
        assert_eq!(relate(&p, &q), Relation::TOUCH);
        assert_eq!(relate(&p, &Geometry::point(1.5, 1.0).unwrap()), Relation::DISJOINT);

        let sq = square(0.0, 0.0, 4.0);
        assert_eq!(relate(&p, &sq), Relation::A_INSIDE_B | Relation::B_OUTSIDE_A);
        assert_eq!(relate(&sq, &p), Relation::B_INSIDE_A | Relation::A_OUTSIDE_B);
        let corner = Geometry::point(0.0, 0.0).unwrap();
        assert_eq!(relate(&corner, &sq), Relation::TOUCH | Relation::B_OUTSIDE_A);
    }

    #[test]
    fn point_against_collection_of_that_point_only_touches() {
        let p = Geometry::point(1.0, 1.0).unwrap();
        let same = Geometry::Collection(vec![p.clone(), p.clone()]);
        assert_eq!(relate(&p, &Geometry::Collection(vec![p.clone()])), Relation::TOUCH);
        assert_eq!(relate(&same, &p), Relation::TOUCH);

        let spread = Geometry::Collection(vec![p.clone(), Geometry::point(3.0, 1.0).unwrap()]);
        assert_eq!(relate(&p, &spread), Relation::TOUCH | Relation::B_OUTSIDE_A);
    }

    #[test]
    fn gap_within_tolerance_touches() {
        init_tracing();
        let coarse = Tolerance::new(0.05).unwrap();
        let r = Relate::new(&square(0.0, 0.0, 1.0), &square(1.02, 0.0, 1.0))
            .execute(coarse)
            .unwrap();
        assert_eq!(r, Relation::DISJOINT | Relation::TOUCH);
        assert!(r.touches());
    }

    #[test]
    fn empty_operands() {
        let sq = square(0.0, 0.0, 1.0);
        assert_eq!(relate(&Geometry::empty(), &Geometry::empty()), Relation::NONE);
        assert_eq!(relate(&Geometry::empty(), &sq), Relation::B_OUTSIDE_A);
        assert_eq!(relate(&sq, &Geometry::empty()), Relation::A_OUTSIDE_B);
    }

    #[test]
    fn line_crossing_square() {
        let r = relate(&line(&[(-2.0, 2.0), (6.0, 2.0)]), &square(0.0, 0.0, 4.0));
        assert_eq!(
            r,
            Relation::A_OUTSIDE_B | Relation::B_OUTSIDE_A | Relation::TOUCH | Relation::A_INSIDE_B
        );
        assert!(r.intersects());
        assert!(!r.within());
    }
}
