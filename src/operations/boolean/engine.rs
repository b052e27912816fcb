use tracing::debug;

use crate::error::Result;
use crate::geometry::{Geometry, Location};
use crate::math::{Point2, Tolerance};
use crate::topology::{Mesh, MeshBuilder};

use super::assemble::assemble_result;
use super::classify::covers;
use super::select::{
    keep_line_material, resolve_shared_link, ring_link_decision, BooleanOp, LinkDecision,
};

/// Decomposes both operands into a rings mesh and a lines-and-points mesh,
/// with every crossing between the two made explicit in both.
pub(super) fn build_meshes(a: &Geometry, b: &Geometry, tolerance: Tolerance) -> Result<(Mesh, Mesh)> {
    let mut builder = MeshBuilder::new(tolerance);
    a.draw(&mut builder)?;
    b.draw(&mut builder)?;
    let (mut rings, mut lines) = builder.finish()?;
    let ring_splits = rings.split_at_crossings(&lines)?;
    let line_splits = lines.split_at_crossings(&rings)?;
    debug!(ring_splits, line_splits, "made crossings explicit");
    Ok((rings, lines))
}

/// Returns `true` if the operands cannot interact: either is empty or their
/// bounding rectangles are more than `tolerance` apart.
pub(super) fn bounds_disjoint(a: &Geometry, b: &Geometry, tolerance: Tolerance) -> bool {
    match (a.bounds(), b.bounds()) {
        (Some(ra), Some(rb)) => !ra.expanded(tolerance.value()).intersects(&rb),
        _ => true,
    }
}

/// Executes a boolean operation on two geometries.
///
/// Orchestrates the full pipeline: mesh construction, culling of ring links
/// and line material, and assembly of the surviving arrangement. A face
/// enclosed by the surviving rings is filled when points inside it belong to
/// the result.
pub(super) fn boolean_execute(
    a: &Geometry,
    b: &Geometry,
    op: BooleanOp,
    tolerance: Tolerance,
) -> Result<Option<Geometry>> {
    if bounds_disjoint(a, b, tolerance) {
        return Ok(handle_disjoint(a, b, op));
    }

    let (mut rings, mut lines) = build_meshes(a, b, tolerance)?;

    let mut residue = Residue::default();
    let culled_rings = cull_rings(&mut rings, a, b, op, tolerance, &mut residue);
    let culled_lines = cull_lines(&mut lines, a, b, op, tolerance);
    residue.apply(&mut lines)?;

    debug!(
        ?op,
        culled_rings,
        culled_lines,
        ring_links = rings.link_count(),
        line_links = lines.link_count(),
        "culled arrangement"
    );

    let filled = |p: &Point2| {
        op.combine(
            a.locate_area(p, tolerance) == Location::Inside,
            b.locate_area(p, tolerance) == Location::Inside,
        )
    };
    Ok(assemble_result(&rings, &lines, tolerance, filled))
}

/// Result for operands whose bounds do not meet.
fn handle_disjoint(a: &Geometry, b: &Geometry, op: BooleanOp) -> Option<Geometry> {
    match op {
        BooleanOp::Union | BooleanOp::Xor => {
            Geometry::Collection(vec![a.clone(), b.clone()]).normalize().non_empty()
        }
        BooleanOp::Intersect => None,
        BooleanOp::Subtract => a.normalize().non_empty(),
    }
}

/// Shared boundary material of an intersection that bounds no area: edges
/// and corners where the operands only touch.
#[derive(Debug, Default)]
struct Residue {
    lines: Vec<(Point2, Point2)>,
    points: Vec<Point2>,
}

impl Residue {
    fn apply(self, lines: &mut Mesh) -> Result<()> {
        for (p, q) in self.lines {
            lines.add_link(p.x, p.y, q.x, q.y)?;
        }
        for p in self.points {
            lines.add_vertex(p.x, p.y)?;
        }
        Ok(())
    }
}

fn cull_rings(
    rings: &mut Mesh,
    a: &Geometry,
    b: &Geometry,
    op: BooleanOp,
    tolerance: Tolerance,
    residue: &mut Residue,
) -> usize {
    let links = rings.cull_segments(|p, q| {
        let mid = nalgebra::center(p, q);
        let decision = ring_link_decision(
            op,
            a.locate_area(&mid, tolerance),
            b.locate_area(&mid, tolerance),
        );
        match decision {
            LinkDecision::Keep => false,
            LinkDecision::Discard => true,
            LinkDecision::BothSides => {
                let keep = resolve_shared_link(op, a, b, p, q, tolerance);
                if !keep && op == BooleanOp::Intersect {
                    residue.lines.push((*p, *q));
                }
                !keep
            }
        }
    });
    let vertices = rings.cull_isolated(|p| {
        if op == BooleanOp::Intersect && covers(a, p, tolerance) && covers(b, p, tolerance) {
            residue.points.push(*p);
        }
        true
    });
    links + vertices
}

fn cull_lines(lines: &mut Mesh, a: &Geometry, b: &Geometry, op: BooleanOp, tolerance: Tolerance) -> usize {
    let links = lines.cull_links(|mid| !keep_line_material(op, a, b, mid, tolerance));
    links + lines.cull_isolated(|p| !keep_line_material(op, a, b, p, tolerance))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};

    fn tol() -> Tolerance {
        Tolerance::new(1.0 / 1024.0).unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Polygon::from_coords(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
            .unwrap()
            .into()
    }

    #[test]
    fn build_meshes_separates_rings_and_lines() {
        let line: Geometry = LineString::new(vec![Point2::new(-1.0, 1.0), Point2::new(3.0, 1.0)])
            .unwrap()
            .into();
        let (rings, lines) = build_meshes(&square(0.0, 0.0, 2.0), &line, tol()).unwrap();
        // Both ring sides crossed by the line gain a vertex.
        assert_eq!(rings.link_count(), 6);
        assert!(rings.vertex_at(0.0, 1.0).is_some());
        assert!(rings.vertex_at(2.0, 1.0).is_some());
        assert_eq!(lines.link_count(), 3);
    }

    #[test]
    fn disjoint_bounds_short_circuit() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        assert!(bounds_disjoint(&a, &b, tol()));
        assert!(bounds_disjoint(&a, &Geometry::empty(), tol()));
        assert!(!bounds_disjoint(&a, &square(1.0, 0.0, 1.0), tol()));

        assert!(boolean_execute(&a, &b, BooleanOp::Intersect, tol()).unwrap().is_none());
        assert_eq!(
            boolean_execute(&a, &b, BooleanOp::Subtract, tol()).unwrap(),
            Some(a.normalize())
        );
        let Some(Geometry::Collection(members)) =
            boolean_execute(&a, &b, BooleanOp::Union, tol()).unwrap()
        else {
            panic!("expected a collection");
        };
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn gap_within_tolerance_is_not_disjoint() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.02, 0.0, 1.0);
        assert!(!bounds_disjoint(&a, &b, Tolerance::new(0.05).unwrap()));
        assert!(bounds_disjoint(&a, &b, tol()));
    }
}
