use std::ops::ControlFlow;

use tracing::debug;

use crate::geometry::{Geometry, LineString, LinearRing, Location, Polygon};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Tolerance, Vector2};
use crate::topology::Mesh;

/// Assembles the geometry left in a culled pair of meshes.
///
/// Each ring bounds one face of the arrangement; `filled` is asked whether a
/// point just inside a ring belongs to the result. Every filled ring becomes
/// the outer boundary of a polygon whose holes are the rings nested directly
/// inside it. Line strings and points already covered by the assembled
/// polygons are dropped. The result is normalized; `None` means nothing
/// survived.
pub fn assemble_result<F>(rings: &Mesh, lines: &Mesh, tolerance: Tolerance, filled: F) -> Option<Geometry>
where
    F: Fn(&Point2) -> bool,
{
    let polygons = build_polygons(rings, tolerance, filled);
    let mut members: Vec<Geometry> = polygons.into_iter().map(Geometry::from).collect();
    let area = Geometry::Collection(members.clone());

    let mut strings = Vec::new();
    let _ = lines.for_each_line_string(|points| {
        if let Some(line) = LineString::from_extracted(points, tolerance) {
            if !line_covered(&area, &line, tolerance) {
                strings.push(line);
            }
        }
        ControlFlow::Continue(())
    });
    let linear = Geometry::Collection(strings.iter().cloned().map(Geometry::from).collect());

    let mut points = Vec::new();
    let _ = lines.for_each_point(|p| {
        if area.locate(p, tolerance) == Location::Outside
            && linear.locate(p, tolerance) == Location::Outside
        {
            points.push(*p);
        }
        ControlFlow::Continue(())
    });

    debug!(
        polygons = members.len(),
        lines = strings.len(),
        points = points.len(),
        "assembled result"
    );
    members.extend(strings.into_iter().map(Geometry::from));
    members.extend(points.into_iter().map(Geometry::from));
    Geometry::Collection(members).normalize().non_empty()
}

fn build_polygons<F>(rings: &Mesh, tolerance: Tolerance, filled: F) -> Vec<Polygon>
where
    F: Fn(&Point2) -> bool,
{
    let min_area = tolerance.value() * tolerance.value();
    let mut found: Vec<(LinearRing, bool)> = Vec::new();
    let _ = rings.for_each_linear_ring(|points| {
        if let Some(ring) = LinearRing::from_extracted(points, tolerance) {
            if ring.signed_area().abs() > min_area {
                let fill = inner_sample(points, tolerance).is_some_and(|p| filled(&p));
                found.push((ring, fill));
            }
        }
        ControlFlow::Continue(())
    });
    found.sort_by(|(a, _), (b, _)| b.signed_area().abs().total_cmp(&a.signed_area().abs()));
    let (found, fill): (Vec<LinearRing>, Vec<bool>) = found.into_iter().unzip();

    // Holes of ring j: the rings whose smallest container is j.
    let mut holes: Vec<Vec<LinearRing>> = vec![Vec::new(); found.len()];
    for i in 0..found.len() {
        if let Some(j) = (0..i).rev().find(|&j| ring_contains(&found[j], &found[i], tolerance)) {
            holes[j].push(found[i].clone());
        }
    }
    found
        .into_iter()
        .zip(holes)
        .zip(fill)
        .filter(|(_, fill)| *fill)
        .map(|((outer, holes), _)| Polygon::new(outer, holes))
        .collect()
}

/// A point `2ε` inside the ring `pts` from the middle of its longest link,
/// which lies in the face the ring was extracted around.
fn inner_sample(pts: &[Point2], tolerance: Tolerance) -> Option<Point2> {
    let n = pts.len();
    let (p, q) = (0..n)
        .map(|i| (pts[i], pts[(i + 1) % n]))
        .max_by(|x, y| (x.1 - x.0).norm_squared().total_cmp(&(y.1 - y.0).norm_squared()))?;
    let d = q - p;
    let len = d.norm();
    if len < f64::MIN_POSITIVE {
        return None;
    }
    let inward = signed_area_2d(pts).signum() * 2.0 * tolerance.value() / len;
    Some(nalgebra::center(&p, &q) + Vector2::new(-d.y, d.x) * inward)
}

/// Returns `true` if `inner` lies within the area of `outer`. Ring points on
/// `outer`'s boundary are inconclusive; a ring entirely on it is not
/// contained.
fn ring_contains(outer: &LinearRing, inner: &LinearRing, tolerance: Tolerance) -> bool {
    let pts = inner.points();
    let n = pts.len();
    let samples = pts
        .iter()
        .copied()
        .chain((0..n).map(|i| nalgebra::center(&pts[i], &pts[(i + 1) % n])));
    for p in samples {
        match outer.locate(&p, tolerance) {
            Location::Inside => return true,
            Location::Outside => return false,
            Location::Boundary => {}
        }
    }
    false
}

/// Returns `true` if every vertex and segment midpoint of `line` lies in or
/// on `area`.
fn line_covered(area: &Geometry, line: &LineString, tolerance: Tolerance) -> bool {
    if !area.has_area() {
        return false;
    }
    let pts = line.points();
    let covered = |p: &Point2| area.locate(p, tolerance) != Location::Outside;
    pts.iter().all(covered)
        && pts
            .windows(2)
            .all(|w| covered(&nalgebra::center(&w[0], &w[1])))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn tol() -> Tolerance {
        Tolerance::new(1.0 / 1024.0).unwrap()
    }

    fn add_ring(m: &mut Mesh, coords: &[(f64, f64)]) {
        for i in 0..coords.len() {
            let (a, b) = (coords[i], coords[(i + 1) % coords.len()]);
            m.add_link(a.0, a.1, b.0, b.1).unwrap();
        }
    }

    #[test]
    fn nested_rings_become_polygon_with_hole_and_island() {
        let mut rings = Mesh::new(tol());
        add_ring(&mut rings, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        add_ring(&mut rings, &[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)]);
        add_ring(&mut rings, &[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
        let lines = Mesh::new(tol());
        // The band between the two outer rings and the innermost square.
        let filled = |p: &Point2| {
            let d = (p.x - 5.0).abs().max((p.y - 5.0).abs());
            d > 3.0 || d < 1.0
        };

        let Some(Geometry::Collection(members)) = assemble_result(&rings, &lines, tol(), filled) else {
            panic!("expected two polygons");
        };
        assert_eq!(members.len(), 2);
        let areas: Vec<f64> = members
            .iter()
            .map(|m| match m {
                Geometry::Polygon(p) => p.area(),
                _ => 0.0,
            })
            .collect();
        assert_abs_diff_eq!(areas.iter().sum::<f64>(), 100.0 - 36.0 + 4.0, epsilon = 1e-9);
    }

    #[test]
    fn covered_lines_and_points_are_dropped() {
        let mut rings = Mesh::new(tol());
        add_ring(&mut rings, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let mut lines = Mesh::new(tol());
        lines.add_link(1.0, 1.0, 3.0, 1.0).unwrap();
        lines.add_link(5.0, 0.0, 5.0, 4.0).unwrap();
        lines.add_vertex(2.0, 2.0).unwrap();
        lines.add_vertex(5.0, 2.0).unwrap();
        lines.add_vertex(9.0, 9.0).unwrap();

        let Some(Geometry::Collection(members)) = assemble_result(&rings, &lines, tol(), |_| true)
        else {
            panic!("expected a collection");
        };
        assert_eq!(members.len(), 3);
        assert!(matches!(members[0], Geometry::Point(p) if p == Point2::new(9.0, 9.0)));
        assert!(matches!(&members[1], Geometry::LineString(l) if l.points().len() == 2));
        assert!(matches!(members[2], Geometry::Polygon(_)));
    }

    #[test]
    fn empty_meshes_assemble_to_nothing() {
        assert!(assemble_result(&Mesh::new(tol()), &Mesh::new(tol()), tol(), |_| true).is_none());
    }

    #[test]
    fn unfilled_faces_are_left_out() {
        let mut rings = Mesh::new(tol());
        add_ring(&mut rings, &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        add_ring(&mut rings, &[(2.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0)]);
        let lines = Mesh::new(tol());

        let both = assemble_result(&rings, &lines, tol(), |_| true);
        let Some(Geometry::Collection(members)) = both else {
            panic!("expected two polygons");
        };
        assert_eq!(members.len(), 2);

        let left = assemble_result(&rings, &lines, tol(), |p| p.x < 2.0).unwrap();
        let Geometry::Polygon(p) = left else {
            panic!("expected a polygon");
        };
        assert_abs_diff_eq!(p.area(), 4.0, epsilon = 1e-9);
        assert!(p.holes().is_empty());
    }
}
