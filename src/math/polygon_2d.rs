use std::cmp::Ordering;

use super::distance_2d::point_to_segment_dist;
use super::{cmp_points, Point2};

/// Location of a point relative to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Outside,
    Boundary,
    Inside,
}

/// Computes the signed area of a ring (shoelace formula). The ring is
/// implicitly closed.
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Rotates a ring so it starts at its lowest vertex (smallest x, then
/// smallest y).
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    let Some(best) = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| cmp_points(a, b))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Lexicographic comparison of two coordinate sequences.
#[must_use]
pub fn cmp_sequences(a: &[Point2], b: &[Point2]) -> Ordering {
    for (p, q) in a.iter().zip(b) {
        let ord = cmp_points(p, q);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Locates `p` relative to an implicitly closed ring.
///
/// Points within `eps` of any ring segment are on the boundary; otherwise
/// the even-odd crossing rule decides.
#[must_use]
pub fn locate_in_ring(p: &Point2, ring: &[Point2], eps: f64) -> Location {
    let n = ring.len();
    if n == 0 {
        return Location::Outside;
    }
    let mut inside = false;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if point_to_segment_dist(p, a, b) <= eps {
            return Location::Boundary;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    if inside {
        Location::Inside
    } else {
        Location::Outside
    }
}

/// Returns `true` if `p` lies within `eps` of any segment of the open
/// polyline `points`.
#[must_use]
pub fn point_on_polyline(p: &Point2, points: &[Point2], eps: f64) -> bool {
    match points {
        [] => false,
        [only] => (p - only).norm() <= eps,
        _ => points
            .windows(2)
            .any(|w| point_to_segment_dist(p, &w[0], &w[1]) <= eps),
    }
}

/// Drops pass-through vertices that lie within `eps` of the segment joining
/// their neighbours.
///
/// For `closed` rings every vertex is a candidate; for open polylines the
/// endpoints are always kept.
#[must_use]
pub fn remove_collinear(points: &[Point2], closed: bool, eps: f64) -> Vec<Point2> {
    let mut pts = points.to_vec();
    loop {
        let n = pts.len();
        let min_len = if closed { 3 } else { 2 };
        if n <= min_len {
            return pts;
        }
        let candidate = (0..n).find(|&i| {
            if !closed && (i == 0 || i == n - 1) {
                return false;
            }
            let prev = &pts[(i + n - 1) % n];
            let next = &pts[(i + 1) % n];
            let t = super::distance_2d::project_param(&pts[i], prev, next);
            t > 0.0 && t < 1.0 && point_to_segment_dist(&pts[i], prev, next) <= eps
        });
        match candidate {
            Some(i) => {
                pts.remove(i);
            }
            None => return pts,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const TOL: f64 = 1e-10;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_abs_diff_eq!(signed_area_2d(&unit_square()), 1.0, epsilon = TOL);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = unit_square();
        pts.reverse();
        assert_abs_diff_eq!(signed_area_2d(&pts), -1.0, epsilon = TOL);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_abs_diff_eq!(signed_area_2d(&[Point2::new(0.0, 0.0)]), 0.0);
        assert_abs_diff_eq!(signed_area_2d(&[]), 0.0);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert_eq!(rotated[0], Point2::new(0.0, 0.0));
        assert_eq!(rotated[1], Point2::new(1.0, 0.0));
        assert!(rotate_to_canonical_start(&[]).is_empty());
    }

    #[test]
    fn locate_in_square() {
        let sq = unit_square();
        assert_eq!(locate_in_ring(&Point2::new(0.5, 0.5), &sq, TOL), Location::Inside);
        assert_eq!(locate_in_ring(&Point2::new(1.5, 0.5), &sq, TOL), Location::Outside);
        assert_eq!(locate_in_ring(&Point2::new(1.0, 0.5), &sq, TOL), Location::Boundary);
        assert_eq!(locate_in_ring(&Point2::new(0.0, 0.0), &sq, TOL), Location::Boundary);
    }

    #[test]
    fn locate_respects_eps() {
        let sq = unit_square();
        let p = Point2::new(1.04, 0.5);
        assert_eq!(locate_in_ring(&p, &sq, 0.05), Location::Boundary);
        assert_eq!(locate_in_ring(&p, &sq, 0.01), Location::Outside);
    }

    #[test]
    fn polyline_membership() {
        let line = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(4.0, 4.0)];
        assert!(point_on_polyline(&Point2::new(4.0, 2.0), &line, TOL));
        assert!(!point_on_polyline(&Point2::new(2.0, 2.0), &line, TOL));
        assert!(point_on_polyline(&Point2::new(1.0, 1.0), &[Point2::new(1.0, 1.0)], TOL));
    }

    #[test]
    fn collinear_vertices_dropped() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.0, 1.0),
        ];
        let cleaned = remove_collinear(&ring, true, TOL);
        assert_eq!(cleaned.len(), 4);

        let line = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(
            remove_collinear(&line, false, TOL),
            vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)]
        );
    }

    #[test]
    fn sequence_ordering() {
        let a = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let b = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(cmp_sequences(&a, &b), Ordering::Less);
        assert_eq!(cmp_sequences(&a, &a[..1]), Ordering::Greater);
    }
}
