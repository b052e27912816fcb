use super::{Point2, Vector2};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    // Relative parallelism threshold: the cross product scales with both lengths.
    if cross.abs() <= 1e-12 * d1.norm() * d2.norm() {
        return None;
    }
    let d = p2 - p1;
    let t = d.perp(d2) / cross;
    let u = d.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// `eps` is a distance: hits up to `eps` beyond either segment's endpoints
/// are still reported, with the parameters clamped into `[0, 1]`.
///
/// Returns `(intersection_point, t, u)`, or `None` for parallel or
/// non-touching segments. Collinear overlaps are reported as `None`; callers
/// detect them through endpoint-on-segment tests.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    eps: f64,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let eps_t = eps / da.norm();
    let eps_u = eps / db.norm();
    if t >= -eps_t && t <= 1.0 + eps_t && u >= -eps_u && u <= 1.0 + eps_u {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((point_at(a0, &da, t_clamped), t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}
