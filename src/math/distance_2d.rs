use super::Point2;

/// Parameter of the projection of `p` onto the infinite line through `a`
/// and `b`, where `0` is `a` and `1` is `b`.
///
/// Returns `0` for a degenerate segment.
#[must_use]
pub fn project_param(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return 0.0;
    }
    (p - a).dot(&d) / len_sq
}

/// Returns the minimum distance from point `p` to the line segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let t = project_param(p, a, b).clamp(0.0, 1.0);
    let closest = a + (b - a) * t;
    (p - closest).norm()
}

/// Returns `true` if `p` lies within `eps` of segment `a`–`b` and strictly
/// between its endpoints, i.e. not within `eps` of either end.
#[must_use]
pub fn point_on_segment_interior(p: &Point2, a: &Point2, b: &Point2, eps: f64) -> bool {
    if (p - a).norm() <= eps || (p - b).norm() <= eps {
        return false;
    }
    let t = project_param(p, a, b);
    t > 0.0 && t < 1.0 && point_to_segment_dist(p, a, b) <= eps
}
