use super::Point2;

/// Upper bound on the number of chords produced for one curve.
const MAX_SUBDIVISIONS: u32 = 1024;

/// Evaluates a cubic Bézier curve at parameter `t`.
#[must_use]
pub fn cubic_point_at(p0: &Point2, c1: &Point2, c2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point2::new(
        a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    )
}

/// Number of chords needed so that the polyline deviates from the cubic by at
/// most `tolerance`.
///
/// Uses the second-difference bound: `n = sqrt(3/4 * max|Δ²P| / tolerance)`.
#[must_use]
pub fn cubic_subdivision_count(
    p0: &Point2,
    c1: &Point2,
    c2: &Point2,
    p3: &Point2,
    tolerance: f64,
) -> u32 {
    if tolerance <= 0.0 {
        return 1;
    }
    let d1 = (p0.coords - c1.coords * 2.0 + c2.coords).norm();
    let d2 = (c1.coords - c2.coords * 2.0 + p3.coords).norm();
    let dd = 0.75 * d1.max(d2);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (dd / tolerance).sqrt().ceil() as u32;
    n.clamp(1, MAX_SUBDIVISIONS)
}

/// Flattens a cubic Bézier into points, excluding `p0` and including `p3`.
#[must_use]
pub fn flatten_cubic(
    p0: &Point2,
    c1: &Point2,
    c2: &Point2,
    p3: &Point2,
    tolerance: f64,
) -> Vec<Point2> {
    let n = cubic_subdivision_count(p0, c1, c2, p3, tolerance);
    let mut points = Vec::with_capacity(n as usize);
    for j in 1..n {
        let t = f64::from(j) / f64::from(n);
        points.push(cubic_point_at(p0, c1, c2, p3, t));
    }
    points.push(*p3);
    points
}
