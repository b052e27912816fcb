pub mod bezier_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
mod rect;
mod tolerance;

use std::cmp::Ordering;

pub use rect::Rect;
pub use tolerance::Tolerance;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Lexicographic ordering of points: by `x`, then by `y`.
///
/// This is the canonical vertex order used for link canonicalization,
/// adjacency lists, and ring origins.
#[must_use]
pub fn cmp_points(a: &Point2, b: &Point2) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Returns `true` if both coordinates of `p` are finite.
#[must_use]
pub fn is_finite(p: &Point2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
