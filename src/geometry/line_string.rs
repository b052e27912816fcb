use crate::error::GeometryError;
use crate::math::polygon_2d::{
    cmp_sequences, point_on_polyline, remove_collinear, rotate_to_canonical_start,
};
use crate::math::{cmp_points, is_finite, Point2, Rect, Tolerance};

/// An open or closed polyline of at least two distinct points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    points: Vec<Point2>,
}

impl LineString {
    /// Creates a line string.
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is non-finite or if the points do
    /// not contain at least two distinct positions.
    pub fn new(points: Vec<Point2>) -> Result<Self, GeometryError> {
        if let Some(bad) = points.iter().find(|p| !is_finite(p)) {
            return Err(GeometryError::NonFinite { x: bad.x, y: bad.y });
        }
        let distinct = points.first().map_or(0, |first| {
            if points.iter().any(|p| p != first) {
                2
            } else {
                1
            }
        });
        if distinct < 2 {
            return Err(GeometryError::TooFewPoints {
                kind: "line string",
                required: 2,
                actual: distinct,
            });
        }
        Ok(Self { points })
    }

    /// Builds a line string from mesh output, dropping pass-through vertices.
    pub(crate) fn from_extracted(points: &[Point2], tolerance: Tolerance) -> Option<Self> {
        let closed = points.len() > 2 && points.first() == points.last();
        let cleaned = if closed {
            let mut ring = remove_collinear(&points[..points.len() - 1], true, tolerance.value());
            if let Some(&first) = ring.first() {
                ring.push(first);
            }
            ring
        } else {
            remove_collinear(points, false, tolerance.value())
        };
        Self::new(cleaned).ok()
    }

    /// The vertices, in order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns `true` if the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }

    /// Returns `true` if `p` lies on the polyline within tolerance.
    #[must_use]
    pub fn contains_point(&self, p: &Point2, tolerance: Tolerance) -> bool {
        point_on_polyline(p, &self.points, tolerance.value())
    }

    /// Canonical form: open lines start at their lower endpoint, closed lines
    /// start at their lowest vertex and run in the lexicographically smaller
    /// direction.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut points = self.points.clone();
        if self.is_closed() {
            points.pop();
            let forward = rotate_to_canonical_start(&points);
            let mut backward = forward.clone();
            backward[1..].reverse();
            let mut best = if cmp_sequences(&backward, &forward).is_lt() {
                backward
            } else {
                forward
            };
            best.push(best[0]);
            points = best;
        } else if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if cmp_points(last, first).is_lt() {
                points.reverse();
            }
        }
        Self { points }
    }
}
