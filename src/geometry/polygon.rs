use crate::error::GeometryError;
use crate::math::polygon_2d::{
    cmp_sequences, locate_in_ring, remove_collinear, rotate_to_canonical_start, signed_area_2d,
    Location,
};
use crate::math::{is_finite, Point2, Rect, Tolerance};

/// A closed ring of at least three points. The closing segment back to the
/// first point is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    points: Vec<Point2>,
}

impl LinearRing {
    /// Creates a ring. A trailing point equal to the first one is dropped, as
    /// are consecutive duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if any coordinate is non-finite or fewer than three
    /// distinct points remain.
    pub fn new(mut points: Vec<Point2>) -> Result<Self, GeometryError> {
        if let Some(bad) = points.iter().find(|p| !is_finite(p)) {
            return Err(GeometryError::NonFinite { x: bad.x, y: bad.y });
        }
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                kind: "linear ring",
                required: 3,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Builds a ring from mesh output, dropping pass-through vertices.
    pub(crate) fn from_extracted(points: &[Point2], tolerance: Tolerance) -> Option<Self> {
        Self::new(remove_collinear(points, true, tolerance.value())).ok()
    }

    /// The vertices, without the closing repetition.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Signed area: positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Bounding rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        // A ring always holds at least three points.
        Rect::from_points(&self.points).unwrap_or_else(|| Rect::from_point(&Point2::origin()))
    }

    /// Locates `p` relative to the area enclosed by the ring.
    #[must_use]
    pub fn locate(&self, p: &Point2, tolerance: Tolerance) -> Location {
        locate_in_ring(p, &self.points, tolerance.value())
    }

    /// Returns the ring oriented counter-clockwise (`ccw`) or clockwise and
    /// rotated to start at its lowest vertex.
    #[must_use]
    pub fn normalized(&self, ccw: bool) -> Self {
        let mut points = rotate_to_canonical_start(&self.points);
        if (self.signed_area() > 0.0) != ccw {
            points[1..].reverse();
        }
        Self { points }
    }
}

/// A polygon: an outer ring with zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    outer: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a polygon from an outer ring and its holes.
    #[must_use]
    pub fn new(outer: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { outer, holes }
    }

    /// Creates a polygon without holes from raw coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates do not form a valid ring.
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Self, GeometryError> {
        let ring = LinearRing::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())?;
        Ok(Self::new(ring, Vec::new()))
    }

    /// The outer ring.
    #[must_use]
    pub fn outer(&self) -> &LinearRing {
        &self.outer
    }

    /// The holes.
    #[must_use]
    pub fn holes(&self) -> &[LinearRing] {
        &self.holes
    }

    /// Enclosed area, holes excluded.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outer.signed_area().abs()
            - self
                .holes
                .iter()
                .map(|h| h.signed_area().abs())
                .sum::<f64>()
    }

    /// Bounding rectangle of the outer ring.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.outer.bounds()
    }

    /// Locates `p` relative to the polygon's area.
    #[must_use]
    pub fn locate(&self, p: &Point2, tolerance: Tolerance) -> Location {
        match self.outer.locate(p, tolerance) {
            Location::Inside => {
                for hole in &self.holes {
                    match hole.locate(p, tolerance) {
                        Location::Inside => return Location::Outside,
                        Location::Boundary => return Location::Boundary,
                        Location::Outside => {}
                    }
                }
                Location::Inside
            }
            other => other,
        }
    }

    /// Canonical form: counter-clockwise outer ring, clockwise holes, each
    /// ring starting at its lowest vertex, holes sorted.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut holes: Vec<LinearRing> = self.holes.iter().map(|h| h.normalized(false)).collect();
        holes.sort_by(|a, b| cmp_sequences(a.points(), b.points()));
        Self {
            outer: self.outer.normalized(true),
            holes,
        }
    }
}
