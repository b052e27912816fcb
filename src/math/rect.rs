use super::Point2;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Rect {
    /// Creates a rectangle from its corner coordinates. The corners are
    /// reordered so that `min <= max` on both axes.
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point2::new(min_x.min(max_x), min_y.min(max_y)),
            max: Point2::new(min_x.max(max_x), min_y.max(max_y)),
        }
    }

    /// Smallest rectangle containing both points.
    #[must_use]
    pub fn from_corners(a: &Point2, b: &Point2) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Degenerate rectangle covering a single point.
    #[must_use]
    pub fn from_point(p: &Point2) -> Self {
        Self { min: *p, max: *p }
    }

    /// Smallest rectangle containing all points, or `None` if empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        points.into_iter().fold(None, |acc: Option<Rect>, p| {
            Some(acc.map_or_else(|| Rect::from_point(p), |r| r.including(p)))
        })
    }

    /// Returns this rectangle grown to include `p`.
    #[must_use]
    pub fn including(&self, p: &Point2) -> Self {
        Self {
            min: Point2::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point2::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// Smallest rectangle containing both rectangles.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Self {
        self.including(&other.min).including(&other.max)
    }

    /// Returns this rectangle grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Closed-interval overlap test: touching rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Returns `true` if `p` lies inside or on the rectangle.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }
}
