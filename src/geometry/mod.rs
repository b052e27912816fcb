//! Immutable geometry values and the path adapter that feeds them into an
//! arrangement.

mod line_string;
mod path;
mod polygon;

use std::cmp::Ordering;

pub use line_string::LineString;
pub use path::{PathCommand, PathSink};
pub use polygon::{LinearRing, Polygon};

pub use crate::math::polygon_2d::Location;

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::cmp_sequences;
use crate::math::{cmp_points, Point2, Rect, Tolerance};

/// A planar geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point2),
    LineString(LineString),
    Polygon(Polygon),
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Creates a point geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is non-finite.
    pub fn point(x: f64, y: f64) -> std::result::Result<Self, GeometryError> {
        if x.is_finite() && y.is_finite() {
            Ok(Self::Point(Point2::new(x, y)))
        } else {
            Err(GeometryError::NonFinite { x, y })
        }
    }

    /// The empty geometry.
    #[must_use]
    pub fn empty() -> Self {
        Self::Collection(Vec::new())
    }

    /// Short name of the variant, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::LineString(_) => "line_string",
            Self::Polygon(_) => "polygon",
            Self::Collection(_) => "collection",
        }
    }

    /// Returns `true` if the geometry holds no material at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Collection(members) => members.iter().all(Geometry::is_empty),
            _ => false,
        }
    }

    /// Returns `None` for empty geometries.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Returns `true` if any part of the geometry encloses area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        match self {
            Self::Polygon(_) => true,
            Self::Collection(members) => members.iter().any(Geometry::has_area),
            _ => false,
        }
    }

    /// Bounding rectangle, or `None` for an empty geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Point(p) => Some(Rect::from_point(p)),
            Self::LineString(line) => line.bounds(),
            Self::Polygon(poly) => Some(poly.bounds()),
            Self::Collection(members) => members
                .iter()
                .filter_map(Geometry::bounds)
                .reduce(|a, b| a.union(&b)),
        }
    }

    /// Locates `p` relative to the geometry.
    ///
    /// Polygon interiors are [`Location::Inside`]; polygon rings, line
    /// strings, and points are [`Location::Boundary`]. For collections the
    /// strongest member location wins.
    #[must_use]
    pub fn locate(&self, p: &Point2, tolerance: Tolerance) -> Location {
        match self {
            Self::Point(q) => {
                if tolerance.matches_point(p, q) {
                    Location::Boundary
                } else {
                    Location::Outside
                }
            }
            Self::LineString(line) => {
                if line.contains_point(p, tolerance) {
                    Location::Boundary
                } else {
                    Location::Outside
                }
            }
            Self::Polygon(poly) => poly.locate(p, tolerance),
            Self::Collection(members) => strongest(members.iter().map(|m| m.locate(p, tolerance))),
        }
    }

    /// Locates `p` relative to the polygonal parts only; points and line
    /// strings are ignored.
    #[must_use]
    pub fn locate_area(&self, p: &Point2, tolerance: Tolerance) -> Location {
        match self {
            Self::Point(_) | Self::LineString(_) => Location::Outside,
            Self::Polygon(poly) => poly.locate(p, tolerance),
            Self::Collection(members) => {
                strongest(members.iter().map(|m| m.locate_area(p, tolerance)))
            }
        }
    }

    /// Emits the geometry's boundary as path commands.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by the sink.
    pub fn draw<S: PathSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            Self::Point(p) => {
                sink.move_to(p.x, p.y)?;
                sink.close_path()
            }
            Self::LineString(line) => draw_points(sink, line.points(), false),
            Self::Polygon(poly) => {
                draw_points(sink, poly.outer().points(), true)?;
                for hole in poly.holes() {
                    draw_points(sink, hole.points(), true)?;
                }
                Ok(())
            }
            Self::Collection(members) => members.iter().try_for_each(|m| m.draw(sink)),
        }
    }

    /// Canonical form for structural comparison.
    ///
    /// Nested collections are flattened, every member is put in canonical
    /// form, members are sorted, and a single-member collection collapses to
    /// its member.
    #[must_use]
    pub fn normalize(&self) -> Self {
        match self {
            Self::Point(p) => Self::Point(*p),
            Self::LineString(line) => Self::LineString(line.normalized()),
            Self::Polygon(poly) => Self::Polygon(poly.normalized()),
            Self::Collection(_) => {
                let mut members = Vec::new();
                self.flatten_into(&mut members);
                let mut members: Vec<Geometry> = members.iter().map(|m| m.normalize()).collect();
                members.sort_by(cmp_geometry);
                members.dedup();
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    Self::Collection(members)
                }
            }
        }
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Geometry>) {
        match self {
            Self::Collection(members) => {
                for m in members {
                    m.flatten_into(out);
                }
            }
            other => out.push(other),
        }
    }
}

impl From<Point2> for Geometry {
    fn from(p: Point2) -> Self {
        Self::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Self::LineString(line)
    }
}

impl From<Polygon> for Geometry {
    fn from(poly: Polygon) -> Self {
        Self::Polygon(poly)
    }
}

fn strongest(locations: impl Iterator<Item = Location>) -> Location {
    let mut best = Location::Outside;
    for loc in locations {
        match loc {
            Location::Inside => return Location::Inside,
            Location::Boundary => best = Location::Boundary,
            Location::Outside => {}
        }
    }
    best
}

fn draw_points<S: PathSink + ?Sized>(sink: &mut S, points: &[Point2], closed: bool) -> Result<()> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };
    sink.move_to(first.x, first.y)?;
    for p in rest {
        sink.line_to(p.x, p.y)?;
    }
    if closed {
        sink.close_path()?;
    }
    Ok(())
}

fn rank(g: &Geometry) -> u8 {
    match g {
        Geometry::Point(_) => 0,
        Geometry::LineString(_) => 1,
        Geometry::Polygon(_) => 2,
        Geometry::Collection(_) => 3,
    }
}

fn cmp_geometry(a: &Geometry, b: &Geometry) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Geometry::Point(p), Geometry::Point(q)) => cmp_points(p, q),
        (Geometry::LineString(p), Geometry::LineString(q)) => cmp_sequences(p.points(), q.points()),
        (Geometry::Polygon(p), Geometry::Polygon(q)) => {
            cmp_sequences(p.outer().points(), q.outer().points())
                .then_with(|| p.holes().len().cmp(&q.holes().len()))
        }
        _ => Ordering::Equal,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Polygon::from_coords(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
            .unwrap()
            .into()
    }

    fn line(coords: &[(f64, f64)]) -> Geometry {
        LineString::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
            .unwrap()
            .into()
    }

    #[test]
    fn point_rejects_non_finite() {
        assert!(Geometry::point(f64::NAN, 0.0).is_err());
        assert!(Geometry::point(1.0, 2.0).is_ok());
    }

    #[test]
    fn empty_collection() {
        assert!(Geometry::empty().is_empty());
        assert!(Geometry::Collection(vec![Geometry::empty()]).is_empty());
        assert!(Geometry::empty().bounds().is_none());
        assert!(Geometry::empty().non_empty().is_none());
    }

    #[test]
    fn collection_bounds_cover_members() {
        let g = Geometry::Collection(vec![square(0.0, 0.0, 1.0), Geometry::point(5.0, -2.0).unwrap()]);
        assert_eq!(g.bounds().unwrap(), Rect::new(0.0, -2.0, 5.0, 1.0));
    }

    #[test]
    fn locate_distinguishes_area_from_lines() {
        let tol = Tolerance::new(1e-9).unwrap();
        let g = Geometry::Collection(vec![square(0.0, 0.0, 2.0), line(&[(5.0, 0.0), (5.0, 5.0)])]);
        let on_line = Point2::new(5.0, 1.0);
        assert_eq!(g.locate(&on_line, tol), Location::Boundary);
        assert_eq!(g.locate_area(&on_line, tol), Location::Outside);
        assert_eq!(g.locate(&Point2::new(1.0, 1.0), tol), Location::Inside);
    }

    #[test]
    fn draw_emits_path_commands() {
        let mut cmds: Vec<PathCommand> = Vec::new();
        Geometry::Collection(vec![Geometry::point(1.0, 2.0).unwrap(), line(&[(0.0, 0.0), (3.0, 0.0)])])
            .draw(&mut cmds)
            .unwrap();
        assert_eq!(
            cmds,
            vec![
                PathCommand::MoveTo(1.0, 2.0),
                PathCommand::ClosePath,
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::LineTo(3.0, 0.0),
            ]
        );
    }

    #[test]
    fn normalize_collapses_and_sorts() {
        let single = Geometry::Collection(vec![Geometry::Collection(vec![square(0.0, 0.0, 1.0)])]);
        assert!(matches!(single.normalize(), Geometry::Polygon(_)));

        let a = Geometry::Collection(vec![square(5.0, 0.0, 1.0), Geometry::point(9.0, 9.0).unwrap()]);
        let b = Geometry::Collection(vec![Geometry::point(9.0, 9.0).unwrap(), square(5.0, 0.0, 1.0)]);
        assert_eq!(a.normalize(), b.normalize());
        let Geometry::Collection(members) = a.normalize() else {
            panic!("expected a collection");
        };
        assert!(matches!(members[0], Geometry::Point(_)));
    }
}
