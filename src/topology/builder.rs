use tracing::debug;

use super::Mesh;
use crate::error::{MeshError, Result};
use crate::geometry::PathSink;
use crate::math::bezier_2d::flatten_cubic;
use crate::math::{Point2, Tolerance};

/// Path sink that decomposes drawn boundaries into two arrangements: closed
/// subpaths go to a rings mesh, open subpaths and isolated points go to a
/// lines-and-points mesh.
///
/// ```
/// use planar::geometry::PathSink;
/// use planar::math::Tolerance;
/// use planar::topology::MeshBuilder;
///
/// let mut builder = MeshBuilder::new(Tolerance::default());
/// builder.move_to(0.0, 0.0)?;
/// builder.line_to(4.0, 0.0)?;
/// builder.line_to(0.0, 3.0)?;
/// builder.close_path()?;
/// let (rings, lines) = builder.finish()?;
/// assert_eq!(rings.link_count(), 3);
/// assert!(lines.is_empty());
/// # Ok::<(), planar::PlanarError>(())
/// ```
#[derive(Debug)]
pub struct MeshBuilder {
    tolerance: Tolerance,
    rings: Mesh,
    lines: Mesh,
    current: Vec<Point2>,
}

impl MeshBuilder {
    #[must_use]
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            rings: Mesh::new(tolerance),
            lines: Mesh::new(tolerance),
            current: Vec::new(),
        }
    }

    /// Flushes any open subpath and returns the `(rings, lines)` meshes.
    ///
    /// # Errors
    ///
    /// Propagates insertion errors from the pending subpath.
    pub fn finish(mut self) -> Result<(Mesh, Mesh)> {
        self.flush_open()?;
        debug!(
            ring_links = self.rings.link_count(),
            line_links = self.lines.link_count(),
            "built meshes"
        );
        Ok((self.rings, self.lines))
    }

    /// Commits the current subpath as an open path.
    fn flush_open(&mut self) -> Result<()> {
        for w in self.current.windows(2) {
            self.lines.add_link(w[0].x, w[0].y, w[1].x, w[1].y)?;
        }
        self.current.clear();
        Ok(())
    }

    fn start_if_empty(&mut self, x: f64, y: f64) {
        if self.current.is_empty() {
            self.current.push(Point2::new(x, y));
        }
    }
}

fn check_finite(coords: &[f64]) -> Result<()> {
    match coords {
        [x, y, ..] if !(x.is_finite() && y.is_finite()) => {
            Err(MeshError::NonFinite { x: *x, y: *y }.into())
        }
        [_, _, rest @ ..] => check_finite(rest),
        _ => Ok(()),
    }
}

impl PathSink for MeshBuilder {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        check_finite(&[x, y])?;
        self.flush_open()?;
        self.current.push(Point2::new(x, y));
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        check_finite(&[x, y])?;
        self.start_if_empty(x, y);
        self.current.push(Point2::new(x, y));
        Ok(())
    }

    fn bezier_curve_to(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> Result<()> {
        check_finite(&[c1x, c1y, c2x, c2y, x, y])?;
        self.start_if_empty(c1x, c1y);
        let Some(&p0) = self.current.last() else {
            return Ok(());
        };
        let chords = flatten_cubic(
            &p0,
            &Point2::new(c1x, c1y),
            &Point2::new(c2x, c2y),
            &Point2::new(x, y),
            self.tolerance.value(),
        );
        self.current.extend(chords);
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        let Some(&start) = self.current.first() else {
            return Ok(());
        };
        if self.current.len() == 1 {
            self.lines.add_vertex(start.x, start.y)?;
        } else {
            let mut ring = std::mem::take(&mut self.current);
            ring.push(start);
            for w in ring.windows(2) {
                self.rings.add_link(w[0].x, w[0].y, w[1].x, w[1].y)?;
            }
        }
        self.current.clear();
        self.current.push(start);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanarError;

    fn builder() -> MeshBuilder {
        MeshBuilder::new(Tolerance::new(0.01).unwrap())
    }

    #[test]
    fn closed_and_open_subpaths_go_to_separate_meshes() {
        let mut b = builder();
        b.move_to(0.0, 0.0).unwrap();
        b.line_to(2.0, 0.0).unwrap();
        b.line_to(2.0, 2.0).unwrap();
        b.close_path().unwrap();
        b.move_to(5.0, 0.0).unwrap();
        b.line_to(5.0, 3.0).unwrap();
        let (rings, lines) = b.finish().unwrap();
        assert_eq!(rings.link_count(), 3);
        assert!(rings.contains_link(2.0, 2.0, 0.0, 0.0));
        assert_eq!(lines.link_count(), 1);
        assert!(lines.contains_link(5.0, 0.0, 5.0, 3.0));
    }

    #[test]
    fn lone_close_is_a_point() {
        let mut b = builder();
        b.move_to(1.0, 1.0).unwrap();
        b.close_path().unwrap();
        let (rings, lines) = b.finish().unwrap();
        assert!(rings.is_empty());
        assert_eq!(lines.vertex_count(), 1);
        assert_eq!(lines.link_count(), 0);
    }

    #[test]
    fn bare_move_to_draws_nothing() {
        let mut b = builder();
        b.move_to(1.0, 1.0).unwrap();
        b.move_to(2.0, 2.0).unwrap();
        let (rings, lines) = b.finish().unwrap();
        assert!(rings.is_empty());
        assert!(lines.is_empty());
    }

    #[test]
    fn curves_are_flattened_into_the_subpath() {
        let mut b = builder();
        b.move_to(0.0, 0.0).unwrap();
        b.bezier_curve_to(0.0, 5.0, 10.0, 5.0, 10.0, 0.0).unwrap();
        b.close_path().unwrap();
        let (rings, lines) = b.finish().unwrap();
        assert!(lines.is_empty());
        assert!(rings.link_count() > 4);
        assert!(rings.contains_link(10.0, 0.0, 0.0, 0.0));
        assert!(rings.points().all(|p| p.y >= -0.01 && p.y <= 3.76));
    }

    #[test]
    fn rejects_non_finite() {
        let mut b = builder();
        b.move_to(0.0, 0.0).unwrap();
        let err = b.line_to(f64::NAN, 0.0).unwrap_err();
        assert!(matches!(err, PlanarError::Mesh(MeshError::NonFinite { .. })));
        assert!(b
            .bezier_curve_to(1.0, 1.0, 2.0, f64::INFINITY, 3.0, 0.0)
            .is_err());
    }
}
