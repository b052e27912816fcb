use crate::error::Result;

/// Path-drawing interface through which geometry boundaries are fed into an
/// arrangement.
///
/// Closed subpaths describe rings, open subpaths describe line strings, and a
/// `move_to` immediately followed by `close_path` describes an isolated point.
pub trait PathSink {
    /// Starts a new subpath at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the coordinate.
    fn move_to(&mut self, x: f64, y: f64) -> Result<()>;

    /// Extends the current subpath with a straight segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the coordinate.
    fn line_to(&mut self, x: f64, y: f64) -> Result<()>;

    /// Extends the current subpath with a cubic Bézier segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a coordinate.
    #[allow(clippy::too_many_arguments)]
    fn bezier_curve_to(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> Result<()>;

    /// Closes the current subpath back to its starting point.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the subpath.
    fn close_path(&mut self) -> Result<()>;
}

/// A single recorded path command.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    BezierCurveTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
}

/// Recording sink, mostly useful for inspecting what a geometry draws.
impl PathSink for Vec<PathCommand> {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.push(PathCommand::MoveTo(x, y));
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.push(PathCommand::LineTo(x, y));
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
        self.push(PathCommand::BezierCurveTo(c1x, c1y, c2x, c2y, x, y));
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        self.push(PathCommand::ClosePath);
        Ok(())
    }
}
