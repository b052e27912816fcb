pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod relation;
pub mod topology;

pub use error::{PlanarError, Result};
pub use geometry::{Geometry, LineString, LinearRing, Location, PathSink, Polygon};
pub use math::{Point2, Rect, Tolerance};
pub use operations::boolean::{Intersect, Relate, Subtract, Union, Xor};
pub use relation::Relation;
pub use topology::{Mesh, MeshBuilder};
