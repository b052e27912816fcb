use crate::math::{Point2, Tolerance};

use super::zorder::interleave;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a mesh.
    pub struct VertexId;
}

/// Key of a normalized coordinate: the Z-order code of its zigzag-encoded
/// integer grid steps. Two coordinates share a key iff they normalize to the
/// same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(u128);

impl VertexKey {
    /// Computes the key of `p` under `tolerance`.
    #[must_use]
    pub fn new(tolerance: Tolerance, p: &Point2) -> Self {
        Self(interleave(
            zigzag(tolerance.grid_step(p.x)),
            zigzag(tolerance.grid_step(p.y)),
        ))
    }
}

#[allow(clippy::cast_sign_loss)]
fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// Data associated with a mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Normalized position.
    pub point: Point2,
    /// Lookup key of `point`.
    pub key: VertexKey,
    /// Adjacent vertices, sorted by coordinate.
    pub links: Vec<VertexId>,
}

impl VertexData {
    /// Creates an unconnected vertex.
    #[must_use]
    pub fn new(point: Point2, key: VertexKey) -> Self {
        Self {
            point,
            key,
            links: Vec::new(),
        }
    }

    /// Number of incident links.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.links.len()
    }
}
