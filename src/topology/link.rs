use super::vertex::VertexId;

/// An undirected link between two distinct vertices.
///
/// The mesh stores links canonically: `a` is the endpoint whose coordinate
/// sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub a: VertexId,
    pub b: VertexId,
}

impl Link {
    /// Creates a link from already-ordered endpoints.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    /// Returns `true` if `v` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, v: VertexId) -> bool {
        self.a == v || self.b == v
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn endpoints() {
        let mut ids: SlotMap<VertexId, ()> = SlotMap::with_key();
        let (a, b, c) = (ids.insert(()), ids.insert(()), ids.insert(()));
        let link = Link::new(a, b);
        assert!(link.touches(a) && link.touches(b));
        assert!(!link.touches(c));
    }
}
