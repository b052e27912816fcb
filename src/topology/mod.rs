//! The planar arrangement: a graph of tolerance-snapped vertices and links in
//! which no two links cross except at a shared vertex.

mod builder;
mod extract;
pub mod link;
pub mod vertex;
pub mod zorder;

pub use builder::MeshBuilder;
pub use link::Link;
pub use vertex::{VertexData, VertexId, VertexKey};
pub use zorder::ZOrderIndex;

use std::collections::HashMap;
use std::ops::ControlFlow;

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{MeshError, Result};
use crate::math::distance_2d::point_on_segment_interior;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{cmp_points, Point2, Rect, Tolerance};

/// A link insertion waiting on the worklist. `counted` marks pieces of the
/// caller's link, as opposed to re-inserted halves of split links.
struct PendingLink {
    a: Point2,
    b: Point2,
    counted: bool,
}

/// Planar arrangement of vertices and links.
///
/// Vertices live in an arena and are addressed by [`VertexId`]; a map from
/// [`VertexKey`] guarantees at most one vertex per normalized coordinate.
/// Links are held in a [`ZOrderIndex`] keyed by their bounding rectangles.
///
/// A mesh is built, mutated, and read within a single operation and is not
/// meant to be shared.
#[derive(Debug, Clone)]
pub struct Mesh {
    tolerance: Tolerance,
    vertices: SlotMap<VertexId, VertexData>,
    lookup: HashMap<VertexKey, VertexId>,
    links: ZOrderIndex<Link>,
}

impl Mesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            vertices: SlotMap::with_key(),
            lookup: HashMap::new(),
            links: ZOrderIndex::new(tolerance.value()),
        }
    }

    /// The tolerance coordinates are snapped to.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the mesh holds no vertex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the vertex at the normalized position of `(x, y)`, if any.
    #[must_use]
    pub fn vertex_at(&self, x: f64, y: f64) -> Option<VertexId> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let p = self.tolerance.normalize_point(&Point2::new(x, y));
        self.lookup
            .get(&VertexKey::new(self.tolerance, &p))
            .copied()
    }

    /// Returns the vertex data for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnknownVertex`] if `id` is not in this mesh.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| MeshError::UnknownVertex.into())
    }

    /// Number of links incident to `id` (zero for unknown vertices).
    #[must_use]
    pub fn degree(&self, id: VertexId) -> usize {
        self.vertices.get(id).map_or(0, VertexData::degree)
    }

    /// Returns `true` if a link joins the normalized positions of both points.
    #[must_use]
    pub fn contains_link(&self, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
        match (self.vertex_at(ax, ay), self.vertex_at(bx, by)) {
            (Some(a), Some(b)) => self.linked(a, b),
            _ => false,
        }
    }

    /// Iterates over every vertex position, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.vertices.values().map(|v| v.point)
    }

    /// Iterates over every link as a pair of positions, lower endpoint first.
    pub fn links(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.links.values().filter_map(|l| {
            Some((self.vertices.get(l.a)?.point, self.vertices.get(l.b)?.point))
        })
    }

    /// Bounding rectangle of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.vertices
            .values()
            .fold(None, |acc: Option<Rect>, v| {
                Some(acc.map_or_else(|| Rect::from_point(&v.point), |r| r.including(&v.point)))
            })
    }

    /// Adds a vertex at the normalized position of `(x, y)`, or returns the
    /// existing one.
    ///
    /// A new vertex that lies on an existing link splits that link in two,
    /// so that no vertex sits on a link without being one of its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonFinite`] for NaN or infinite input.
    pub fn add_vertex(&mut self, x: f64, y: f64) -> Result<VertexId> {
        check_finite(x, y)?;
        let p = self.tolerance.normalize_point(&Point2::new(x, y));
        let key = VertexKey::new(self.tolerance, &p);
        if let Some(&id) = self.lookup.get(&key) {
            return Ok(id);
        }
        let id = self.vertices.insert(VertexData::new(p, key));
        self.lookup.insert(key, id);

        let eps = self.tolerance.value();
        let mut through = Vec::new();
        let _ = self
            .links
            .find_intersecting(&Rect::from_point(&p).expanded(eps), |_, link| {
                through.push(*link);
                ControlFlow::Continue(())
            });
        for link in through {
            let (a, b) = (self.vertex(link.a)?.point, self.vertex(link.b)?.point);
            if point_on_segment_interior(&p, &a, &b, eps) {
                trace!(?p, "vertex splits link");
                self.detach(link);
                self.add_link(a.x, a.y, p.x, p.y)?;
                self.add_link(p.x, p.y, b.x, b.y)?;
            }
        }
        Ok(id)
    }

    /// Adds a link between the normalized positions of `(ax, ay)` and
    /// `(bx, by)`, splitting it and any link it crosses at every crossing.
    ///
    /// Returns the number of links committed for this segment: zero for a
    /// degenerate or already present link, more than one when crossings
    /// split it. Re-inserted halves of crossed links are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonFinite`] for NaN or infinite input, before any
    /// mutation. An error on a computed crossing point aborts the insertion
    /// without undoing splits already committed.
    pub fn add_link(&mut self, ax: f64, ay: f64, bx: f64, by: f64) -> Result<usize> {
        check_finite(ax, ay)?;
        check_finite(bx, by)?;
        let mut work = vec![PendingLink {
            a: Point2::new(ax, ay),
            b: Point2::new(bx, by),
            counted: true,
        }];
        let mut added = 0;
        while let Some(job) = work.pop() {
            if self.insert_link(&job, &mut work)? && job.counted {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Removes the link between the normalized positions of both points.
    pub fn remove_link(&mut self, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
        let (Some(a), Some(b)) = (self.vertex_at(ax, ay), self.vertex_at(bx, by)) else {
            return false;
        };
        if !self.linked(a, b) {
            return false;
        }
        let link = self.canonical(a, b);
        self.detach(link)
    }

    /// Removes the vertex at the normalized position of `(x, y)` together
    /// with every link incident to it.
    pub fn remove_vertex(&mut self, x: f64, y: f64) -> bool {
        match self.vertex_at(x, y) {
            Some(id) => {
                self.remove_vertex_id(id);
                true
            }
            None => false,
        }
    }

    /// Removes every link whose midpoint satisfies `predicate`, then every
    /// vertex whose position does. Returns the number of removed elements.
    pub fn cull<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Point2) -> bool,
    {
        self.cull_links(&mut predicate) + self.cull_vertices(&mut predicate)
    }

    /// Removes every link whose midpoint satisfies `predicate`.
    pub fn cull_links<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Point2) -> bool,
    {
        self.cull_segments(|a, b| predicate(&nalgebra::center(a, b)))
    }

    /// Removes every link for which `predicate(a, b)` holds, `a` being the
    /// lower endpoint.
    pub fn cull_segments<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Point2, &Point2) -> bool,
    {
        let doomed: Vec<Link> = self
            .links
            .values()
            .filter(|l| match (self.vertices.get(l.a), self.vertices.get(l.b)) {
                (Some(a), Some(b)) => predicate(&a.point, &b.point),
                _ => false,
            })
            .copied()
            .collect();
        let n = doomed.len();
        for link in doomed {
            self.detach(link);
        }
        n
    }

    /// Removes every vertex whose position satisfies `predicate`, with its
    /// incident links.
    pub fn cull_vertices<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Point2) -> bool,
    {
        let doomed: Vec<VertexId> = self
            .vertices
            .iter()
            .filter(|(_, v)| predicate(&v.point))
            .map(|(id, _)| id)
            .collect();
        let n = doomed.len();
        for id in doomed {
            self.remove_vertex_id(id);
        }
        n
    }

    /// Removes every vertex without links whose position satisfies
    /// `predicate`.
    pub fn cull_isolated<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Point2) -> bool,
    {
        self.cull_vertex_ids(|v| v.links.is_empty() && predicate(&v.point))
    }

    /// Makes every crossing between this mesh's links and `other`'s links
    /// (or vertices) an explicit vertex of this mesh. Positions that do not
    /// fall on one of this mesh's links are ignored, so no isolated vertex is
    /// created. Returns the number of vertices added.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonFinite`] if a computed crossing overflows.
    pub fn split_at_crossings(&mut self, other: &Mesh) -> Result<usize> {
        let eps = self.tolerance.value();
        let mut cuts: Vec<Point2> = other.points().collect();
        for (c, d) in other.links() {
            let mut near = Vec::new();
            let _ = self
                .links
                .find_intersecting(&Rect::from_corners(&c, &d).expanded(eps), |_, link| {
                    near.push(*link);
                    ControlFlow::Continue(())
                });
            for link in near {
                let (a, b) = (self.vertex(link.a)?.point, self.vertex(link.b)?.point);
                if let Some((x, _, _)) = segment_segment_intersect_2d(&a, &b, &c, &d, 0.0) {
                    cuts.push(x);
                }
            }
        }
        let mut added = 0;
        for p in cuts {
            if self.split_links_at(&p)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Adds a vertex at `p` only if it falls inside an existing link.
    fn split_links_at(&mut self, p: &Point2) -> Result<bool> {
        check_finite(p.x, p.y)?;
        let q = self.tolerance.normalize_point(p);
        if self.lookup.contains_key(&VertexKey::new(self.tolerance, &q)) {
            return Ok(false);
        }
        let eps = self.tolerance.value();
        let vertices = &self.vertices;
        let hit = self
            .links
            .find_intersecting(&Rect::from_point(&q).expanded(eps), |_, link| {
                match (vertices.get(link.a), vertices.get(link.b)) {
                    (Some(a), Some(b)) if point_on_segment_interior(&q, &a.point, &b.point, eps) => {
                        ControlFlow::Break(())
                    }
                    _ => ControlFlow::Continue(()),
                }
            })
            .is_break();
        if hit {
            self.add_vertex(q.x, q.y)?;
        }
        Ok(hit)
    }

    /// One worklist step of [`Mesh::add_link`]. Returns `true` if the link
    /// was committed as is; otherwise its pieces were queued.
    fn insert_link(&mut self, job: &PendingLink, work: &mut Vec<PendingLink>) -> Result<bool> {
        let tol = self.tolerance;
        let eps = tol.value();
        let a = tol.normalize_point(&job.a);
        let b = tol.normalize_point(&job.b);
        if VertexKey::new(tol, &a) == VertexKey::new(tol, &b) {
            return Ok(false);
        }
        if self.contains_link(a.x, a.y, b.x, b.y) {
            return Ok(false);
        }

        let ia = self.add_vertex(a.x, a.y)?;
        let ib = self.add_vertex(b.x, b.y)?;
        // Splits triggered by either endpoint may have produced this link.
        if self.linked(ia, ib) {
            return Ok(false);
        }
        let (pa, pb) = (self.vertex(ia)?.point, self.vertex(ib)?.point);

        let mut near = Vec::new();
        let _ = self
            .links
            .find_intersecting(&Rect::from_corners(&pa, &pb).expanded(eps), |_, link| {
                near.push(*link);
                ControlFlow::Continue(())
            });

        for link in near {
            let (c, d) = (self.vertex(link.a)?.point, self.vertex(link.b)?.point);

            // An existing vertex on the new segment splits the new segment.
            for q in [c, d] {
                if point_on_segment_interior(&q, &pa, &pb, eps) {
                    trace!(?q, "new link passes through vertex");
                    queue_split(work, pa, q, pb, job.counted);
                    return Ok(false);
                }
            }

            // A new endpoint on an existing segment splits the existing one.
            if let Some(q) = [pa, pb]
                .into_iter()
                .find(|q| point_on_segment_interior(q, &c, &d, eps))
            {
                self.detach(link);
                queue_split(work, c, q, d, false);
                continue;
            }

            if link.touches(ia) || link.touches(ib) {
                continue;
            }

            let Some((x, _, _)) = segment_segment_intersect_2d(&pa, &pb, &c, &d, 0.0) else {
                continue;
            };
            let x = tol.normalize_point(&x);
            let kx = VertexKey::new(tol, &x);
            let on_existing_end = kx == self.vertex(link.a)?.key || kx == self.vertex(link.b)?.key;
            let on_new_end = kx == self.vertex(ia)?.key || kx == self.vertex(ib)?.key;

            if !on_existing_end {
                trace!(?x, "crossing splits existing link");
                self.detach(link);
                queue_split(work, c, x, d, false);
            }
            if !on_new_end {
                trace!(?x, "crossing splits new link");
                queue_split(work, pa, x, pb, job.counted);
                return Ok(false);
            }
        }

        self.attach(ia, ib);
        Ok(true)
    }

    fn linked(&self, a: VertexId, b: VertexId) -> bool {
        self.vertices.get(a).is_some_and(|v| v.links.contains(&b))
    }

    fn canonical(&self, a: VertexId, b: VertexId) -> Link {
        let ordered = match (self.vertices.get(a), self.vertices.get(b)) {
            (Some(va), Some(vb)) => cmp_points(&va.point, &vb.point).is_le(),
            _ => true,
        };
        if ordered {
            Link::new(a, b)
        } else {
            Link::new(b, a)
        }
    }

    fn link_rect(&self, link: Link) -> Option<Rect> {
        let a = self.vertices.get(link.a)?.point;
        let b = self.vertices.get(link.b)?.point;
        Some(Rect::from_corners(&a, &b))
    }

    /// Registers a link in both adjacency lists and the spatial index.
    fn attach(&mut self, a: VertexId, b: VertexId) {
        let link = self.canonical(a, b);
        self.insert_neighbour(a, b);
        self.insert_neighbour(b, a);
        if let Some(rect) = self.link_rect(link) {
            self.links.add(rect, link);
        }
    }

    fn insert_neighbour(&mut self, at: VertexId, neighbour: VertexId) {
        let Some(p) = self.vertices.get(neighbour).map(|v| v.point) else {
            return;
        };
        let vertices = &self.vertices;
        let Some(pos) = vertices.get(at).map(|v| {
            v.links.partition_point(|&n| {
                vertices
                    .get(n)
                    .is_some_and(|w| cmp_points(&w.point, &p).is_lt())
            })
        }) else {
            return;
        };
        if let Some(v) = self.vertices.get_mut(at) {
            v.links.insert(pos, neighbour);
        }
    }

    /// Unregisters a link from both adjacency lists and the spatial index.
    fn detach(&mut self, link: Link) -> bool {
        let removed = self
            .link_rect(link)
            .is_some_and(|rect| self.links.remove(&rect, |l| *l == link).is_some());
        for (at, other) in [(link.a, link.b), (link.b, link.a)] {
            if let Some(v) = self.vertices.get_mut(at) {
                v.links.retain(|&n| n != other);
            }
        }
        removed
    }

    fn remove_vertex_id(&mut self, id: VertexId) {
        let neighbours = self
            .vertices
            .get(id)
            .map(|v| v.links.clone())
            .unwrap_or_default();
        for n in neighbours {
            let link = self.canonical(id, n);
            self.detach(link);
        }
        if let Some(v) = self.vertices.remove(id) {
            self.lookup.remove(&v.key);
        }
    }

    fn cull_vertex_ids<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&VertexData) -> bool,
    {
        let doomed: Vec<VertexId> = self
            .vertices
            .iter()
            .filter(|(_, v)| predicate(v))
            .map(|(id, _)| id)
            .collect();
        let n = doomed.len();
        for id in doomed {
            self.remove_vertex_id(id);
        }
        n
    }

    /// Vertex ids sorted by position, for deterministic traversal.
    fn sorted_vertex_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<(VertexId, Point2)> =
            self.vertices.iter().map(|(id, v)| (id, v.point)).collect();
        ids.sort_by(|a, b| cmp_points(&a.1, &b.1));
        ids.into_iter().map(|(id, _)| id).collect()
    }
}

fn check_finite(x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(MeshError::NonFinite { x, y }.into())
    }
}

/// Queues the two halves of `from`–`to` split at `at`.
fn queue_split(work: &mut Vec<PendingLink>, from: Point2, at: Point2, to: Point2, counted: bool) {
    work.push(PendingLink {
        a: from,
        b: at,
        counted,
    });
    work.push(PendingLink {
        a: at,
        b: to,
        counted,
    });
}
