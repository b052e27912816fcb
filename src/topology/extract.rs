//! Recovering points, paths, and rings from an arrangement.

use std::collections::HashSet;
use std::ops::ControlFlow;

use tracing::debug;

use super::{Link, Mesh, VertexId};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Vector2};

impl Mesh {
    /// Visits the position of every vertex without links, in coordinate
    /// order.
    pub fn for_each_point<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&Point2) -> ControlFlow<()>,
    {
        for id in self.sorted_vertex_ids() {
            if let Some(v) = self.vertices.get(id).filter(|v| v.links.is_empty()) {
                visit(&v.point)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Visits every maximal path of the mesh.
    ///
    /// Paths run between nexus vertices (degree other than two) through
    /// pass-through vertices. Components made only of pass-through vertices
    /// are visited afterwards as closed sequences whose last point repeats
    /// the first. Each link belongs to exactly one visited sequence.
    pub fn for_each_line_string<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&[Point2]) -> ControlFlow<()>,
    {
        let order = self.sorted_vertex_ids();
        let mut used: HashSet<Link> = HashSet::new();

        for &start in &order {
            let Some(v) = self.vertices.get(start) else {
                continue;
            };
            if v.degree() == 0 || v.degree() == 2 {
                continue;
            }
            for &next in &v.links {
                if !used.contains(&self.canonical(start, next)) {
                    visit(&self.walk_path(start, next, &mut used))?;
                }
            }
        }

        for &start in &order {
            let Some(v) = self.vertices.get(start).filter(|v| v.degree() == 2) else {
                continue;
            };
            let next = v.links[0];
            if !used.contains(&self.canonical(start, next)) {
                visit(&self.walk_path(start, next, &mut used))?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Visits every ring of the mesh, without the closing repetition.
    ///
    /// Works on a copy with dangling vertices pruned. Every link is walked
    /// once in each direction, always taking the most anticlockwise turn, so
    /// each walk runs around one face with the face on its left. Walks that
    /// revisit a vertex are split into simple loops, and clockwise loops,
    /// which bound the outside of a component, are skipped. A link between
    /// two faces is therefore part of both rings.
    pub fn for_each_linear_ring<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&[Point2]) -> ControlFlow<()>,
    {
        let mut work = self.clone();
        work.prune_dangling();
        let mut walked: HashSet<(VertexId, VertexId)> = HashSet::new();
        let mut emitted = 0usize;
        for origin in work.sorted_vertex_ids() {
            let Some(v) = work.vertices.get(origin) else {
                continue;
            };
            for &first in &v.links {
                if walked.contains(&(origin, first)) {
                    continue;
                }
                let face = work.trace_face(origin, first, &mut walked);
                for ids in split_loops(face) {
                    let ring = work.path_points(&ids);
                    if signed_area_2d(&ring) > 0.0 {
                        emitted += 1;
                        visit(&ring)?;
                    }
                }
            }
        }
        debug!(rings = emitted, "extracted rings");
        ControlFlow::Continue(())
    }

    /// Follows links from `start` through `next` until a nexus vertex or
    /// `start` is reached, marking every traversed link as used.
    fn walk_path(&self, start: VertexId, next: VertexId, used: &mut HashSet<Link>) -> Vec<Point2> {
        let mut path: Vec<Point2> = self.vertices.get(start).map(|v| v.point).into_iter().collect();
        let mut cur = next;
        used.insert(self.canonical(start, cur));
        loop {
            let Some(v) = self.vertices.get(cur) else {
                break;
            };
            path.push(v.point);
            if cur == start || v.degree() != 2 {
                break;
            }
            let Some(&n) = v
                .links
                .iter()
                .find(|&&n| !used.contains(&self.canonical(cur, n)))
            else {
                break;
            };
            used.insert(self.canonical(cur, n));
            cur = n;
        }
        path
    }

    /// Iteratively removes vertices with fewer than two links.
    fn prune_dangling(&mut self) {
        while self.cull_vertex_ids(|v| v.degree() < 2) > 0 {}
    }

    /// Walks the face left of the directed link `origin -> first`, marking
    /// every directed link taken. Returns the vertices in walking order.
    fn trace_face(
        &self,
        origin: VertexId,
        first: VertexId,
        walked: &mut HashSet<(VertexId, VertexId)>,
    ) -> Vec<VertexId> {
        let mut face = vec![origin];
        walked.insert((origin, first));
        let (mut prev, mut cur) = (origin, first);
        while let Some(next) = self.next_anticlockwise(prev, cur) {
            if cur == origin && next == first {
                break;
            }
            if !walked.insert((cur, next)) {
                break;
            }
            face.push(cur);
            prev = cur;
            cur = next;
        }
        face
    }

    /// Neighbour of `cur` reached by the most anticlockwise turn when
    /// arriving from `prev`. Turning back to `prev` comes last.
    fn next_anticlockwise(&self, prev: VertexId, cur: VertexId) -> Option<VertexId> {
        let here = self.vertices.get(cur)?;
        let heading = here.point - self.vertices.get(prev)?.point;
        let angle = |n: VertexId| match self.vertices.get(n) {
            Some(w) if n != prev => turn(&heading, &(w.point - here.point)),
            _ => f64::NEG_INFINITY,
        };
        here.links
            .iter()
            .copied()
            .max_by(|&x, &y| angle(x).total_cmp(&angle(y)))
    }

    fn path_points(&self, ids: &[VertexId]) -> Vec<Point2> {
        ids.iter()
            .filter_map(|id| self.vertices.get(*id).map(|v| v.point))
            .collect()
    }
}

/// Signed turn from `heading` to `out`, in `(-π, π]`; positive turns left.
fn turn(heading: &Vector2, out: &Vector2) -> f64 {
    (heading.x * out.y - heading.y * out.x).atan2(heading.dot(out))
}

/// Splits a closed walk at every repeated vertex into simple loops.
fn split_loops(walk: Vec<VertexId>) -> Vec<Vec<VertexId>> {
    let mut loops = Vec::new();
    let mut path: Vec<VertexId> = Vec::with_capacity(walk.len());
    for id in walk {
        if let Some(pos) = path.iter().position(|&v| v == id) {
            loops.push(path.split_off(pos));
        }
        path.push(id);
    }
    loops.push(path);
    loops
}
