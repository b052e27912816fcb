//! Online spatial index from rectangles to values, organized by Z-order
//! (Morton) codes of rectangle corners.
//!
//! Corners are shifted so that every stored rectangle lies in the
//! non-negative quadrant, quantized to a grid of `precision`-sized cells, and
//! mapped to a Morton code by interleaving the bits of the two cell indices.
//! Morton codes are monotonic in each axis, so an entry whose rectangle meets
//! a query rectangle `R` must satisfy `z(E.min) <= z(R.max)` and
//! `z(E.max) >= z(R.min)`. Entries are kept sorted by `z(E.min)`, with a
//! running maximum of `z(E.max)` alongside; a query binary-searches that
//! running maximum for its first candidate and scans forward until
//! `z(E.min)` passes `z(R.max)`. Codes only prune the scan: every candidate is
//! checked with an exact rectangle overlap test.
//!
//! Insertions are buffered and the sorted arrays are rebuilt on the next
//! query or removal. Interleaving many single insertions with queries
//! therefore costs a full rebuild each time; the mesh accepts this because
//! its insertions arrive in bursts between scans.

use std::ops::ControlFlow;

use crate::math::{Point2, Rect};

/// Interleaves the bits of `x` (even positions) and `y` (odd positions).
#[must_use]
pub fn interleave(x: u64, y: u64) -> u128 {
    spread(x) | (spread(y) << 1)
}

fn spread(v: u64) -> u128 {
    let mut x = u128::from(v);
    x = (x | (x << 32)) & 0x0000_0000_FFFF_FFFF_0000_0000_FFFF_FFFF;
    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF_0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF_00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F_0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333_3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555_5555_5555_5555_5555;
    x
}

#[derive(Debug, Clone)]
struct Entry<T> {
    rect: Rect,
    zmin: u128,
    zmax: u128,
    value: T,
}

/// Z-order spatial index.
#[derive(Debug, Clone)]
pub struct ZOrderIndex<T> {
    precision: f64,
    origin: Point2,
    /// Entries sorted by `zmin`.
    sorted: Vec<Entry<T>>,
    /// `max_prefix[i]` bounds `zmax` of every entry in `sorted[..=i]`.
    max_prefix: Vec<u128>,
    pending: Vec<(Rect, T)>,
}

impl<T> ZOrderIndex<T> {
    /// Creates an empty index quantizing coordinates to `precision`-sized
    /// cells.
    #[must_use]
    pub fn new(precision: f64) -> Self {
        Self {
            precision,
            origin: Point2::origin(),
            sorted: Vec::new(),
            max_prefix: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len() + self.pending.len()
    }

    /// Returns `true` if the index holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds an entry. The sorted arrays are rebuilt lazily.
    pub fn add(&mut self, rect: Rect, value: T) {
        self.pending.push((rect, value));
    }

    /// Visits every entry whose rectangle intersects `rect` (touching
    /// counts). The visitor may break to stop the scan early.
    pub fn find_intersecting<F>(&mut self, rect: &Rect, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&Rect, &T) -> ControlFlow<()>,
    {
        self.rebuild();
        for i in self.candidates(rect) {
            let entry = &self.sorted[i];
            if entry.rect.intersects(rect) {
                visit(&entry.rect, &entry.value)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// Removes the first entry intersecting `rect` whose value satisfies
    /// `matcher`, returning its value.
    pub fn remove<F>(&mut self, rect: &Rect, mut matcher: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.rebuild();
        let index = self.candidates(rect).find(|&i| {
            let entry = &self.sorted[i];
            entry.rect.intersects(rect) && matcher(&entry.value)
        })?;
        // Dropping one element keeps `max_prefix` non-decreasing and still an
        // upper bound for every remaining prefix.
        self.max_prefix.remove(index);
        Some(self.sorted.remove(index).value)
    }

    /// Visits every entry in no particular order.
    pub fn find_all<F>(&self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&Rect, &T) -> ControlFlow<()>,
    {
        for entry in &self.sorted {
            visit(&entry.rect, &entry.value)?;
        }
        for (rect, value) in &self.pending {
            visit(rect, value)?;
        }
        ControlFlow::Continue(())
    }

    /// Iterates over every stored value in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.sorted
            .iter()
            .map(|e| &e.value)
            .chain(self.pending.iter().map(|(_, v)| v))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.sorted.clear();
        self.max_prefix.clear();
        self.pending.clear();
    }

    /// Indices into `sorted` that may intersect `rect`.
    fn candidates(&self, rect: &Rect) -> impl Iterator<Item = usize> + '_ {
        let zlo = self.code(&rect.min);
        let zhi = self.code(&rect.max);
        let start = self.max_prefix.partition_point(|&m| m < zlo);
        (start..self.sorted.len()).take_while(move |&i| self.sorted[i].zmin <= zhi)
    }

    fn rebuild(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut items: Vec<(Rect, T)> = self
            .sorted
            .drain(..)
            .map(|e| (e.rect, e.value))
            .chain(self.pending.drain(..))
            .collect();

        self.origin = items.iter().fold(
            Point2::new(f64::INFINITY, f64::INFINITY),
            |acc, (r, _)| Point2::new(acc.x.min(r.min.x), acc.y.min(r.min.y)),
        );

        let mut entries: Vec<Entry<T>> = items
            .drain(..)
            .map(|(rect, value)| Entry {
                zmin: self.code(&rect.min),
                zmax: self.code(&rect.max),
                rect,
                value,
            })
            .collect();
        entries.sort_by_key(|e| e.zmin);

        let mut running = 0;
        self.max_prefix = entries
            .iter()
            .map(|e| {
                running = running.max(e.zmax);
                running
            })
            .collect();
        self.sorted = entries;
    }

    /// Morton code of `p`. Quantization is monotonic and saturates below the
    /// origin and beyond `u64::MAX` cells.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn code(&self, p: &Point2) -> u128 {
        let qx = ((p.x - self.origin.x) / self.precision).floor() as u64;
        let qy = ((p.y - self.origin.y) / self.precision).floor() as u64;
        interleave(qx, qy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid_index(precision: f64) -> ZOrderIndex<(i32, i32)> {
        let mut index = ZOrderIndex::new(precision);
        for i in 0..7 {
            for j in 0..7 {
                index.add(
                    Rect::new(f64::from(i), f64::from(j), f64::from(i + 1), f64::from(j + 1)),
                    (i, j),
                );
            }
        }
        index
    }

    fn collect(index: &mut ZOrderIndex<(i32, i32)>, rect: &Rect) -> Vec<(i32, i32)> {
        let mut hits = Vec::new();
        let _ = index.find_intersecting(rect, |_, v| {
            hits.push(*v);
            ControlFlow::Continue(())
        });
        hits.sort_unstable();
        hits
    }

    #[test]
    fn interleave_bits() {
        assert_eq!(interleave(0, 0), 0);
        assert_eq!(interleave(1, 0), 1);
        assert_eq!(interleave(0, 1), 2);
        assert_eq!(interleave(3, 1), 7);
        assert_eq!(interleave(u64::MAX, u64::MAX), u128::MAX);
    }

    #[test]
    fn grid_query_returns_touching_neighbours() {
        for precision in [0.05, 0.5, 1.0, 3.0] {
            let mut index = grid_index(precision);
            let hits = collect(&mut index, &Rect::new(2.0, 3.0, 3.0, 4.0));
            let mut expected = Vec::new();
            for i in 1..=3 {
                for j in 2..=4 {
                    expected.push((i, j));
                }
            }
            assert_eq!(hits, expected, "precision={precision}");
        }
    }

    #[test]
    fn query_matches_brute_force() {
        let mut index = grid_index(0.25);
        let queries = [
            Rect::new(-1.0, -1.0, 0.5, 0.5),
            Rect::new(6.5, 0.0, 9.0, 0.2),
            Rect::new(0.2, 5.1, 5.7, 5.2),
            Rect::new(10.0, 10.0, 11.0, 11.0),
        ];
        for q in &queries {
            let hits = collect(&mut index, q);
            let mut expected = Vec::new();
            let _ = index.find_all(|r, v| {
                if r.intersects(q) {
                    expected.push(*v);
                }
                ControlFlow::Continue(())
            });
            expected.sort_unstable();
            assert_eq!(hits, expected, "query={q:?}");
        }
    }

    #[test]
    fn visitor_can_stop_early() {
        let mut index = grid_index(1.0);
        let mut seen = 0;
        let flow = index.find_intersecting(&Rect::new(0.0, 0.0, 7.0, 7.0), |_, _| {
            seen += 1;
            if seen == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, 3);
        assert!(flow.is_break());
    }

    #[test]
    fn remove_takes_first_match_only() {
        let mut index = grid_index(1.0);
        let rect = Rect::new(2.0, 3.0, 3.0, 4.0);
        assert_eq!(index.remove(&rect, |v| *v == (2, 3)), Some((2, 3)));
        assert_eq!(index.remove(&rect, |v| *v == (2, 3)), None);
        assert_eq!(index.len(), 48);
        assert_eq!(collect(&mut index, &rect).len(), 8);
    }

    #[test]
    fn interleaved_add_and_query() {
        let mut index = ZOrderIndex::new(1.0);
        index.add(Rect::new(5.0, 5.0, 6.0, 6.0), 1);
        let mut n = 0;
        let _ = index.find_intersecting(&Rect::new(0.0, 0.0, 10.0, 10.0), |_, _| {
            n += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(n, 1);

        // A rectangle below the previous origin forces a full rebuild.
        index.add(Rect::new(-4.0, -4.0, -3.0, -3.0), 2);
        let mut found = Vec::new();
        let _ = index.find_intersecting(&Rect::new(-5.0, -5.0, 10.0, 10.0), |_, v| {
            found.push(*v);
            ControlFlow::Continue(())
        });
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
        assert_eq!(index.values().count(), 2);

        index.clear();
        assert!(index.is_empty());
    }
}
