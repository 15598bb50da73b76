use std::cmp::Ordering;

use geo::{bounding_rect::BoundingRect, Coordinate, GeoFloat, LineString, Polygon, Rect};
use log::trace;

use crate::{
    locate::{locate_in_ring, Location},
    utils::envelopes_intersect,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SweepAction {
    Insert,
    Delete,
}

/// A one-dimensional sweep over closed intervals, reporting every
/// pair that overlaps.
#[derive(Debug, Clone)]
pub struct SweepLineIndex<T: GeoFloat> {
    intervals: Vec<(T, T)>,
}

impl<T: GeoFloat> Default for SweepLineIndex<T> {
    fn default() -> Self {
        SweepLineIndex {
            intervals: Vec::new(),
        }
    }
}

impl<T: GeoFloat> SweepLineIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the interval `[min, max]` and return its id.
    pub fn add(&mut self, min: T, max: T) -> usize {
        debug_assert!(min <= max);
        self.intervals.push((min, max));
        self.intervals.len() - 1
    }

    /// Call `f` once for every pair of overlapping intervals, with the
    /// interval starting first (or added first, on ties) as the first
    /// argument. Intervals sharing only an end point overlap. Returns
    /// early if `f` returns `false`.
    pub fn overlaps<F: FnMut(usize, usize) -> bool>(&self, mut f: F) {
        let mut events: Vec<(T, SweepAction, usize)> = Vec::with_capacity(2 * self.intervals.len());
        for (id, &(min, max)) in self.intervals.iter().enumerate() {
            events.push((min, SweepAction::Insert, id));
            events.push((max, SweepAction::Delete, id));
        }
        events.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut delete_pos = vec![0; self.intervals.len()];
        for (pos, &(_, action, id)) in events.iter().enumerate() {
            if action == SweepAction::Delete {
                delete_pos[id] = pos;
            }
        }
        for (pos, &(_, action, id)) in events.iter().enumerate() {
            if action != SweepAction::Insert {
                continue;
            }
            for &(_, other_action, other) in &events[pos + 1..delete_pos[id]] {
                if other_action == SweepAction::Insert && !f(id, other) {
                    return;
                }
            }
        }
    }
}

/// The first vertex of `ring` that is not on `other`, if any.
fn vertex_off_ring<T: GeoFloat>(ring: &LineString<T>, other: &LineString<T>) -> Option<Coordinate<T>> {
    ring.0
        .iter()
        .copied()
        .find(|&c| locate_in_ring(c, &other.0) != Location::Boundary)
}

/// A vertex of `inner` lying strictly inside `outer`, if `inner` is
/// nested in `outer`.
fn nested_in<T: GeoFloat>(inner: &LineString<T>, outer: &LineString<T>) -> Option<Coordinate<T>> {
    let pt = vertex_off_ring(inner, outer)?;
    if locate_in_ring(pt, &outer.0) == Location::Interior {
        Some(pt)
    } else {
        None
    }
}

/// Index the rings by `x`-extent, skipping empty rings and rings with
/// a non-finite extent. Also returns the ring position and envelope of
/// each interval id.
fn index_rings<'a, T: GeoFloat + 'a, I>(rings: I) -> (SweepLineIndex<T>, Vec<(usize, Rect<T>)>)
where
    I: Iterator<Item = &'a LineString<T>>,
{
    let mut index = SweepLineIndex::new();
    let mut envelopes = Vec::new();
    for (i, ring) in rings.enumerate() {
        let env = ring
            .bounding_rect()
            .filter(|env| env.min().x.is_finite() && env.max().x.is_finite());
        if let Some(env) = env {
            index.add(env.min().x, env.max().x);
            envelopes.push((i, env));
        }
    }
    (index, envelopes)
}

/// A vertex of a hole of `polygon` that lies inside another hole.
pub fn nested_hole<T: GeoFloat>(polygon: &Polygon<T>) -> Option<Coordinate<T>> {
    let holes = polygon.interiors();
    let (index, envelopes) = index_rings(holes.iter());
    let mut nested = None;
    index.overlaps(|a, b| {
        let (ia, env_a) = envelopes[a];
        let (ib, env_b) = envelopes[b];
        if !envelopes_intersect(&env_a, &env_b) {
            return true;
        }
        nested = nested_in(&holes[ia], &holes[ib]).or_else(|| nested_in(&holes[ib], &holes[ia]));
        nested.is_none()
    });
    if let Some(c) = nested {
        trace!("nested hole at {c:?}");
    }
    nested
}

/// A shell vertex of one of `polygons` that lies inside the interior
/// of another.
pub fn nested_shell<T: GeoFloat>(polygons: &[Polygon<T>]) -> Option<Coordinate<T>> {
    let (index, envelopes) = index_rings(polygons.iter().map(|p| p.exterior()));
    let mut nested = None;
    index.overlaps(|a, b| {
        let (ia, env_a) = envelopes[a];
        let (ib, env_b) = envelopes[b];
        if !envelopes_intersect(&env_a, &env_b) {
            return true;
        }
        nested = shell_in_polygon(polygons[ia].exterior(), &polygons[ib])
            .or_else(|| shell_in_polygon(polygons[ib].exterior(), &polygons[ia]));
        nested.is_none()
    });
    if let Some(c) = nested {
        trace!("nested shell at {c:?}");
    }
    nested
}

/// A vertex of `shell` inside the interior of `polygon`: inside its
/// shell but not inside any of its holes.
fn shell_in_polygon<T: GeoFloat>(shell: &LineString<T>, polygon: &Polygon<T>) -> Option<Coordinate<T>> {
    let pt = nested_in(shell, polygon.exterior())?;
    let in_hole = polygon.interiors().iter().any(|hole| match vertex_off_ring(shell, hole) {
        Some(c) => locate_in_ring(c, &hole.0) == Location::Interior,
        None => true,
    });
    if in_hole {
        None
    } else {
        Some(pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    #[test]
    fn test_sweep_line_index() {
        let mut index = SweepLineIndex::new();
        index.add(0., 2.);
        index.add(1., 3.);
        index.add(5., 6.);
        index.add(3., 4.);
        index.add(6., 6.);

        let mut pairs = Vec::new();
        index.overlaps(|a, b| {
            pairs.push((a, b));
            true
        });
        pairs.sort();
        assert_eq!(pairs, vec![(0, 1), (1, 3), (2, 4)]);

        let mut count = 0;
        index.overlaps(|_, _| {
            count += 1;
            false
        });
        assert_eq!(count, 1);
    }

    fn square(x: f64, y: f64, size: f64) -> LineString<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size)
        ]
        .exterior()
        .clone()
    }

    #[test]
    fn test_nested_hole() {
        let shell = square(0., 0., 100.);
        let poly = Polygon::new(shell.clone(), vec![square(10., 10., 20.), square(50., 50., 10.)]);
        assert_eq!(nested_hole(&poly), None);

        let poly = Polygon::new(
            shell.clone(),
            vec![square(10., 10., 20.), square(50., 50., 10.), square(15., 15., 5.)],
        );
        assert_eq!(nested_hole(&poly), Some(Coordinate { x: 15., y: 15. }));

        // Touching at a vertex, otherwise outside.
        let poly = Polygon::new(shell, vec![square(10., 10., 20.), square(30., 30., 5.)]);
        assert_eq!(nested_hole(&poly), None);
    }

    #[test]
    fn test_nested_shell() {
        let outer = Polygon::new(square(0., 0., 100.), vec![square(10., 10., 50.)]);
        let in_hole = Polygon::new(square(20., 20., 10.), vec![]);
        let in_interior = Polygon::new(square(70., 70., 10.), vec![]);
        assert_eq!(nested_shell(&[outer.clone(), in_hole.clone()]), None);
        assert_eq!(
            nested_shell(&[in_interior, outer.clone()]),
            Some(Coordinate { x: 70., y: 70. })
        );
        let apart = Polygon::new(square(200., 0., 10.), vec![]);
        assert_eq!(nested_shell(&[outer, in_hole, apart]), None);
    }
}
