use std::{cmp::Ordering, iter::once};

use geo::{
    algorithm::line_intersection::{line_intersection, LineIntersection},
    winding_order::{Winding, WindingOrder},
    Coordinate, GeoFloat, Line, LineString, Polygon,
};
use itertools::Itertools;
use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::{
    graph::{DirEdgeId, EdgeRing, PlanarGraph},
    utils::winding_inverse,
};

/// A ring segment together with the points where other ring segments
/// touch or cross it.
#[derive(Debug, Clone)]
struct Segment<T: GeoFloat> {
    line: Line<T>,
    /// Whether the polygon interior lies to the right of `line`.
    interior_right: bool,
    splits: Vec<Coordinate<T>>,
}

impl<T: GeoFloat> Segment<T> {
    fn split_at(&mut self, c: Coordinate<T>) {
        if c != self.line.start && c != self.line.end {
            self.splits.push(c);
        }
    }

    /// The segment cut at its split points, as consecutive pairs.
    fn pieces(&mut self) -> Vec<(Coordinate<T>, Coordinate<T>)> {
        let start = self.line.start;
        let dist = |c: &Coordinate<T>| {
            let d = *c - start;
            d.x * d.x + d.y * d.y
        };
        self.splits
            .sort_by(|a, b| dist(a).partial_cmp(&dist(b)).unwrap_or(Ordering::Equal));
        self.splits.dedup();
        once(start)
            .chain(self.splits.iter().copied())
            .chain(once(self.line.end))
            .tuple_windows()
            .collect()
    }
}

/// Push the segments of `ring`. Returns `false` if the ring has no
/// area or a non-finite coordinate.
fn ring_segments<T: GeoFloat>(
    ring: &LineString<T>,
    is_shell: bool,
    segments: &mut Vec<Segment<T>>,
) -> bool {
    if ring.0.len() < 4 || ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return false;
    }
    let winding = match ring.winding_order() {
        Some(w) => w,
        None => return false,
    };
    let interior_right = if is_shell {
        winding == WindingOrder::Clockwise
    } else {
        winding_inverse(winding) == WindingOrder::Clockwise
    };
    segments.extend(
        ring.lines()
            .filter(|l| l.start != l.end)
            .map(|line| Segment {
                line,
                interior_right,
                splits: Vec::new(),
            }),
    );
    true
}

/// Node all segments against each other and add the pieces to a
/// graph. Returns the graph and, per edge, whether the interior lies
/// to the right of its forward direction.
fn node_segments<T: GeoFloat>(mut segments: Vec<Segment<T>>) -> (PlanarGraph<T>, Vec<bool>) {
    for (i, j) in (0..segments.len()).tuple_combinations() {
        let pts: SmallVec<[Coordinate<T>; 2]> =
            match line_intersection(segments[i].line, segments[j].line) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => smallvec![intersection],
                Some(LineIntersection::Collinear { intersection }) => {
                    smallvec![intersection.start, intersection.end]
                }
                None => continue,
            };
        for c in pts {
            segments[i].split_at(c);
            segments[j].split_at(c);
        }
    }

    let mut graph = PlanarGraph::new();
    let mut labels = Vec::new();
    for seg in segments.iter_mut() {
        for (p, q) in seg.pieces() {
            if let Some(edge) = graph.add_edge([p, q]) {
                debug_assert_eq!(edge.index(), labels.len());
                labels.push(seg.interior_right);
            }
        }
    }
    (graph, labels)
}

/// Link every incoming directed edge at a node to the next outgoing
/// one, both accepted by `member`, scanning `out_edges` in order and
/// wrapping around.
fn link_star<T: GeoFloat, I, F>(
    graph: &PlanarGraph<T>,
    out_edges: I,
    member: F,
    next: &mut [Option<DirEdgeId>],
) where
    I: Iterator<Item = DirEdgeId>,
    F: Fn(DirEdgeId) -> bool,
{
    let mut first_out = None;
    let mut incoming: Option<DirEdgeId> = None;
    for out in out_edges {
        if first_out.is_none() && member(out) {
            first_out = Some(out);
        }
        match incoming {
            None => {
                let sym = graph.dir_edge(out).sym();
                if member(sym) {
                    incoming = Some(sym);
                }
            }
            Some(inc) => {
                if member(out) {
                    next[inc.index()] = Some(out);
                    incoming = None;
                }
            }
        }
    }
    if let Some(inc) = incoming {
        next[inc.index()] = first_out;
    }
}

/// Follow `next` from `start` until it returns to `start`.
fn walk(start: DirEdgeId, next: &[Option<DirEdgeId>]) -> Vec<DirEdgeId> {
    let mut ring = vec![start];
    let mut current = start;
    while ring.len() <= next.len() {
        match next[current.index()] {
            Some(de) if de != start => {
                ring.push(de);
                current = de;
            }
            _ => break,
        }
    }
    ring
}

/// A point where the interior of `polygon` is split into pieces that
/// are not connected, if any.
///
/// The rings are noded against each other, and the directed edges
/// with the interior on their right are linked into maximal rings,
/// then split at repeated nodes into minimal rings. The interior is
/// connected iff every minimal shell ring is reachable from the outer
/// shell. Rings are assumed to have no overlapping segments. Rings
/// with non-finite coordinates are ignored.
pub fn disconnected_interior<T: GeoFloat>(polygon: &Polygon<T>) -> Option<Coordinate<T>> {
    let mut segments = Vec::new();
    if !ring_segments(polygon.exterior(), true, &mut segments) {
        return None;
    }
    for hole in polygon.interiors() {
        ring_segments(hole, false, &mut segments);
    }
    let (graph, labels) = node_segments(segments);
    let in_result = |de: DirEdgeId| {
        let dir_edge = graph.dir_edge(de);
        labels[dir_edge.edge().index()] == dir_edge.is_forward()
    };

    let n = 2 * graph.num_edges();
    let mut next = vec![None; n];
    for node in graph.node_ids() {
        link_star(
            &graph,
            graph.node(node).out_edges().iter().copied(),
            &in_result,
            &mut next,
        );
    }

    let mut max_ring = vec![None; n];
    let mut next_min = vec![None; n];
    let mut in_min_ring = vec![false; n];
    let mut min_rings = Vec::new();
    let mut num_max_rings = 0;
    for start in graph.dir_edge_ids() {
        if !in_result(start) || max_ring[start.index()].is_some() {
            continue;
        }
        let id = num_max_rings;
        num_max_rings += 1;

        let ring = walk(start, &next);
        for &de in &ring {
            max_ring[de.index()] = Some(id);
        }
        for &de in &ring {
            let star = graph.node(graph.dir_edge(de).from()).out_edges();
            link_star(
                &graph,
                star.iter().rev().copied(),
                |d| max_ring[d.index()] == Some(id),
                &mut next_min,
            );
        }
        for &de in &ring {
            if in_min_ring[de.index()] {
                continue;
            }
            let min = walk(de, &next_min);
            for &d in &min {
                in_min_ring[d.index()] = true;
            }
            min_rings.push(EdgeRing::new(min));
        }
    }
    debug!(
        "disconnected_interior: {edges} edges, {num_max_rings} maximal rings, {min} minimal rings",
        edges = graph.num_edges(),
        min = min_rings.len()
    );

    // The outer shell's segments are added first.
    let mut visited = vec![false; n];
    if let Some(edge) = graph.edge_ids().next() {
        let [fwd, rev] = graph.edge(edge).dir_edges();
        let start = if in_result(fwd) { fwd } else { rev };
        for de in walk(start, &next) {
            visited[de.index()] = true;
        }
    }

    let is_hole = |ring: &EdgeRing| {
        LineString(ring.coordinates(&graph)).winding_order() == Some(WindingOrder::CounterClockwise)
    };
    min_rings
        .iter()
        .filter(|ring| !is_hole(*ring))
        .find_map(|ring| {
            ring.dir_edges()
                .iter()
                .find(|de| !visited[de.index()])
                .map(|&de| graph.origin(de))
        })
}
