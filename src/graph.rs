//! A planar graph of coordinate-keyed nodes and paired directed edges.
//!
//! Nodes, edges and directed edges live in index-addressed arenas
//! owned by [`PlanarGraph`]. Every [`Edge`] owns exactly two
//! [`DirectedEdge`]s, each the other's `sym`. The outgoing directed
//! edges of a node are kept sorted by angle (counter-clockwise from
//! the positive `x` axis).
use std::{cmp::Ordering, collections::BTreeMap};

use geo::{kernels::Orientation, Coordinate, GeoFloat, LineString};
use log::trace;
use smallvec::SmallVec;

use crate::{utils::orient2d, SweepPoint};

mod rings;
pub use rings::EdgeRing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirEdgeId(usize);

macro_rules! impl_index {
    ($($ty:ident),*) => {$(
        impl $ty {
            /// Position of this item in its arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    )*};
}
impl_index!(NodeId, EdgeId, DirEdgeId);

/// Quadrant of a direction vector, in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    pub fn of<T: GeoFloat>(dx: T, dy: T) -> Self {
        match (dx >= T::zero(), dy >= T::zero()) {
            (true, true) => Quadrant::NorthEast,
            (false, true) => Quadrant::NorthWest,
            (false, false) => Quadrant::SouthWest,
            (true, false) => Quadrant::SouthEast,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node<T: GeoFloat> {
    coord: Coordinate<T>,
    out_edges: SmallVec<[DirEdgeId; 4]>,
}

impl<T: GeoFloat> Node<T> {
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.coord
    }

    /// Outgoing directed edges sorted counter-clockwise by angle.
    #[inline]
    pub fn out_edges(&self) -> &[DirEdgeId] {
        &self.out_edges
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.out_edges.len()
    }
}

#[derive(Debug, Clone)]
pub struct DirectedEdge<T: GeoFloat> {
    from: NodeId,
    to: NodeId,
    edge: EdgeId,
    sym: DirEdgeId,
    direction_pt: Coordinate<T>,
    forward: bool,
    quadrant: Quadrant,
}

impl<T: GeoFloat> DirectedEdge<T> {
    #[inline]
    pub fn from(&self) -> NodeId {
        self.from
    }

    #[inline]
    pub fn to(&self) -> NodeId {
        self.to
    }

    #[inline]
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    #[inline]
    pub fn sym(&self) -> DirEdgeId {
        self.sym
    }

    /// Point used to order this edge around its origin node; the
    /// second coordinate of the edge in this direction.
    #[inline]
    pub fn direction_pt(&self) -> Coordinate<T> {
        self.direction_pt
    }

    /// Whether this directed edge runs along the edge's coordinates.
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    #[inline]
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }
}

#[derive(Debug, Clone)]
pub struct Edge<T: GeoFloat> {
    coords: LineString<T>,
    dir_edges: [DirEdgeId; 2],
}

impl<T: GeoFloat> Edge<T> {
    /// Coordinates with consecutive repeats removed.
    #[inline]
    pub fn coords(&self) -> &LineString<T> {
        &self.coords
    }

    /// The forward and reverse directed edges.
    #[inline]
    pub fn dir_edges(&self) -> [DirEdgeId; 2] {
        self.dir_edges
    }
}

#[derive(Debug, Clone)]
pub struct PlanarGraph<T: GeoFloat> {
    nodes: Vec<Node<T>>,
    node_index: BTreeMap<SweepPoint<T>, NodeId>,
    edges: Vec<Edge<T>>,
    dir_edges: Vec<DirectedEdge<T>>,
}

impl<T: GeoFloat> Default for PlanarGraph<T> {
    fn default() -> Self {
        PlanarGraph {
            nodes: Vec::new(),
            node_index: BTreeMap::new(),
            edges: Vec::new(),
            dir_edges: Vec::new(),
        }
    }
}

impl<T: GeoFloat> PlanarGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node at `coord`, if any. Always `None` for non-finite
    /// coordinates.
    pub fn find_node(&self, coord: Coordinate<T>) -> Option<NodeId> {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return None;
        }
        self.node_index.get(&SweepPoint::from(coord)).copied()
    }

    /// # Panics
    ///
    /// If `coord` is not finite.
    pub fn find_or_create_node(&mut self, coord: Coordinate<T>) -> NodeId {
        let nodes = &mut self.nodes;
        *self
            .node_index
            .entry(SweepPoint::from(coord))
            .or_insert_with(|| {
                let id = NodeId(nodes.len());
                nodes.push(Node {
                    coord,
                    out_edges: SmallVec::new(),
                });
                id
            })
    }

    /// Add an edge along `coords`.
    ///
    /// Consecutive repeated coordinates are removed first; if fewer
    /// than two distinct coordinates remain nothing is added and
    /// `None` is returned.
    ///
    /// # Panics
    ///
    /// If the end points of the edge are not finite.
    pub fn add_edge<I: IntoIterator<Item = Coordinate<T>>>(&mut self, coords: I) -> Option<EdgeId> {
        let mut pts: Vec<Coordinate<T>> = Vec::new();
        for c in coords {
            if pts.last() != Some(&c) {
                pts.push(c);
            }
        }
        if pts.len() < 2 {
            return None;
        }
        let n = pts.len();
        let start = self.find_or_create_node(pts[0]);
        let end = self.find_or_create_node(pts[n - 1]);

        let edge = EdgeId(self.edges.len());
        let fwd = DirEdgeId(self.dir_edges.len());
        let rev = DirEdgeId(fwd.0 + 1);

        let fwd_edge = self.new_dir_edge(start, end, edge, rev, pts[1], true);
        let rev_edge = self.new_dir_edge(end, start, edge, fwd, pts[n - 2], false);
        self.dir_edges.extend([fwd_edge, rev_edge]);
        self.edges.push(Edge {
            coords: LineString(pts),
            dir_edges: [fwd, rev],
        });
        self.insert_out_edge(start, fwd);
        self.insert_out_edge(end, rev);

        trace!("add_edge: {edge:?} {start:?} -> {end:?}");
        Some(edge)
    }

    fn new_dir_edge(
        &self,
        from: NodeId,
        to: NodeId,
        edge: EdgeId,
        sym: DirEdgeId,
        direction_pt: Coordinate<T>,
        forward: bool,
    ) -> DirectedEdge<T> {
        let origin = self.nodes[from.0].coord;
        DirectedEdge {
            from,
            to,
            edge,
            sym,
            direction_pt,
            forward,
            quadrant: Quadrant::of(direction_pt.x - origin.x, direction_pt.y - origin.y),
        }
    }

    /// Insert into the node's star keeping angular order. Edges with
    /// equal direction keep insertion order.
    fn insert_out_edge(&mut self, node: NodeId, de: DirEdgeId) {
        let pos = {
            let star = &self.nodes[node.0].out_edges;
            star.iter()
                .position(|&other| self.compare_direction(de, other) == Ordering::Less)
                .unwrap_or(star.len())
        };
        self.nodes[node.0].out_edges.insert(pos, de);
    }

    /// Compare two directed edges by the angle of their direction
    /// vectors; both must start at the same node.
    pub fn compare_direction(&self, a: DirEdgeId, b: DirEdgeId) -> Ordering {
        let a = &self.dir_edges[a.0];
        let b = &self.dir_edges[b.0];
        a.quadrant.cmp(&b.quadrant).then_with(|| {
            let origin = self.nodes[b.from.0].coord;
            match orient2d(origin, b.direction_pt, a.direction_pt) {
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Clockwise => Ordering::Less,
                Orientation::Collinear => Ordering::Equal,
            }
        })
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge<T> {
        &self.edges[id.0]
    }

    #[inline]
    pub fn dir_edge(&self, id: DirEdgeId) -> &DirectedEdge<T> {
        &self.dir_edges[id.0]
    }

    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes[id.0].degree()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn dir_edge_ids(&self) -> impl Iterator<Item = DirEdgeId> {
        (0..self.dir_edges.len()).map(DirEdgeId)
    }

    /// Coordinate of the origin node of a directed edge.
    #[inline]
    pub fn origin(&self, de: DirEdgeId) -> Coordinate<T> {
        self.nodes[self.dir_edges[de.0].from.0].coord
    }

    /// Coordinates of the directed edge, in its direction.
    pub fn dir_edge_coords(&self, de: DirEdgeId) -> impl Iterator<Item = Coordinate<T>> + '_ {
        let de = &self.dir_edges[de.0];
        let coords = &self.edges[de.edge.0].coords.0;
        let forward = de.forward;
        let n = coords.len();
        (0..n).map(move |i| if forward { coords[i] } else { coords[n - 1 - i] })
    }

    /// The unique continuation of `de` through its destination node.
    ///
    /// Only defined when the destination has degree 2; returns `None`
    /// otherwise.
    pub fn next_in_chain(&self, de: DirEdgeId) -> Option<DirEdgeId> {
        let dir_edge = &self.dir_edges[de.0];
        let to = &self.nodes[dir_edge.to.0];
        if to.degree() != 2 {
            return None;
        }
        let sym = dir_edge.sym;
        if to.out_edges[0] == sym {
            Some(to.out_edges[1])
        } else {
            assert_eq!(
                to.out_edges[1], sym,
                "degree-2 node does not contain the sym of an incoming edge"
            );
            Some(to.out_edges[0])
        }
    }
}
