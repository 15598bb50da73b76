use geo::{Coordinate, GeoFloat};
use log::debug;

use super::{DirEdgeId, NodeId, PlanarGraph};

/// An ordered sequence of directed edges.
///
/// Either a chain between two nodes of degree other than 2, or a
/// closed loop through degree-2 nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRing {
    dir_edges: Vec<DirEdgeId>,
}

impl EdgeRing {
    pub(crate) fn new(dir_edges: Vec<DirEdgeId>) -> Self {
        EdgeRing { dir_edges }
    }

    #[inline]
    pub fn dir_edges(&self) -> &[DirEdgeId] {
        &self.dir_edges
    }

    pub fn len(&self) -> usize {
        self.dir_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dir_edges.is_empty()
    }

    pub fn is_closed<T: GeoFloat>(&self, graph: &PlanarGraph<T>) -> bool {
        match (self.dir_edges.first(), self.dir_edges.last()) {
            (Some(&first), Some(&last)) => {
                graph.dir_edge(first).from() == graph.dir_edge(last).to()
            }
            _ => false,
        }
    }

    /// Number of directed edges running along (`.0`) and against
    /// (`.1`) their edge's coordinates.
    pub fn direction_counts<T: GeoFloat>(&self, graph: &PlanarGraph<T>) -> (usize, usize) {
        let forward = self
            .dir_edges
            .iter()
            .filter(|&&de| graph.dir_edge(de).is_forward())
            .count();
        (forward, self.dir_edges.len() - forward)
    }

    /// Concatenated coordinates in traversal order; the shared node
    /// between consecutive edges appears once.
    pub fn coordinates<T: GeoFloat>(&self, graph: &PlanarGraph<T>) -> Vec<Coordinate<T>> {
        let mut coords: Vec<Coordinate<T>> = Vec::new();
        for &de in self.dir_edges.iter() {
            for c in graph.dir_edge_coords(de) {
                if coords.last() != Some(&c) {
                    coords.push(c);
                }
            }
        }
        coords
    }
}

impl<T: GeoFloat> PlanarGraph<T> {
    /// Partition all edges into maximal chains and loops.
    ///
    /// Chains start at every node whose degree is not 2 and follow the
    /// unique continuation at degree-2 nodes. Nodes left over after
    /// that all have degree 2 and lie on isolated loops; each loop is
    /// walked from an arbitrary node. Every edge appears in exactly one
    /// ring.
    pub fn build_rings(&self) -> Vec<EdgeRing> {
        let mut edge_marked = vec![false; self.edges.len()];
        let mut node_marked = vec![false; self.nodes.len()];
        let mut rings = Vec::new();

        for node in self.node_ids() {
            if self.degree(node) != 2 {
                self.build_rings_from_node(node, &mut edge_marked, &mut rings);
                node_marked[node.0] = true;
            }
        }
        let open = rings.len();
        for node in self.node_ids() {
            if node_marked[node.0] {
                continue;
            }
            assert_eq!(
                self.degree(node),
                2,
                "unprocessed node must lie on an isolated loop"
            );
            self.build_rings_from_node(node, &mut edge_marked, &mut rings);
            node_marked[node.0] = true;
        }
        debug!(
            "build_rings: {open} chains, {loops} loops",
            loops = rings.len() - open
        );
        debug_assert!(edge_marked.iter().all(|&m| m));
        rings
    }

    fn build_rings_from_node(
        &self,
        node: NodeId,
        edge_marked: &mut [bool],
        rings: &mut Vec<EdgeRing>,
    ) {
        for &de in self.node(node).out_edges() {
            if edge_marked[self.dir_edge(de).edge().0] {
                continue;
            }
            rings.push(self.build_ring_from(de, edge_marked));
        }
    }

    fn build_ring_from(&self, start: DirEdgeId, edge_marked: &mut [bool]) -> EdgeRing {
        let mut dir_edges = Vec::new();
        let mut current = start;
        loop {
            dir_edges.push(current);
            edge_marked[self.dir_edge(current).edge().0] = true;
            match self.next_in_chain(current) {
                Some(next) if next != start => current = next,
                _ => break,
            }
        }
        EdgeRing::new(dir_edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(graph: &mut PlanarGraph<f64>, pts: &[(f64, f64)]) {
        graph.add_edge(pts.iter().map(|&p| Coordinate::from(p)));
    }

    #[test]
    fn test_chain() {
        let mut graph = PlanarGraph::new();
        add(&mut graph, &[(0., 0.), (1., 0.)]);
        add(&mut graph, &[(2., 0.), (1., 0.)]);
        add(&mut graph, &[(2., 0.), (3., 0.), (3., 1.)]);

        let rings = graph.build_rings();
        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_closed(&graph));
        assert_eq!(ring.direction_counts(&graph), (2, 1));
        assert_eq!(
            ring.coordinates(&graph),
            vec![
                Coordinate::from((0., 0.)),
                (1., 0.).into(),
                (2., 0.).into(),
                (3., 0.).into(),
                (3., 1.).into()
            ]
        );
    }

    #[test]
    fn test_branches_and_loops() {
        let mut graph = PlanarGraph::new();
        // A "T" junction at (1, 0).
        add(&mut graph, &[(0., 0.), (1., 0.)]);
        add(&mut graph, &[(1., 0.), (2., 0.)]);
        add(&mut graph, &[(1., 0.), (1., 1.)]);
        // An isolated triangle split into two edges.
        add(&mut graph, &[(10., 10.), (11., 10.), (11., 11.)]);
        add(&mut graph, &[(11., 11.), (10., 10.)]);

        let rings = graph.build_rings();
        assert_eq!(rings.len(), 4);
        let loops: Vec<_> = rings.iter().filter(|r| r.is_closed(&graph)).collect();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 2);
        assert_eq!(loops[0].coordinates(&graph).len(), 4);

        let total: usize = rings.iter().map(|r| r.len()).sum();
        assert_eq!(total, graph.num_edges());
    }

    #[test]
    fn test_closed_chain_through_branch_node() {
        let mut graph = PlanarGraph::new();
        // Loop returning to a node of degree 3.
        add(&mut graph, &[(0., 0.), (1., 0.), (1., 1.)]);
        add(&mut graph, &[(1., 1.), (0., 0.)]);
        add(&mut graph, &[(0., 0.), (-1., 0.)]);

        let rings = graph.build_rings();
        assert_eq!(rings.len(), 2);
        let closed: Vec<_> = rings.iter().filter(|r| r.is_closed(&graph)).collect();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].len(), 2);
        assert_eq!(closed[0].direction_counts(&graph), (2, 0));
    }
}
