use geo::{Coordinate, GeoFloat};
use slab::Slab;

use crate::utils::two;

/// A parabolic arc of the beach line.
#[derive(Debug, Clone, Copy)]
pub(super) struct Arc<T: GeoFloat> {
    pub site: Coordinate<T>,
    /// Key of the pending circle event that would remove this arc.
    pub circle: Option<usize>,
}

/// The boundary between two adjacent arcs, tracing a Voronoi edge.
#[derive(Debug, Clone, Copy)]
pub(super) struct Breakpoint<T: GeoFloat> {
    pub left_site: Coordinate<T>,
    pub right_site: Coordinate<T>,
    pub edge: usize,
    /// Whether the breakpoint moves from the edge's start towards its
    /// end.
    pub forward: bool,
}

#[derive(Debug, Clone, Copy)]
enum NodeKind<T: GeoFloat> {
    Arc(Arc<T>),
    Breakpoint(Breakpoint<T>),
}

#[derive(Debug, Clone, Copy)]
struct BeachNode<T: GeoFloat> {
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
    kind: NodeKind<T>,
}

impl<T: GeoFloat> BeachNode<T> {
    fn new(kind: NodeKind<T>) -> Self {
        BeachNode {
            parent: None,
            left: None,
            right: None,
            kind,
        }
    }
}

/// The beach line as a binary tree: arcs are the leaves and
/// breakpoints the internal nodes. An in-order walk yields the arcs
/// from left to right, separated by their breakpoints.
///
/// Nodes are stored in a [`Slab`] and referred to by key. Keys of
/// removed nodes may be reused.
#[derive(Debug, Clone)]
pub(super) struct BeachLine<T: GeoFloat> {
    nodes: Slab<BeachNode<T>>,
    root: Option<usize>,
}

impl<T: GeoFloat> Default for BeachLine<T> {
    fn default() -> Self {
        BeachLine {
            nodes: Slab::new(),
            root: None,
        }
    }
}

impl<T: GeoFloat> BeachLine<T> {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn insert_root(&mut self, site: Coordinate<T>) -> usize {
        assert!(self.is_empty(), "beach line already has a root");
        let key = self.new_arc(site);
        self.root = Some(key);
        key
    }

    pub fn arc(&self, key: usize) -> &Arc<T> {
        match &self.nodes[key].kind {
            NodeKind::Arc(arc) => arc,
            NodeKind::Breakpoint(_) => panic!("beach node {} is not an arc", key),
        }
    }

    pub fn arc_mut(&mut self, key: usize) -> &mut Arc<T> {
        match &mut self.nodes[key].kind {
            NodeKind::Arc(arc) => arc,
            NodeKind::Breakpoint(_) => panic!("beach node {} is not an arc", key),
        }
    }

    pub fn breakpoint(&self, key: usize) -> &Breakpoint<T> {
        match &self.nodes[key].kind {
            NodeKind::Breakpoint(bp) => bp,
            NodeKind::Arc(_) => panic!("beach node {} is not a breakpoint", key),
        }
    }

    fn breakpoint_mut(&mut self, key: usize) -> &mut Breakpoint<T> {
        match &mut self.nodes[key].kind {
            NodeKind::Breakpoint(bp) => bp,
            NodeKind::Arc(_) => panic!("beach node {} is not a breakpoint", key),
        }
    }

    /// The arc directly above `x` when the sweep line is at `sweep`.
    pub fn locate(&self, x: T, sweep: T) -> Option<usize> {
        let mut key = self.root?;
        loop {
            let node = &self.nodes[key];
            match &node.kind {
                NodeKind::Arc(_) => return Some(key),
                NodeKind::Breakpoint(bp) => {
                    let bx = breakpoint_x(bp.left_site, bp.right_site, sweep);
                    let next = if x < bx { node.left } else { node.right };
                    key = next.expect("beach breakpoint is missing a child");
                }
            }
        }
    }

    /// The breakpoint immediately left of the arc `key`.
    pub fn left_breakpoint(&self, key: usize) -> Option<usize> {
        let mut child = key;
        while let Some(parent) = self.nodes[child].parent {
            if self.nodes[parent].right == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    /// The breakpoint immediately right of the arc `key`.
    pub fn right_breakpoint(&self, key: usize) -> Option<usize> {
        let mut child = key;
        while let Some(parent) = self.nodes[child].parent {
            if self.nodes[parent].left == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    pub fn left_arc(&self, key: usize) -> Option<usize> {
        let bp = self.left_breakpoint(key)?;
        let mut key = self.nodes[bp].left.expect("beach breakpoint is missing a child");
        while let Some(right) = self.nodes[key].right {
            key = right;
        }
        Some(key)
    }

    pub fn right_arc(&self, key: usize) -> Option<usize> {
        let bp = self.right_breakpoint(key)?;
        let mut key = self.nodes[bp].right.expect("beach breakpoint is missing a child");
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        Some(key)
    }

    /// Split arc `arc` by a new site below it.
    ///
    /// The arc becomes `arc, new, copy` where `copy` is a fresh arc of
    /// the old site. Both new breakpoints trace `edge`; the left one
    /// forward and the right one backward. Returns the keys of `new`
    /// and `copy`.
    pub fn split_arc(&mut self, arc: usize, site: Coordinate<T>, edge: usize) -> (usize, usize) {
        let old_site = self.arc(arc).site;
        let new = self.new_arc(site);
        let copy = self.new_arc(old_site);
        let right_bp = self.nodes.insert(BeachNode::new(NodeKind::Breakpoint(Breakpoint {
            left_site: site,
            right_site: old_site,
            edge,
            forward: false,
        })));
        let left_bp = self.nodes.insert(BeachNode::new(NodeKind::Breakpoint(Breakpoint {
            left_site: old_site,
            right_site: site,
            edge,
            forward: true,
        })));
        self.replace(arc, left_bp);
        self.link(left_bp, arc, right_bp);
        self.link(right_bp, new, copy);
        (new, copy)
    }

    /// Insert a new arc next to `arc`, separated by a single forward
    /// breakpoint tracing `edge`. Returns the key of the new arc.
    pub fn insert_beside(
        &mut self,
        arc: usize,
        site: Coordinate<T>,
        edge: usize,
        to_right: bool,
    ) -> usize {
        let old_site = self.arc(arc).site;
        let new = self.new_arc(site);
        let (left, right) = if to_right { (arc, new) } else { (new, arc) };
        let (left_site, right_site) = if to_right {
            (old_site, site)
        } else {
            (site, old_site)
        };
        let bp = self.nodes.insert(BeachNode::new(NodeKind::Breakpoint(Breakpoint {
            left_site,
            right_site,
            edge,
            forward: true,
        })));
        self.replace(arc, bp);
        self.link(bp, left, right);
        new
    }

    /// Remove arc `arc` together with its parent breakpoint.
    ///
    /// The remaining neighbouring breakpoint now separates the former
    /// neighbours and traces `edge` forward.
    pub fn remove_arc(&mut self, arc: usize, edge: usize) {
        let parent = self.nodes[arc]
            .parent
            .expect("only arc of the beach line cannot vanish");
        let left_bp = self
            .left_breakpoint(arc)
            .expect("vanishing arc has no left neighbour");
        let right_bp = self
            .right_breakpoint(arc)
            .expect("vanishing arc has no right neighbour");
        let (sibling, remaining) = if parent == left_bp {
            (self.nodes[parent].left, right_bp)
        } else {
            (self.nodes[parent].right, left_bp)
        };
        let sibling = sibling.expect("beach breakpoint is missing a child");
        let left_site = self.breakpoint(left_bp).left_site;
        let right_site = self.breakpoint(right_bp).right_site;

        self.replace(parent, sibling);
        self.nodes.remove(parent);
        self.nodes.remove(arc);

        let bp = self.breakpoint_mut(remaining);
        bp.left_site = left_site;
        bp.right_site = right_site;
        bp.edge = edge;
        bp.forward = true;
    }

    fn new_arc(&mut self, site: Coordinate<T>) -> usize {
        self.nodes
            .insert(BeachNode::new(NodeKind::Arc(Arc { site, circle: None })))
    }

    /// Put `new` in the position of `old` in the tree.
    fn replace(&mut self, old: usize, new: usize) {
        let parent = self.nodes[old].parent;
        self.nodes[new].parent = parent;
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = Some(new);
                } else {
                    debug_assert_eq!(node.right, Some(old));
                    node.right = Some(new);
                }
            }
        }
    }

    fn link(&mut self, parent: usize, left: usize, right: usize) {
        self.nodes[parent].left = Some(left);
        self.nodes[parent].right = Some(right);
        self.nodes[left].parent = Some(parent);
        self.nodes[right].parent = Some(parent);
    }

    /// Arc keys from left to right.
    #[cfg(test)]
    pub fn arcs(&self) -> Vec<usize> {
        let mut arcs = Vec::new();
        let mut first = match self.root {
            Some(root) => root,
            None => return arcs,
        };
        while let Some(left) = self.nodes[first].left {
            first = left;
        }
        let mut key = Some(first);
        while let Some(k) = key {
            arcs.push(k);
            key = self.right_arc(k);
        }
        arcs
    }
}

/// `x` of the breakpoint between the parabolas of `left` and `right`
/// when the sweep line is at `sweep`.
///
/// A site on the sweep line is a degenerate parabola: a vertical ray
/// through the site.
pub(super) fn breakpoint_x<T: GeoFloat>(left: Coordinate<T>, right: Coordinate<T>, sweep: T) -> T {
    if left.y == right.y {
        return (left.x + right.x) / two();
    }
    if left.y == sweep {
        return left.x;
    }
    if right.y == sweep {
        return right.x;
    }
    let da = two::<T>() * (left.y - sweep);
    let db = two::<T>() * (right.y - sweep);
    let a = db - da;
    let b = two::<T>() * (da * right.x - db * left.x);
    let c = db * (left.x * left.x + left.y * left.y - sweep * sweep)
        - da * (right.x * right.x + right.y * right.y - sweep * sweep);

    // Root (-b - sqrt(disc)) / 2a, evaluated without cancellation.
    let four = two::<T>() * two::<T>();
    let disc = (b * b - four * a * c).max(T::zero()).sqrt();
    if b < T::zero() {
        c / ((disc - b) / two())
    } else {
        -(b + disc) / two() / a
    }
}
