use std::{
    cmp::Ordering,
    collections::{BTreeSet, BinaryHeap},
};

use geo::{kernels::Orientation, Coordinate, GeoFloat};
use log::trace;
use slab::Slab;

use super::{beach::BeachLine, EdgeEnd, VoronoiEdge, VoronoiError};
use crate::{
    utils::{coord_distance, orient2d, two},
    SweepPoint, Tolerance,
};

/// A sweep event. The sweep line moves towards positive `y`.
#[derive(Debug, Clone, Copy)]
enum Event<T: GeoFloat> {
    /// Three arcs converge at a circle; `key` refers to the circle
    /// storage.
    Circle { point: Coordinate<T>, key: usize },
    Site(Coordinate<T>),
}

impl<T: GeoFloat> Event<T> {
    fn point(&self) -> Coordinate<T> {
        match self {
            Event::Circle { point, .. } => *point,
            Event::Site(point) => *point,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Event::Circle { .. } => 0,
            Event::Site(_) => 1,
        }
    }
}

/// Equality for heap ordering; ignores the circle key.
impl<T: GeoFloat> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: GeoFloat> Eq for Event<T> {}

/// Ordering for use with a max-heap (`BinaryHeap`): by `y`, then by
/// `x`, with circle events before site events at the same point.
impl<T: GeoFloat> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (p, q) = (self.point(), other.point());
        Some(
            p.y.partial_cmp(&q.y)
                .unwrap()
                .then_with(|| p.x.partial_cmp(&q.x).unwrap())
                .then_with(|| self.rank().cmp(&other.rank()))
                .reverse(),
        )
    }
}

/// Event points are finite, so the order is total.
impl<T: GeoFloat> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// A predicted vertex that removes `arc` from the beach line.
#[derive(Debug, Clone, Copy)]
struct Circle<T: GeoFloat> {
    arc: usize,
    center: Coordinate<T>,
    radius: T,
    valid: bool,
}

/// State of Fortune's sweep over a set of sites.
pub(super) struct Sweep<T: GeoFloat> {
    tolerance: Tolerance<T>,
    events: BinaryHeap<Event<T>>,
    circles: Slab<Circle<T>>,
    beach: BeachLine<T>,
    edges: Vec<VoronoiEdge<T>>,
    vertices: BTreeSet<SweepPoint<T>>,
}

impl<T: GeoFloat> Sweep<T> {
    /// Create a sweep over `sites`; they must be finite and distinct.
    pub fn new(sites: &[Coordinate<T>], tolerance: Tolerance<T>) -> Self {
        Sweep {
            tolerance,
            events: sites.iter().map(|&s| Event::Site(s)).collect(),
            circles: Slab::new(),
            beach: BeachLine::default(),
            edges: Vec::with_capacity(3 * sites.len()),
            vertices: BTreeSet::new(),
        }
    }

    /// Process all events; returns the edges and the sorted, distinct
    /// vertices.
    pub fn run(mut self) -> Result<(Vec<VoronoiEdge<T>>, Vec<Coordinate<T>>), VoronoiError> {
        while let Some(event) = self.events.pop() {
            match event {
                Event::Site(site) => self.handle_site(site)?,
                Event::Circle { key, .. } => self.handle_circle(key)?,
            }
        }
        let vertices = self.vertices.into_iter().map(|p| p.coord()).collect();
        Ok((self.edges, vertices))
    }

    fn handle_site(&mut self, site: Coordinate<T>) -> Result<(), VoronoiError> {
        trace!("site event: {site:?}");
        let arc = match self.beach.locate(site.x, site.y) {
            Some(arc) => arc,
            None => {
                self.beach.insert_root(site);
                return Ok(());
            }
        };
        let arc_site = self.beach.arc(arc).site;
        self.invalidate(arc);

        // A site level with the arc above it (only possible at the far
        // end of the beach line) forms no parabola yet: the bisector is
        // vertical and starts at infinity.
        let to_right = site.x > arc_site.x;
        let at_end = if to_right {
            self.beach.right_arc(arc).is_none()
        } else {
            self.beach.left_arc(arc).is_none()
        };
        if at_end && self.tolerance.scalars_eq(arc_site.y, site.y) {
            let edge = if to_right {
                self.new_edge(arc_site, site)
            } else {
                self.new_edge(site, arc_site)
            };
            let new = self.beach.insert_beside(arc, site, edge, to_right);
            self.invalidate_containing(site);
            self.check_circle(arc)?;
            self.check_circle(new)?;
        } else {
            let edge = self.new_edge(arc_site, site);
            let (_, copy) = self.beach.split_arc(arc, site, edge);
            self.invalidate_containing(site);
            self.check_circle(arc)?;
            self.check_circle(copy)?;
        }
        Ok(())
    }

    fn handle_circle(&mut self, key: usize) -> Result<(), VoronoiError> {
        let circle = self.circles.remove(key);
        if !circle.valid {
            return Ok(());
        }
        let vertex = circle.center;
        trace!("circle event: vertex {vertex:?}");

        let arc = circle.arc;
        let left = self
            .beach
            .left_arc(arc)
            .expect("circle event arc has no left neighbour");
        let right = self
            .beach
            .right_arc(arc)
            .expect("circle event arc has no right neighbour");
        for bp in [
            self.beach.left_breakpoint(arc),
            self.beach.right_breakpoint(arc),
        ] {
            let bp = *self
                .beach
                .breakpoint(bp.expect("circle event arc is missing a breakpoint"));
            let edge = &mut self.edges[bp.edge];
            if bp.forward {
                edge.set_end(vertex)?;
            } else {
                edge.set_start(vertex)?;
            }
        }
        self.vertices.insert(SweepPoint::from(vertex));

        let (left_site, right_site) = (self.beach.arc(left).site, self.beach.arc(right).site);
        let edge = self.new_edge(left_site, right_site);
        self.edges[edge].start = EdgeEnd::Vertex(vertex);
        self.beach.remove_arc(arc, edge);

        self.invalidate(left);
        self.invalidate(right);
        self.check_circle(left)?;
        self.check_circle(right)?;
        Ok(())
    }

    fn new_edge(&mut self, left: Coordinate<T>, right: Coordinate<T>) -> usize {
        self.edges.push(VoronoiEdge::new(left, right));
        self.edges.len() - 1
    }

    /// Drop the pending circle event of `arc`, if any.
    fn invalidate(&mut self, arc: usize) {
        if let Some(key) = self.beach.arc_mut(arc).circle.take() {
            self.circles[key].valid = false;
        }
    }

    /// Invalidate every pending circle that strictly contains `site`.
    fn invalidate_containing(&mut self, site: Coordinate<T>) {
        let tol = self.tolerance.value();
        for (_, circle) in self.circles.iter_mut() {
            if circle.valid && coord_distance(circle.center, site) < circle.radius - tol {
                circle.valid = false;
                self.beach.arc_mut(circle.arc).circle = None;
            }
        }
    }

    /// Schedule the circle event removing `arc`, if its neighbouring
    /// breakpoints converge.
    fn check_circle(&mut self, arc: usize) -> Result<(), VoronoiError> {
        self.invalidate(arc);
        let (left, right) = match (self.beach.left_arc(arc), self.beach.right_arc(arc)) {
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(()),
        };
        let a = self.beach.arc(left).site;
        let b = self.beach.arc(arc).site;
        let c = self.beach.arc(right).site;
        if self.tolerance.coords_eq(a, c) || orient2d(a, b, c) != Orientation::CounterClockwise {
            return Ok(());
        }

        let center = circumcenter(a, b, c)?;
        let radius = coord_distance(center, b);
        let point = Coordinate {
            x: center.x,
            y: center.y + radius,
        };
        let key = self.circles.insert(Circle {
            arc,
            center,
            radius,
            valid: true,
        });
        self.beach.arc_mut(arc).circle = Some(key);
        self.events.push(Event::Circle { point, key });
        Ok(())
    }
}

/// Center of the circle through three sites.
pub(super) fn circumcenter<T: GeoFloat>(
    a: Coordinate<T>,
    b: Coordinate<T>,
    c: Coordinate<T>,
) -> Result<Coordinate<T>, VoronoiError> {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = two::<T>() * (bx * cy - by * cx);
    if d == T::zero() {
        return Err(VoronoiError::DegenerateSites);
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let center = Coordinate {
        x: a.x + (cy * b2 - by * c2) / d,
        y: a.y + (bx * c2 - cx * b2) / d,
    };
    if !center.x.is_finite() || !center.y.is_finite() {
        return Err(VoronoiError::DegenerateSites);
    }
    Ok(center)
}

#[cfg(test)]
mod tests {
    use std::iter::from_fn;

    use super::*;

    #[test]
    fn test_event_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(Event::Site(Coordinate { x: 5., y: 1. }));
        heap.push(Event::Site(Coordinate { x: 0., y: 1. }));
        heap.push(Event::Circle {
            point: Coordinate { x: 5., y: 1. },
            key: 7,
        });
        heap.push(Event::Site(Coordinate { x: 9., y: 0. }));

        let order: Vec<_> = from_fn(|| heap.pop())
            .map(|e| (e.point().x, e.rank()))
            .collect();
        assert_eq!(order, vec![(9., 1), (0., 1), (5., 0), (5., 1)]);
    }

    #[test]
    fn test_circumcenter() {
        let center = circumcenter(
            Coordinate { x: 0., y: 0. },
            Coordinate { x: 10., y: 0. },
            Coordinate { x: 5., y: 10. },
        )
        .unwrap();
        assert_eq!(center, Coordinate::from((5., 3.75)));

        let collinear = circumcenter(
            Coordinate { x: 0., y: 0. },
            Coordinate { x: 1., y: 1. },
            Coordinate { x: 2., y: 2. },
        );
        assert_eq!(collinear, Err(VoronoiError::DegenerateSites));
        let coincident = circumcenter(
            Coordinate { x: 1., y: 1. },
            Coordinate { x: 1., y: 1. },
            Coordinate { x: 2., y: 2. },
        );
        assert_eq!(coincident, Err(VoronoiError::DegenerateSites));
    }
}
