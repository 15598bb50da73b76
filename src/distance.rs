//! Minimum distance and closest points between two geometries.
//!
//! The search is brute force over components and segments, pruned by
//! envelope distance. It proceeds in order of increasing cost and
//! stops as soon as the running minimum drops to the terminate
//! distance:
//!
//! 1. a component of one geometry inside a polygon of the other
//!    (distance zero),
//! 2. segments against segments,
//! 3. segments against points (both ways), then points against
//!    points.
use geo::{bounding_rect::BoundingRect, Coordinate, GeoFloat, Geometry, Line, Rect};
use log::debug;

use crate::{
    components::{ComponentId, Components},
    locate::{locate_in_polygon, Location},
    utils::{
        coord_distance, envelope_distance, segment_closest_point, segment_closest_points,
    },
};

/// A point on a geometry with the component it lies on.
///
/// `segment` is the index of the segment within a linear component;
/// it is `None` for points and for locations inside a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryLocation<T: GeoFloat> {
    pub component: ComponentId,
    pub segment: Option<usize>,
    pub coord: Coordinate<T>,
}

impl<T: GeoFloat> GeometryLocation<T> {
    fn new(component: ComponentId, segment: Option<usize>, coord: Coordinate<T>) -> Self {
        GeometryLocation {
            component,
            segment,
            coord,
        }
    }
}

/// Distance computation between a pair of geometries.
///
/// The result is computed on first query and cached.
#[derive(Debug, Clone)]
pub struct DistanceOp<'a, T: GeoFloat> {
    geoms: [&'a Geometry<T>; 2],
    terminate_distance: T,
    result: Option<(T, Option<[GeometryLocation<T>; 2]>)>,
}

impl<'a, T: GeoFloat> DistanceOp<'a, T> {
    pub fn new(a: &'a Geometry<T>, b: &'a Geometry<T>) -> Self {
        Self::with_terminate_distance(a, b, T::zero())
    }

    /// Stop searching once a distance of at most `terminate_distance`
    /// is found; the reported distance is then only guaranteed to be
    /// within the threshold, not minimal.
    pub fn with_terminate_distance(a: &'a Geometry<T>, b: &'a Geometry<T>, terminate_distance: T) -> Self {
        DistanceOp {
            geoms: [a, b],
            terminate_distance,
            result: None,
        }
    }

    /// The distance; zero if either geometry is empty.
    pub fn distance(&mut self) -> T {
        self.compute().0
    }

    /// Closest points, first on `a` and then on `b`. `None` if either
    /// geometry is empty.
    pub fn nearest_points(&mut self) -> Option<(Coordinate<T>, Coordinate<T>)> {
        self.compute()
            .1
            .map(|[a, b]| (a.coord, b.coord))
    }

    pub fn nearest_locations(&mut self) -> Option<[GeometryLocation<T>; 2]> {
        self.compute().1
    }

    fn compute(&mut self) -> (T, Option<[GeometryLocation<T>; 2]>) {
        let geoms = self.geoms;
        let terminate = self.terminate_distance;
        *self.result.get_or_insert_with(|| {
            let search = Search::new(geoms, terminate);
            search.run()
        })
    }
}

/// Running minimum of the search.
struct Nearest<T: GeoFloat> {
    terminate: T,
    min: T,
    locations: Option<[GeometryLocation<T>; 2]>,
}

impl<T: GeoFloat> Nearest<T> {
    #[inline]
    fn done(&self) -> bool {
        self.min <= self.terminate
    }

    /// Record `(p, q)` (on the first and second geometry) if it is
    /// closer than the current minimum.
    fn update(&mut self, p: GeometryLocation<T>, q: GeometryLocation<T>) {
        let dist = coord_distance(p.coord, q.coord);
        if dist < self.min {
            self.min = dist;
            self.locations = Some([p, q]);
        }
    }
}

struct Search<T: GeoFloat> {
    comps: [Components<T>; 2],
    nearest: Nearest<T>,
}

impl<T: GeoFloat> Search<T> {
    fn new(geoms: [&Geometry<T>; 2], terminate: T) -> Self {
        Search {
            comps: [Components::new(geoms[0]), Components::new(geoms[1])],
            nearest: Nearest {
                terminate,
                min: T::infinity(),
                locations: None,
            },
        }
    }

    fn run(mut self) -> (T, Option<[GeometryLocation<T>; 2]>) {
        if self.comps[0].is_empty() || self.comps[1].is_empty() {
            return (T::zero(), None);
        }
        self.compute_containment();
        if self.nearest.done() {
            debug!("distance: containment");
            return self.result();
        }
        self.compute_lines();
        if self.nearest.done() {
            debug!("distance: line-line {min:?}", min = self.nearest.min);
            return self.result();
        }
        self.compute_line_points(0);
        if !self.nearest.done() {
            self.compute_line_points(1);
        }
        if !self.nearest.done() {
            self.compute_points();
        }
        debug!("distance: all tiers {min:?}", min = self.nearest.min);
        self.result()
    }

    fn result(&self) -> (T, Option<[GeometryLocation<T>; 2]>) {
        (self.nearest.min, self.nearest.locations)
    }

    fn compute_containment(&mut self) {
        let Search { comps, nearest } = self;
        for poly_side in 0..2 {
            let loc_side = 1 - poly_side;
            for (pi, poly) in comps[poly_side].polygons.iter().enumerate() {
                for (id, coord) in comps[loc_side].locations() {
                    if locate_in_polygon(coord, poly) == Location::Exterior {
                        continue;
                    }
                    let inside = GeometryLocation::new(ComponentId::Polygon(pi), None, coord);
                    let loc = GeometryLocation::new(id, None, coord);
                    if poly_side == 0 {
                        nearest.update(inside, loc);
                    } else {
                        nearest.update(loc, inside);
                    }
                    return;
                }
            }
        }
    }

    fn compute_lines(&mut self) {
        let Search { comps, nearest } = self;
        for (i, l0) in comps[0].linear().enumerate() {
            let env0 = match l0.bounding_rect() {
                Some(env) => env,
                None => continue,
            };
            for (j, l1) in comps[1].linear().enumerate() {
                let env1 = match l1.bounding_rect() {
                    Some(env) => env,
                    None => continue,
                };
                if envelope_distance(&env0, &env1) > nearest.min {
                    continue;
                }
                for (si, s0) in l0.lines().enumerate() {
                    let senv0 = s0.bounding_rect();
                    for (sj, s1) in l1.lines().enumerate() {
                        if envelope_distance(&senv0, &s1.bounding_rect()) > nearest.min {
                            continue;
                        }
                        let (p, q) = segment_closest_points(s0, s1);
                        nearest.update(
                            GeometryLocation::new(ComponentId::Linear(i), Some(si), p),
                            GeometryLocation::new(ComponentId::Linear(j), Some(sj), q),
                        );
                        if nearest.done() {
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Segments of geometry `line_side` against points of the other.
    fn compute_line_points(&mut self, line_side: usize) {
        let Search { comps, nearest } = self;
        let pt_side = 1 - line_side;
        for (i, line) in comps[line_side].linear().enumerate() {
            let env = match line.bounding_rect() {
                Some(env) => env,
                None => continue,
            };
            for (k, &pt) in comps[pt_side].points.iter().enumerate() {
                if envelope_distance(&env, &Rect::new(pt, pt)) > nearest.min {
                    continue;
                }
                for (si, seg) in line.lines().enumerate() {
                    let on_line = GeometryLocation::new(
                        ComponentId::Linear(i),
                        Some(si),
                        closest_on_segment(pt, seg),
                    );
                    let point = GeometryLocation::new(ComponentId::Point(k), None, pt);
                    if line_side == 0 {
                        nearest.update(on_line, point);
                    } else {
                        nearest.update(point, on_line);
                    }
                    if nearest.done() {
                        return;
                    }
                }
            }
        }
    }

    fn compute_points(&mut self) {
        let Search { comps, nearest } = self;
        for (i, &p) in comps[0].points.iter().enumerate() {
            for (j, &q) in comps[1].points.iter().enumerate() {
                nearest.update(
                    GeometryLocation::new(ComponentId::Point(i), None, p),
                    GeometryLocation::new(ComponentId::Point(j), None, q),
                );
                if nearest.done() {
                    return;
                }
            }
        }
    }
}

#[inline]
fn closest_on_segment<T: GeoFloat>(p: Coordinate<T>, seg: Line<T>) -> Coordinate<T> {
    segment_closest_point(p, seg.start, seg.end)
}

/// Minimum distance between `a` and `b`; zero if either is empty.
pub fn distance<T: GeoFloat>(a: &Geometry<T>, b: &Geometry<T>) -> T {
    DistanceOp::new(a, b).distance()
}

/// A closest pair of points, the first on `a`.
pub fn closest_points<T: GeoFloat>(
    a: &Geometry<T>,
    b: &Geometry<T>,
) -> Option<(Coordinate<T>, Coordinate<T>)> {
    DistanceOp::new(a, b).nearest_points()
}

/// Whether `a` and `b` are within `threshold` of each other.
pub fn is_within_distance<T: GeoFloat>(a: &Geometry<T>, b: &Geometry<T>, threshold: T) -> bool {
    if let (Some(env_a), Some(env_b)) = (a.bounding_rect(), b.bounding_rect()) {
        if envelope_distance(&env_a, &env_b) > threshold {
            return false;
        }
    }
    DistanceOp::with_terminate_distance(a, b, threshold).distance() <= threshold
}
