//! Point-in-ring classification by counting ray crossings.
use geo::{kernels::Orientation, Coordinate, GeoFloat, LineString, Polygon};

use crate::utils::orient2d;

/// Topological location of a point relative to an areal geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

/// Counts crossings of a ray from `point` towards positive `x`.
///
/// Segments are fed one at a time; a point detected on a segment
/// short-circuits to [`Location::Boundary`].
#[derive(Debug, Clone)]
pub struct RayCrossingCounter<T: GeoFloat> {
    point: Coordinate<T>,
    crossings: usize,
    on_segment: bool,
}

impl<T: GeoFloat> RayCrossingCounter<T> {
    pub fn new(point: Coordinate<T>) -> Self {
        RayCrossingCounter {
            point,
            crossings: 0,
            on_segment: false,
        }
    }

    pub fn count_segment(&mut self, p1: Coordinate<T>, p2: Coordinate<T>) {
        let p = self.point;

        // Segment lies strictly to the left of the test point.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_segment = true;
            return;
        }
        // Horizontal segment at the ray's height.
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        // Upward or downward crossing of the ray's height; the lower
        // end point is excluded so that vertices are counted once.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let orientation = orient2d(p1, p2, p);
            if orientation == Orientation::Collinear {
                self.on_segment = true;
                return;
            }
            let left = if p2.y < p1.y {
                orientation == Orientation::Clockwise
            } else {
                orientation == Orientation::CounterClockwise
            };
            if left {
                self.crossings += 1;
            }
        }
    }

    #[inline]
    pub fn is_on_segment(&self) -> bool {
        self.on_segment
    }

    pub fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locate `point` relative to the ring given by `coords`.
///
/// The ring is treated as closed whether or not the last coordinate
/// repeats the first.
pub fn locate_in_ring<T: GeoFloat>(point: Coordinate<T>, coords: &[Coordinate<T>]) -> Location {
    let mut counter = RayCrossingCounter::new(point);
    let n = coords.len();
    if n == 0 {
        return Location::Exterior;
    }
    for i in 0..n {
        let p1 = coords[i];
        let p2 = coords[(i + 1) % n];
        counter.count_segment(p1, p2);
        if counter.is_on_segment() {
            break;
        }
    }
    counter.location()
}

/// Locate `point` relative to a polygon (shell minus holes).
pub fn locate_in_polygon<T: GeoFloat>(point: Coordinate<T>, polygon: &Polygon<T>) -> Location {
    let shell: &LineString<T> = polygon.exterior();
    if shell.0.is_empty() {
        return Location::Exterior;
    }
    match locate_in_ring(point, &shell.0) {
        Location::Interior => {}
        other => return other,
    }
    for hole in polygon.interiors() {
        match locate_in_ring(point, &hole.0) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}
