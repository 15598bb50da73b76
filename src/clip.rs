//! Clip rings to an axis-aligned rectangle.
//!
//! The ring is clipped against each side of the rectangle in turn
//! (Sutherland–Hodgman). The result may contain zero-width spikes
//! along the rectangle boundary where a concave ring leaves and
//! re-enters.
//!
//! ```rust
//! use geo::{Coordinate, Rect};
//! use geo_planar::clip::clip;
//!
//! let ring: Vec<Coordinate<f64>> = vec![(5., 5.).into(), (15., 5.).into(), (5., 15.).into()];
//! let clipped = clip(&ring, Rect::new((0., 0.), (10., 10.)));
//! assert_eq!(clipped.first(), clipped.last());
//! assert!(clipped.iter().all(|c| c.x <= 10. && c.y <= 10.));
//! ```
use geo::{Coordinate, GeoFloat, LineString, Polygon, Rect};
use log::trace;

#[derive(Debug, Clone, Copy)]
enum Boundary<T: GeoFloat> {
    Right(T),
    Top(T),
    Left(T),
    Bottom(T),
}

impl<T: GeoFloat> Boundary<T> {
    #[inline]
    fn inside(&self, c: Coordinate<T>) -> bool {
        match *self {
            Boundary::Right(x) => c.x <= x,
            Boundary::Top(y) => c.y <= y,
            Boundary::Left(x) => c.x >= x,
            Boundary::Bottom(y) => c.y >= y,
        }
    }

    /// Where the segment `a`-`b` crosses this boundary. The segment
    /// must not be parallel to it.
    fn intersection(&self, a: Coordinate<T>, b: Coordinate<T>) -> Coordinate<T> {
        match *self {
            Boundary::Right(x) | Boundary::Left(x) => {
                let t = (x - a.x) / (b.x - a.x);
                Coordinate {
                    x,
                    y: a.y + t * (b.y - a.y),
                }
            }
            Boundary::Top(y) | Boundary::Bottom(y) => {
                let t = (y - a.y) / (b.y - a.y);
                Coordinate {
                    x: a.x + t * (b.x - a.x),
                    y,
                }
            }
        }
    }

    fn clip(&self, input: &[Coordinate<T>]) -> Vec<Coordinate<T>> {
        let mut output = Vec::with_capacity(input.len() + 2);
        let mut prev = match input.last() {
            Some(&c) => c,
            None => return output,
        };
        let mut prev_inside = self.inside(prev);
        for &curr in input {
            let curr_inside = self.inside(curr);
            match (prev_inside, curr_inside) {
                (true, true) => output.push(curr),
                (true, false) => output.push(self.intersection(prev, curr)),
                (false, true) => {
                    output.push(self.intersection(prev, curr));
                    output.push(curr);
                }
                (false, false) => {}
            }
            prev = curr;
            prev_inside = curr_inside;
        }
        output
    }
}

/// Clip the ring `vertices` to `rect`.
///
/// The input may be open or closed. The output is closed, or empty if
/// the ring lies entirely outside `rect`.
pub fn clip<T: GeoFloat>(vertices: &[Coordinate<T>], rect: Rect<T>) -> Vec<Coordinate<T>> {
    let open = match vertices {
        [first, .., last] if first == last => &vertices[..vertices.len() - 1],
        _ => vertices,
    };
    let (min, max) = (rect.min(), rect.max());
    let mut ring = open.to_vec();
    for boundary in [
        Boundary::Right(max.x),
        Boundary::Top(max.y),
        Boundary::Left(min.x),
        Boundary::Bottom(min.y),
    ] {
        ring = boundary.clip(&ring);
        trace!("clip: {boundary:?} -> {n} vertices", n = ring.len());
    }
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Clip the shell and holes of `polygon` to `rect`.
///
/// Returns `None` if the clipped shell has no area. Holes clipped
/// away are dropped.
pub fn clip_polygon<T: GeoFloat>(polygon: &Polygon<T>, rect: Rect<T>) -> Option<Polygon<T>> {
    let clip_ring = |ring: &LineString<T>| {
        let clipped = clip(&ring.0, rect);
        if clipped.len() < 4 {
            None
        } else {
            Some(LineString(clipped))
        }
    };
    let exterior = clip_ring(polygon.exterior())?;
    let interiors = polygon.interiors().iter().filter_map(clip_ring).collect();
    Some(Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{algorithm::area::Area, polygon};

    fn coords(pts: &[(f64, f64)]) -> Vec<Coordinate<f64>> {
        pts.iter().map(|&p| p.into()).collect()
    }

    fn rect() -> Rect<f64> {
        Rect::new((0., 0.), (10., 10.))
    }

    #[test]
    fn test_inside() {
        let ring = coords(&[(1., 1.), (2., 1.), (2., 2.), (1., 1.)]);
        assert_eq!(clip(&ring, rect()), ring);

        let open = coords(&[(1., 1.), (2., 1.), (2., 2.)]);
        assert_eq!(clip(&open, rect()), ring);

        // On the boundary counts as inside.
        let ring = coords(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.)]);
        assert_eq!(clip(&ring, rect()), ring);
    }

    #[test]
    fn test_outside() {
        let ring = coords(&[(11., 1.), (12., 1.), (12., 2.), (11., 1.)]);
        assert!(clip(&ring, rect()).is_empty());
        assert!(clip::<f64>(&[], rect()).is_empty());
    }

    #[test]
    fn test_partial() {
        let ring = coords(&[(5., 5.), (15., 5.), (15., 15.), (5., 15.), (5., 5.)]);
        let clipped = clip(&ring, rect());
        assert_eq!(
            clipped,
            coords(&[(5., 10.), (5., 5.), (10., 5.), (10., 10.), (5., 10.)])
        );
        assert_eq!(clip(&clipped, rect()), clipped);
    }

    #[test]
    fn test_diagonal() {
        // Cuts a triangle off every corner.
        let ring = coords(&[(-2., 5.), (5., -2.), (12., 5.), (5., 12.)]);
        let clipped = clip(&ring, rect());
        assert_eq!(clipped.len(), 9);
        for c in clipped.iter() {
            assert!(c.x >= 0. && c.x <= 10. && c.y >= 0. && c.y <= 10.);
        }
        let area = Polygon::new(LineString(clipped), vec![]).unsigned_area();
        assert_relative_eq!(area, 100. - 4. * 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_clip_polygon() {
        let poly = polygon!(
            exterior: [(x: 0., y: 0.), (x: 20., y: 0.), (x: 20., y: 20.), (x: 0., y: 20.)],
            interiors: [
                [(x: 2., y: 2.), (x: 4., y: 2.), (x: 4., y: 4.), (x: 2., y: 4.)],
                [(x: 15., y: 15.), (x: 18., y: 15.), (x: 18., y: 18.), (x: 15., y: 18.)]
            ]
        );
        let clipped = clip_polygon(&poly, rect()).unwrap();
        assert_eq!(clipped.exterior().0.len(), 5);
        assert_eq!(clipped.interiors().len(), 1);
        assert_relative_eq!(clipped.unsigned_area(), 96.);

        let far = Rect::new((50., 50.), (60., 60.));
        assert!(clip_polygon(&poly, far).is_none());
    }
}
