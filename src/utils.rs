use geo::{
    kernels::{Kernel, Orientation},
    line_intersection::{line_intersection, LineIntersection},
    winding_order::WindingOrder,
    Coordinate, GeoFloat, Line, Rect,
};

pub fn winding_inverse(winding: WindingOrder) -> WindingOrder {
    match winding {
        WindingOrder::Clockwise => WindingOrder::CounterClockwise,
        WindingOrder::CounterClockwise => WindingOrder::Clockwise,
    }
}

#[inline]
pub fn orient2d<T: GeoFloat>(p: Coordinate<T>, q: Coordinate<T>, r: Coordinate<T>) -> Orientation {
    T::Ker::orient2d(p, q, r)
}

#[inline]
pub fn two<T: GeoFloat>() -> T {
    T::one() + T::one()
}

#[inline]
pub fn coord_distance<T: GeoFloat>(a: Coordinate<T>, b: Coordinate<T>) -> T {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Closest point of segment `(a, b)` to `p`.
pub fn segment_closest_point<T: GeoFloat>(
    p: Coordinate<T>,
    a: Coordinate<T>,
    b: Coordinate<T>,
) -> Coordinate<T> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == T::zero() {
        return a;
    }
    let r = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2;
    if r <= T::zero() {
        a
    } else if r >= T::one() {
        b
    } else {
        Coordinate {
            x: a.x + r * dx,
            y: a.y + r * dy,
        }
    }
}

/// Closest pair of points between the segments `s0` and `s1`; the
/// first point lies on `s0`.
///
/// Intersecting segments return the (first) intersection point twice.
pub fn segment_closest_points<T: GeoFloat>(s0: Line<T>, s1: Line<T>) -> (Coordinate<T>, Coordinate<T>) {
    if let Some(ixn) = line_intersection(s0, s1) {
        let pt = match ixn {
            LineIntersection::SinglePoint { intersection, .. } => intersection,
            LineIntersection::Collinear { intersection } => intersection.start,
        };
        return (pt, pt);
    }

    let candidates = [
        (segment_closest_point(s1.start, s0.start, s0.end), s1.start),
        (segment_closest_point(s1.end, s0.start, s0.end), s1.end),
        (s0.start, segment_closest_point(s0.start, s1.start, s1.end)),
        (s0.end, segment_closest_point(s0.end, s1.start, s1.end)),
    ];
    let mut best = candidates[0];
    let mut best_dist = coord_distance(best.0, best.1);
    for &(p, q) in &candidates[1..] {
        let dist = coord_distance(p, q);
        if dist < best_dist {
            best = (p, q);
            best_dist = dist;
        }
    }
    best
}

/// Distance between two envelopes; zero if they intersect.
pub fn envelope_distance<T: GeoFloat>(a: &Rect<T>, b: &Rect<T>) -> T {
    let dx = (b.min().x - a.max().x).max(a.min().x - b.max().x).max(T::zero());
    let dy = (b.min().y - a.max().y).max(a.min().y - b.max().y).max(T::zero());
    dx.hypot(dy)
}

#[inline]
pub fn envelopes_intersect<T: GeoFloat>(a: &Rect<T>, b: &Rect<T>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_closest_point() {
        let a = Coordinate { x: 0., y: 0. };
        let b = Coordinate { x: 10., y: 0. };
        assert_eq!(segment_closest_point((5., 3.).into(), a, b), Coordinate::from((5., 0.)));
        assert_eq!(segment_closest_point((-5., 3.).into(), a, b), a);
        assert_eq!(segment_closest_point((15., -3.).into(), a, b), b);
        assert_eq!(segment_closest_point((15., -3.).into(), a, a), a);
        let p = Coordinate::from((13., 4.));
        assert_relative_eq!(coord_distance(p, segment_closest_point(p, a, b)), 5.);
    }

    #[test]
    fn test_segment_closest_points() {
        let s0 = Line::from([(0., 0.), (10., 0.)]);
        let crossing = Line::from([(5., -5.), (5., 5.)]);
        let mid = Coordinate::from((5., 0.));
        assert_eq!(segment_closest_points(s0, crossing), (mid, mid));

        let parallel = Line::from([(2., 3.), (4., 3.)]);
        let (p, q) = segment_closest_points(s0, parallel);
        assert_relative_eq!(coord_distance(p, q), 3.);
        assert_eq!(q.y, 3.);

        let apart = Line::from([(13., 4.), (20., 4.)]);
        let (p, q) = segment_closest_points(s0, apart);
        assert_eq!(p, Coordinate::from((10., 0.)));
        assert_eq!(q, Coordinate::from((13., 4.)));
        assert_relative_eq!(coord_distance(p, q), 5.);
    }

    #[test]
    fn test_envelope_distance() {
        let a = Rect::new((0., 0.), (1., 1.));
        let b = Rect::new((4., 5.), (6., 6.));
        let c = Rect::new((0.5, 0.5), (2., 2.));
        assert_relative_eq!(envelope_distance(&a, &b), 5.);
        assert_eq!(envelope_distance(&a, &c), 0.);
        assert!(envelopes_intersect(&a, &c));
        assert!(!envelopes_intersect(&a, &b));
    }
}
