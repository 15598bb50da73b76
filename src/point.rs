use geo::{Coordinate, GeoFloat};
use std::cmp::Ordering;

/// A finite [`Coordinate`] with a total order: by `x`, then by `y`.
///
/// Used as the key of ordered collections, such as the node map of a
/// [`PlanarGraph`](crate::PlanarGraph). Construction panics on
/// non-finite components, which keeps `Ord` consistent.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint<T: GeoFloat>(Coordinate<T>);

impl<T: GeoFloat> SweepPoint<T> {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }
}

impl<T: GeoFloat> PartialOrd for SweepPoint<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: GeoFloat> Ord for SweepPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        let ord = |a: T, b: T| a.partial_cmp(&b).expect("sweep point is not finite");
        ord(self.0.x, other.0.x).then_with(|| ord(self.0.y, other.0.y))
    }
}

impl<T: GeoFloat> Eq for SweepPoint<T> {}

impl<T: GeoFloat> From<Coordinate<T>> for SweepPoint<T> {
    fn from(pt: Coordinate<T>) -> Self {
        assert!(
            pt.x.is_finite() && pt.y.is_finite(),
            "sweep point requires finite coordinates, got {pt:?}"
        );
        SweepPoint(pt)
    }
}

impl<T: GeoFloat> From<(T, T)> for SweepPoint<T> {
    fn from(pt: (T, T)) -> Self {
        Coordinate::from(pt).into()
    }
}

/// Tolerance used to compare coordinates.
///
/// A zero tolerance (the default) is exact comparison. Two
/// coordinates are equal when both their `x` and `y` differ by at
/// most the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T: GeoFloat>(T);

impl<T: GeoFloat> Default for Tolerance<T> {
    fn default() -> Self {
        Tolerance(T::zero())
    }
}

impl<T: GeoFloat> Tolerance<T> {
    /// Create a tolerance; negative values are treated as zero.
    pub fn new(value: T) -> Self {
        Tolerance(value.max(T::zero()))
    }

    #[inline]
    pub fn value(&self) -> T {
        self.0
    }

    #[inline]
    pub fn scalars_eq(&self, a: T, b: T) -> bool {
        (a - b).abs() <= self.0
    }

    #[inline]
    pub fn coords_eq(&self, a: Coordinate<T>, b: Coordinate<T>) -> bool {
        self.scalars_eq(a.x, b.x) && self.scalars_eq(a.y, b.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_point_ordering() {
        let mut pts: Vec<SweepPoint<f64>> = vec![
            (1., 1.).into(),
            (0., 5.).into(),
            (1., -1.).into(),
            (0., 5.).into(),
        ];
        pts.sort();
        let coords: Vec<_> = pts.iter().map(|p| (p.coord().x, p.coord().y)).collect();
        assert_eq!(coords, vec![(0., 5.), (0., 5.), (1., -1.), (1., 1.)]);
        assert_eq!(pts[0].cmp(&pts[1]), Ordering::Equal);
    }

    #[test]
    #[should_panic]
    fn test_sweep_point_rejects_nan() {
        let _ = SweepPoint::from(Coordinate { x: f64::NAN, y: 0. });
    }

    #[test]
    fn test_tolerance() {
        let exact = Tolerance::<f64>::default();
        let a = Coordinate { x: 1., y: 2. };
        let b = Coordinate { x: 1. + 1e-9, y: 2. };
        assert!(exact.coords_eq(a, a));
        assert!(!exact.coords_eq(a, b));

        let loose = Tolerance::new(1e-6);
        assert!(loose.coords_eq(a, b));
        assert!(!loose.coords_eq(a, Coordinate { x: 1., y: 2.1 }));

        assert_eq!(Tolerance::new(-1.).value(), 0.);
    }
}
