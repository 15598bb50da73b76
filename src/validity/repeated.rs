use geo::{Coordinate, GeoFloat, Geometry};

use crate::components::Components;

/// The first coordinate repeated consecutively in any line string or
/// polygon ring of `geom`.
pub fn repeated_point<T: GeoFloat>(geom: &Geometry<T>) -> Option<Coordinate<T>> {
    Components::new(geom)
        .linear()
        .find_map(|line| line.0.windows(2).find(|w| w[0] == w[1]).map(|w| w[0]))
}
