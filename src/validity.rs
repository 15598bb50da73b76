//! Topological validity checks for polygonal geometries.
//!
//! [`validate`] runs, in order, the repeated-point check, the nested
//! ring checks and the connected-interior check, and reports the first
//! failure with the coordinate where it was detected.
//!
//! ```rust
//! use geo::{polygon, Geometry};
//! use geo_planar::{validate, TopologyErrorKind};
//!
//! let poly = polygon!(
//!     exterior: [(x: 0., y: 0.), (x: 10., y: 0.), (x: 10., y: 10.), (x: 0., y: 10.)],
//!     interiors: [[(x: 0., y: 5.), (x: 5., y: 7.), (x: 10., y: 5.), (x: 5., y: 3.)]]
//! );
//! let err = validate(&Geometry::Polygon(poly)).unwrap();
//! assert_eq!(err.kind, TopologyErrorKind::DisconnectedInterior);
//! ```
use std::fmt;

use geo::{Coordinate, GeoFloat, Geometry};
use log::debug;
use thiserror::Error;

use crate::components::Components;

mod connected;
mod nested;
mod repeated;

pub use connected::disconnected_interior;
pub use nested::{nested_hole, nested_shell, SweepLineIndex};
pub use repeated::repeated_point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyErrorKind {
    RepeatedPoint,
    NestedHoles,
    NestedShells,
    DisconnectedInterior,
}

impl fmt::Display for TopologyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TopologyErrorKind::RepeatedPoint => "repeated point",
            TopologyErrorKind::NestedHoles => "hole lies inside another hole",
            TopologyErrorKind::NestedShells => "shell lies inside another shell",
            TopologyErrorKind::DisconnectedInterior => "interior is disconnected",
        };
        f.write_str(msg)
    }
}

/// A validity failure and where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{kind} at ({:?}, {:?})", .coordinate.x, .coordinate.y)]
pub struct TopologyValidationError<T: GeoFloat> {
    pub kind: TopologyErrorKind,
    pub coordinate: Coordinate<T>,
}

impl<T: GeoFloat> TopologyValidationError<T> {
    fn new(kind: TopologyErrorKind, coordinate: Coordinate<T>) -> Self {
        TopologyValidationError { kind, coordinate }
    }
}

/// The first validity failure of `geom`, if any.
pub fn validate<T: GeoFloat>(geom: &Geometry<T>) -> Option<TopologyValidationError<T>> {
    if let Some(c) = repeated_point(geom) {
        return Some(TopologyValidationError::new(TopologyErrorKind::RepeatedPoint, c));
    }

    let comps = Components::new(geom);
    if let Some(c) = comps.polygons.iter().find_map(|p| nested_hole(p)) {
        return Some(TopologyValidationError::new(TopologyErrorKind::NestedHoles, c));
    }
    if let Geometry::MultiPolygon(mp) = geom {
        if let Some(c) = nested_shell(&mp.0) {
            return Some(TopologyValidationError::new(TopologyErrorKind::NestedShells, c));
        }
    }

    if let Some(c) = comps.polygons.iter().find_map(|p| disconnected_interior(p)) {
        return Some(TopologyValidationError::new(
            TopologyErrorKind::DisconnectedInterior,
            c,
        ));
    }
    debug!("validate: {n} polygons valid", n = comps.polygons.len());
    None
}

#[inline]
pub fn is_valid<T: GeoFloat>(geom: &Geometry<T>) -> bool {
    validate(geom).is_none()
}
