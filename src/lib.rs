//! Planar computational-geometry algorithms over [`geo`] types.
//!
//! 1. [Voronoi Diagrams](#voronoi-diagrams)
//! 1. [Line Merging](#line-merging)
//! 1. [Distance](#distance)
//! 1. [Validity](#validity)
//! 1. [Clipping](#clipping)
//!
//! # Voronoi Diagrams
//!
//! An implementation of [Fortune's algorithm] computing the Voronoi
//! edges and vertices of a set of sites. Use the [`Voronoi`] builder
//! to set a coordinate tolerance, or [`compute_voronoi_diagram`] for
//! the common case. Open edges can be cut to a window with
//! [`VoronoiDiagram::clipped_lines`].
//!
//! # Line Merging
//!
//! [`LineMerger`] joins line fragments sharing end points into
//! maximal line strings. It is built on [`PlanarGraph`], a graph of
//! coordinate-keyed nodes with angularly sorted directed edges.
//!
//! # Distance
//!
//! [`distance`], [`closest_points`] and [`is_within_distance`] between
//! arbitrary geometries. See [`DistanceOp`] for the nearest locations
//! and an early-exit threshold.
//!
//! ```rust
//! use geo::{line_string, point, Geometry};
//! use geo_planar::distance;
//!
//! let a: Geometry<f64> = point!(x: 0., y: 3.).into();
//! let b: Geometry<f64> = line_string![(x: -1., y: 0.), (x: 1., y: 0.)].into();
//! assert_eq!(distance(&a, &b), 3.);
//! ```
//!
//! # Validity
//!
//! [`validate`] checks polygonal geometries for repeated points,
//! nested rings and disconnected interiors.
//!
//! # Clipping
//!
//! [`clip::clip`] cuts a ring to a rectangle.
//!
//! [Fortune's algorithm]: //en.wikipedia.org/wiki/Fortune%27s_algorithm
mod point;
pub use point::{SweepPoint, Tolerance};

pub mod components;
pub use components::{ComponentId, Components};

pub mod locate;

pub mod graph;
pub use graph::{EdgeRing, PlanarGraph};

pub mod linemerge;
pub use linemerge::LineMerger;

pub mod voronoi;
pub use voronoi::{
    compute_voronoi_diagram, EdgeEnd, Voronoi, VoronoiDiagram, VoronoiEdge, VoronoiError,
};

pub mod distance;
pub use distance::{closest_points, distance, is_within_distance, DistanceOp, GeometryLocation};

pub mod validity;
pub use validity::{is_valid, validate, TopologyErrorKind, TopologyValidationError};

pub mod clip;

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;

#[cfg(test)]
pub(crate) mod tests {
    pub(crate) fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}

pub(crate) mod utils;
