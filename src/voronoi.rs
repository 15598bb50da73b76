//! Voronoi diagrams by Fortune's sweep-line algorithm.
//!
//! The sweep line moves towards positive `y`. The beach line is kept
//! as a binary tree of arcs and breakpoints in a slab; circle events
//! are invalidated lazily by flag and discarded when popped.
//!
//! ```rust
//! use geo::Coordinate;
//! use geo_planar::Voronoi;
//!
//! let sites = vec![
//!     Coordinate { x: 0., y: 0. },
//!     Coordinate { x: 10., y: 0. },
//!     Coordinate { x: 5., y: 10. },
//! ];
//! let diagram = Voronoi::new().compute(sites).unwrap();
//! assert_eq!(diagram.edges.len(), 3);
//! assert_eq!(diagram.vertices, vec![Coordinate { x: 5., y: 3.75 }]);
//! ```
use geo::{Coordinate, GeoFloat, Line, Rect};
use log::debug;
use thiserror::Error;

use crate::Tolerance;

mod beach;
mod edge;
mod sweep;

pub use edge::{EdgeEnd, VoronoiEdge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoronoiError {
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },
    #[error("circumcenter requested for coincident or collinear sites")]
    DegenerateSites,
    #[error("edge already has both end points")]
    EdgeComplete,
}

/// The edges and vertices of a Voronoi diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiDiagram<T: GeoFloat> {
    pub edges: Vec<VoronoiEdge<T>>,
    /// Distinct finite vertices, sorted by `x` then `y`.
    pub vertices: Vec<Coordinate<T>>,
}

impl<T: GeoFloat> VoronoiDiagram<T> {
    /// Every edge as a segment clipped to `bounds`.
    ///
    /// Open and infinite ends are extended along the edge direction.
    /// Edges that miss `bounds` are skipped.
    pub fn clipped_lines(&self, bounds: Rect<T>) -> Vec<Line<T>> {
        self.edges
            .iter()
            .filter_map(|edge| clip_edge(edge, &bounds))
            .collect()
    }
}

/// Builder for a single Voronoi computation.
#[derive(Debug, Clone, Copy)]
pub struct Voronoi<T: GeoFloat> {
    tolerance: Tolerance<T>,
    trim: bool,
}

impl<T: GeoFloat> Default for Voronoi<T> {
    fn default() -> Self {
        Voronoi {
            tolerance: Tolerance::default(),
            trim: true,
        }
    }
}

impl<T: GeoFloat> Voronoi<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinates within `tolerance` of each other (in both `x` and
    /// `y`) are treated as equal. Defaults to zero.
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = Tolerance::new(tolerance);
        self
    }

    /// Whether to mark open ends as [`EdgeEnd::Infinite`] and drop
    /// edges of (near) zero length. Enabled by default; disable to
    /// keep open ends as [`EdgeEnd::Unknown`] for later clipping.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn compute<I>(&self, sites: I) -> Result<VoronoiDiagram<T>, VoronoiError>
    where
        I: IntoIterator<Item = Coordinate<T>>,
    {
        let sites = self.prepare_sites(sites)?;
        let (mut edges, vertices) = sweep::Sweep::new(&sites, self.tolerance).run()?;
        if self.trim {
            self.trim_edges(&mut edges);
        }
        debug!(
            "voronoi: {sites} sites, {edges} edges, {vertices} vertices",
            sites = sites.len(),
            edges = edges.len(),
            vertices = vertices.len()
        );
        Ok(VoronoiDiagram { edges, vertices })
    }

    /// Validate and sort the sites in sweep order, collapsing
    /// duplicates within the tolerance.
    fn prepare_sites<I>(&self, sites: I) -> Result<Vec<Coordinate<T>>, VoronoiError>
    where
        I: IntoIterator<Item = Coordinate<T>>,
    {
        let mut sites: Vec<_> = sites.into_iter().collect();
        if let Some(index) = sites
            .iter()
            .position(|s| !s.x.is_finite() || !s.y.is_finite())
        {
            return Err(VoronoiError::NonFiniteSite { index });
        }
        sites.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap()
                .then_with(|| a.x.partial_cmp(&b.x).unwrap())
        });
        // Sites equal to a kept one lie within the tolerance below it
        // in sweep order, though not necessarily adjacent to it.
        let tolerance = self.tolerance;
        let mut kept: Vec<Coordinate<T>> = Vec::with_capacity(sites.len());
        for site in sites {
            let duplicate = kept
                .iter()
                .rev()
                .take_while(|k| site.y - k.y <= tolerance.value())
                .any(|k| tolerance.coords_eq(*k, site));
            if !duplicate {
                kept.push(site);
            }
        }
        Ok(kept)
    }

    fn trim_edges(&self, edges: &mut Vec<VoronoiEdge<T>>) {
        for edge in edges.iter_mut() {
            for end in [&mut edge.start, &mut edge.end] {
                if let EdgeEnd::Unknown = end {
                    *end = EdgeEnd::Infinite;
                }
            }
        }
        let tolerance = self.tolerance;
        edges.retain(|edge| match (edge.start, edge.end) {
            (EdgeEnd::Vertex(a), EdgeEnd::Vertex(b)) => !tolerance.coords_eq(a, b),
            _ => true,
        });
    }
}

/// Voronoi diagram of `sites` with open ends marked infinite.
pub fn compute_voronoi_diagram<T, I>(
    sites: I,
    tolerance: Option<T>,
) -> Result<VoronoiDiagram<T>, VoronoiError>
where
    T: GeoFloat,
    I: IntoIterator<Item = Coordinate<T>>,
{
    let mut builder = Voronoi::new();
    if let Some(tolerance) = tolerance {
        builder = builder.tolerance(tolerance);
    }
    builder.compute(sites)
}

fn clip_edge<T: GeoFloat>(edge: &VoronoiEdge<T>, bounds: &Rect<T>) -> Option<Line<T>> {
    let inf = T::infinity();
    let (origin, dir, t0, t1) = match (edge.start.vertex(), edge.end.vertex()) {
        (Some(a), Some(b)) => (a, b - a, T::zero(), T::one()),
        (Some(a), None) => (a, edge.direction(), T::zero(), inf),
        (None, Some(b)) => (b, edge.direction(), -inf, T::zero()),
        (None, None) => (edge.midpoint(), edge.direction(), -inf, inf),
    };
    clip_parametric(origin, dir, t0, t1, bounds)
}

/// Liang–Barsky clip of `origin + t * dir` for `t` in `[t0, t1]`.
fn clip_parametric<T: GeoFloat>(
    origin: Coordinate<T>,
    dir: Coordinate<T>,
    mut t0: T,
    mut t1: T,
    bounds: &Rect<T>,
) -> Option<Line<T>> {
    let (min, max) = (bounds.min(), bounds.max());
    let checks = [
        (-dir.x, origin.x - min.x),
        (dir.x, max.x - origin.x),
        (-dir.y, origin.y - min.y),
        (dir.y, max.y - origin.y),
    ];
    for &(p, q) in checks.iter() {
        if p == T::zero() {
            if q < T::zero() {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < T::zero() {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    if t0 > t1 || !t0.is_finite() || !t1.is_finite() {
        return None;
    }
    let at = |t: T| Coordinate {
        x: origin.x + t * dir.x,
        y: origin.y + t * dir.y,
    };
    Some(Line::new(at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{random::uniform_sites, tests::init_log, utils::coord_distance};
    use approx::assert_relative_eq;
    use rand::thread_rng;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coordinate<f64>> {
        pts.iter().map(|&p| p.into()).collect()
    }

    fn finite_ends(edge: &VoronoiEdge<f64>) -> impl Iterator<Item = Coordinate<f64>> {
        edge.start.vertex().into_iter().chain(edge.end.vertex())
    }

    #[test]
    fn test_triangle() {
        init_log();
        let diagram = compute_voronoi_diagram(coords(&[(0., 0.), (10., 0.), (5., 10.)]), None)
            .unwrap();
        let vertex = Coordinate::from((5., 3.75));
        assert_eq!(diagram.vertices, vec![vertex]);
        assert_eq!(diagram.edges.len(), 3);
        for edge in diagram.edges.iter() {
            let ends = [edge.start, edge.end];
            assert_eq!(ends.iter().filter(|e| e.vertex() == Some(vertex)).count(), 1);
            assert_eq!(
                ends.iter().filter(|e| **e == EdgeEnd::Infinite).count(),
                1
            );
        }

        // Walking along every edge keeps its left site on the left.
        for edge in diagram.edges.iter() {
            let d = edge.direction();
            let to_left = edge.left - edge.midpoint();
            assert!(d.x * to_left.y - d.y * to_left.x > 0.);
        }
    }

    #[test]
    fn test_untrimmed() {
        let diagram = Voronoi::new()
            .trim(false)
            .compute(coords(&[(0., 0.), (10., 0.), (5., 10.)]))
            .unwrap();
        assert_eq!(diagram.edges.len(), 3);
        for edge in diagram.edges.iter() {
            assert!(edge.start == EdgeEnd::Unknown || edge.end == EdgeEnd::Unknown);
            assert!(edge.start != EdgeEnd::Infinite && edge.end != EdgeEnd::Infinite);
        }
    }

    #[test]
    fn test_cocircular_square() {
        let diagram = Voronoi::new()
            .compute(coords(&[(0., 0.), (10., 0.), (0., 10.), (10., 10.)]))
            .unwrap();
        assert_eq!(diagram.vertices, coords(&[(5., 5.)]));
        assert_eq!(diagram.edges.len(), 4);
        for edge in diagram.edges.iter() {
            assert_eq!(finite_ends(edge).collect::<Vec<_>>(), coords(&[(5., 5.)]));
        }
    }

    #[test]
    fn test_collinear_sites() {
        for sites in [
            coords(&[(0., 0.), (1., 1.), (2., 2.)]),
            coords(&[(0., 0.), (10., 0.), (20., 0.), (30., 0.)]),
        ] {
            let diagram = Voronoi::new().compute(sites.clone()).unwrap();
            assert!(diagram.vertices.is_empty());
            assert_eq!(diagram.edges.len(), sites.len() - 1);
            let d0 = diagram.edges[0].direction();
            for edge in diagram.edges.iter() {
                assert_eq!(edge.start, EdgeEnd::Infinite);
                assert_eq!(edge.end, EdgeEnd::Infinite);
                let d = edge.direction();
                assert_relative_eq!(d0.x * d.y - d0.y * d.x, 0.);
            }
        }
    }

    #[test]
    fn test_degenerate_input() {
        let diagram = Voronoi::<f64>::new().compute(vec![]).unwrap();
        assert!(diagram.edges.is_empty());

        let diagram = Voronoi::new()
            .compute(coords(&[(1., 1.), (1., 1.), (1., 1.)]))
            .unwrap();
        assert!(diagram.edges.is_empty());

        // Duplicates within tolerance collapse to one site.
        let diagram = Voronoi::new()
            .tolerance(1e-6)
            .compute(coords(&[(0., 0.), (1e-9, 0.), (4., 0.)]))
            .unwrap();
        assert_eq!(diagram.edges.len(), 1);

        assert_eq!(
            Voronoi::new().compute(coords(&[(0., 0.), (f64::NAN, 1.)])),
            Err(VoronoiError::NonFiniteSite { index: 1 })
        );
    }

    #[test]
    fn test_separated_duplicates() {
        init_log();
        // (1e-9, 1e-9) duplicates (0, 0) but (5, 5e-10) sorts between them.
        let sites = [(0., 0.), (5., 5e-10), (1e-9, 1e-9), (3., 10.), (-4., 6.)];
        let voronoi = Voronoi::new().tolerance(1e-6);
        let diagram = voronoi.compute(coords(&sites)).unwrap();
        let distinct = [(0., 0.), (5., 5e-10), (3., 10.), (-4., 6.)];
        assert_eq!(diagram, voronoi.compute(coords(&distinct)).unwrap());
        assert_eq!(diagram.edges.len(), 5);
        assert_eq!(diagram.vertices.len(), 2);
    }

    #[test]
    fn test_clipped_lines() {
        let diagram = compute_voronoi_diagram(coords(&[(0., 0.), (10., 0.), (5., 10.)]), None)
            .unwrap();
        let bounds = Rect::new((-100., -100.), (100., 100.));
        let lines = diagram.clipped_lines(bounds);
        assert_eq!(lines.len(), 3);
        for line in lines.iter() {
            let (a, b) = (line.start, line.end);
            let (inner, outer) = if (a.x - 5.).abs() < 1e-9 && (a.y - 3.75).abs() < 1e-9 {
                (a, b)
            } else {
                (b, a)
            };
            assert_relative_eq!(inner.x, 5.);
            assert_relative_eq!(inner.y, 3.75);
            let on_boundary = [outer.x.abs(), outer.y.abs()]
                .iter()
                .any(|&v| (v - 100.).abs() < 1e-9);
            assert!(on_boundary, "{:?} is not on the boundary", outer);
        }

        let far = Rect::new((200., 200.), (300., 300.));
        assert!(diagram.clipped_lines(far).is_empty());

        // Edges with both ends infinite are clipped as full lines.
        let diagram = compute_voronoi_diagram(coords(&[(0., 0.), (10., 0.)]), None).unwrap();
        let lines = diagram.clipped_lines(Rect::new((0., -5.), (10., 5.)));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], Line::new((5., -5.), (5., 5.)));
    }

    #[test]
    fn test_random_sites() {
        init_log();
        let mut rng = thread_rng();
        let bounds = Rect::new((-1000., -1000.), (1000., 1000.));
        for _ in 0..20 {
            let sites = uniform_sites(&mut rng, bounds, 200);
            let diagram = compute_voronoi_diagram(sites.clone(), None).unwrap();
            assert!(!diagram.edges.is_empty());
            for edge in diagram.edges.iter() {
                assert!(sites.contains(&edge.left));
                assert!(sites.contains(&edge.right));
                for v in finite_ends(edge) {
                    let dl = coord_distance(v, edge.left);
                    let dr = coord_distance(v, edge.right);
                    assert_relative_eq!(dl, dr, max_relative = 1e-6, epsilon = 1e-6);
                }
            }

            // Deterministic for identical input.
            let again = compute_voronoi_diagram(sites, None).unwrap();
            assert_eq!(again, diagram);
        }
    }
}
