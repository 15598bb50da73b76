//! Merge line fragments into maximal line strings.
//!
//! Fragments are added to a [`PlanarGraph`]; every maximal chain of
//! edges through degree-2 nodes becomes one output line.
//!
//! ```rust
//! use geo::{line_string, Geometry};
//! use geo_planar::LineMerger;
//!
//! let mut merger = LineMerger::new();
//! merger.add(&Geometry::LineString(line_string![(x: 0., y: 0.), (x: 1., y: 0.)]));
//! merger.add(&Geometry::LineString(line_string![(x: 1., y: 0.), (x: 2., y: 0.)]));
//! assert_eq!(merger.merged_lines().len(), 1);
//! ```
use std::iter::FromIterator;

use geo::{GeoFloat, Geometry, LineString};
use log::debug;

use crate::{components::Components, graph::EdgeRing, PlanarGraph};

#[derive(Debug, Clone)]
pub struct LineMerger<T: GeoFloat> {
    graph: PlanarGraph<T>,
    merged: Option<Vec<LineString<T>>>,
}

impl<T: GeoFloat> Default for LineMerger<T> {
    fn default() -> Self {
        LineMerger {
            graph: PlanarGraph::new(),
            merged: None,
        }
    }
}

impl<T: GeoFloat> LineMerger<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the linear components of `geom`: line strings, lines and
    /// polygon rings. Points are ignored.
    ///
    /// # Panics
    ///
    /// If a line string has non-finite end points.
    pub fn add(&mut self, geom: &Geometry<T>) {
        let comps = Components::new(geom);
        for line in comps.linear() {
            self.add_line_string(line);
        }
    }

    /// # Panics
    ///
    /// If `line` has non-finite end points.
    pub fn add_line_string(&mut self, line: &LineString<T>) {
        if self.graph.add_edge(line.0.iter().copied()).is_some() {
            self.merged = None;
        }
    }

    /// The merged lines.
    ///
    /// Computed on first call and cached until more input is added.
    pub fn merged_lines(&mut self) -> &[LineString<T>] {
        let graph = &self.graph;
        self.merged.get_or_insert_with(|| {
            let lines: Vec<_> = graph
                .build_rings()
                .iter()
                .map(|ring| edge_string(graph, ring))
                .collect();
            debug!(
                "merged {edges} edges into {lines} lines",
                edges = graph.num_edges(),
                lines = lines.len()
            );
            lines
        })
    }

    pub fn into_merged_lines(mut self) -> Vec<LineString<T>> {
        self.merged_lines();
        self.merged.take().unwrap_or_default()
    }
}

/// Line for a ring of directed edges.
///
/// Runs in the majority direction of the constituent edges (relative
/// to their input coordinates); ties run reversed.
fn edge_string<T: GeoFloat>(graph: &PlanarGraph<T>, ring: &EdgeRing) -> LineString<T> {
    let (forward, reverse) = ring.direction_counts(graph);
    let mut coords = ring.coordinates(graph);
    if reverse >= forward {
        coords.reverse();
    }
    LineString(coords)
}

impl<'a, T: GeoFloat> Extend<&'a LineString<T>> for LineMerger<T> {
    fn extend<I: IntoIterator<Item = &'a LineString<T>>>(&mut self, iter: I) {
        iter.into_iter().for_each(|l| self.add_line_string(l));
    }
}

impl<'a, T: GeoFloat> FromIterator<&'a LineString<T>> for LineMerger<T> {
    fn from_iter<I: IntoIterator<Item = &'a LineString<T>>>(iter: I) -> Self {
        let mut merger = LineMerger::new();
        merger.extend(iter);
        merger
    }
}
