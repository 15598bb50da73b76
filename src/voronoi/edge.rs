use geo::{Coordinate, GeoFloat};

use super::VoronoiError;

/// One end of a [`VoronoiEdge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeEnd<T: GeoFloat> {
    /// Not determined by the sweep; the edge is open at this end.
    Unknown,
    /// The edge extends to infinity at this end.
    Infinite,
    /// A finite Voronoi vertex.
    Vertex(Coordinate<T>),
}

impl<T: GeoFloat> EdgeEnd<T> {
    #[inline]
    pub fn vertex(&self) -> Option<Coordinate<T>> {
        match self {
            EdgeEnd::Vertex(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, EdgeEnd::Vertex(_))
    }
}

/// An edge of a Voronoi diagram: part of the bisector of two sites.
///
/// `left` lies to the left and `right` to the right when walking from
/// `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiEdge<T: GeoFloat> {
    pub left: Coordinate<T>,
    pub right: Coordinate<T>,
    pub start: EdgeEnd<T>,
    pub end: EdgeEnd<T>,
}

impl<T: GeoFloat> VoronoiEdge<T> {
    pub(crate) fn new(left: Coordinate<T>, right: Coordinate<T>) -> Self {
        VoronoiEdge {
            left,
            right,
            start: EdgeEnd::Unknown,
            end: EdgeEnd::Unknown,
        }
    }

    /// Direction of travel from `start` to `end`: the vector from
    /// `left` to `right` rotated counter-clockwise by 90°. Not
    /// normalized.
    pub fn direction(&self) -> Coordinate<T> {
        let d = self.right - self.left;
        Coordinate { x: -d.y, y: d.x }
    }

    /// Midpoint of the two sites; always on the supporting line.
    pub fn midpoint(&self) -> Coordinate<T> {
        let two = T::one() + T::one();
        Coordinate {
            x: (self.left.x + self.right.x) / two,
            y: (self.left.y + self.right.y) / two,
        }
    }

    /// Set the first unknown end (start, else end) to `vertex`.
    pub fn add_vertex(&mut self, vertex: Coordinate<T>) -> Result<(), VoronoiError> {
        if let EdgeEnd::Unknown = self.start {
            self.start = EdgeEnd::Vertex(vertex);
        } else if let EdgeEnd::Unknown = self.end {
            self.end = EdgeEnd::Vertex(vertex);
        } else {
            return Err(VoronoiError::EdgeComplete);
        }
        Ok(())
    }

    pub(crate) fn set_start(&mut self, vertex: Coordinate<T>) -> Result<(), VoronoiError> {
        Self::set_end_slot(&mut self.start, vertex)
    }

    pub(crate) fn set_end(&mut self, vertex: Coordinate<T>) -> Result<(), VoronoiError> {
        Self::set_end_slot(&mut self.end, vertex)
    }

    fn set_end_slot(slot: &mut EdgeEnd<T>, vertex: Coordinate<T>) -> Result<(), VoronoiError> {
        match slot {
            EdgeEnd::Vertex(_) => Err(VoronoiError::EdgeComplete),
            _ => {
                *slot = EdgeEnd::Vertex(vertex);
                Ok(())
            }
        }
    }

    /// Both ends are finite vertices.
    pub fn is_bounded(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}
