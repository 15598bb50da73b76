use geo::{Coordinate, GeoFloat, Geometry, LineString, Polygon};

/// Index of a component within a [`Components`].
///
/// `Linear` indexes the sequence yielded by [`Components::linear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Point(usize),
    Linear(usize),
    Polygon(usize),
}

/// The point, linear and polygonal components of a geometry.
///
/// Collections are flattened recursively. A `Line` is treated as a
/// two-point `LineString`, `Rect` and `Triangle` as polygons. Line
/// strings and polygon shells with a single coordinate are points. Linear
/// components of polygons are collected separately (see
/// [`Components::linear`]) so callers can pick the decomposition they
/// need.
#[derive(Debug, Clone)]
pub struct Components<T: GeoFloat> {
    pub points: Vec<Coordinate<T>>,
    pub lines: Vec<LineString<T>>,
    pub polygons: Vec<Polygon<T>>,
}

impl<T: GeoFloat> Default for Components<T> {
    fn default() -> Self {
        Components {
            points: Vec::new(),
            lines: Vec::new(),
            polygons: Vec::new(),
        }
    }
}

impl<T: GeoFloat> Components<T> {
    pub fn new(geom: &Geometry<T>) -> Self {
        let mut comps = Components::default();
        comps.add(geom);
        comps
    }

    pub fn add(&mut self, geom: &Geometry<T>) {
        match geom {
            Geometry::Point(p) => self.points.push(p.0),
            Geometry::MultiPoint(mp) => self.points.extend(mp.0.iter().map(|p| p.0)),
            Geometry::Line(l) => self.lines.push(LineString(vec![l.start, l.end])),
            Geometry::LineString(ls) => self.add_line_string(ls),
            Geometry::MultiLineString(mls) => mls.0.iter().for_each(|ls| self.add_line_string(ls)),
            Geometry::Polygon(p) => self.add_polygon(p),
            Geometry::MultiPolygon(mp) => mp.0.iter().for_each(|p| self.add_polygon(p)),
            Geometry::Rect(r) => self.polygons.push(r.to_polygon()),
            Geometry::Triangle(t) => self.polygons.push(t.to_polygon()),
            Geometry::GeometryCollection(gc) => gc.0.iter().for_each(|g| self.add(g)),
        }
    }

    /// A single-coordinate line string is a point.
    fn add_line_string(&mut self, ls: &LineString<T>) {
        match ls.0[..] {
            [c] => self.points.push(c),
            _ => self.lines.push(ls.clone()),
        }
    }

    /// A polygon whose shell is a single coordinate is a point.
    fn add_polygon(&mut self, p: &Polygon<T>) {
        match p.exterior().0[..] {
            [c] => self.points.push(c),
            _ => self.polygons.push(p.clone()),
        }
    }

    /// All linear components: line strings, then every polygon ring
    /// (shell before holes).
    pub fn linear(&self) -> impl Iterator<Item = &LineString<T>> {
        self.lines.iter().chain(
            self.polygons
                .iter()
                .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors().iter())),
        )
    }

    /// One representative coordinate per non-empty component (its
    /// first coordinate). Polygons are represented by their shell.
    pub fn locations(&self) -> impl Iterator<Item = (ComponentId, Coordinate<T>)> + '_ {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, &c)| (ComponentId::Point(i), c));
        let lines = self
            .lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| Some((ComponentId::Linear(i), *l.0.first()?)));
        let polygons = self
            .polygons
            .iter()
            .enumerate()
            .filter_map(|(i, p)| Some((ComponentId::Polygon(i), *p.exterior().0.first()?)));
        points.chain(lines).chain(polygons)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.lines.iter().all(|l| l.0.is_empty())
            && self.polygons.iter().all(|p| p.exterior().0.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, GeometryCollection, Line, MultiPoint, Rect};

    #[test]
    fn test_flatten_collection() {
        let geom = Geometry::GeometryCollection(GeometryCollection::<f64>(vec![
            point!(x: 1., y: 1.).into(),
            MultiPoint(vec![point!(x: 2., y: 2.), point!(x: 3., y: 3.)]).into(),
            line_string![(x: 0., y: 0.), (x: 5., y: 0.)].into(),
            Line::from([(0., 1.), (1., 1.)]).into(),
            Geometry::GeometryCollection(GeometryCollection(vec![
                Rect::new((0., 0.), (1., 1.)).into(),
            ])),
            polygon!(
                exterior: [(x: 0., y: 0.), (x: 4., y: 0.), (x: 4., y: 4.)],
                interiors: [[(x: 1., y: 0.5), (x: 2., y: 0.5), (x: 2., y: 1.)]]
            )
            .into(),
        ]));

        let comps = Components::new(&geom);
        assert_eq!(comps.points.len(), 3);
        assert_eq!(comps.lines.len(), 2);
        assert_eq!(comps.lines[1].0.len(), 2);
        assert_eq!(comps.polygons.len(), 2);
        // 2 lines, rect shell, triangle shell and its hole.
        assert_eq!(comps.linear().count(), 5);
        assert_eq!(comps.locations().count(), 7);
        assert_eq!(
            comps.locations().nth(3),
            Some((ComponentId::Linear(0), Coordinate { x: 0., y: 0. }))
        );
        assert_eq!(
            comps.locations().last().map(|(id, _)| id),
            Some(ComponentId::Polygon(1))
        );
        assert!(!comps.is_empty());
    }

    #[test]
    fn test_empty() {
        let geom = Geometry::GeometryCollection(GeometryCollection::<f64>(vec![]));
        assert!(Components::new(&geom).is_empty());
        let geom: Geometry<f64> = LineString::<f64>(vec![]).into();
        assert!(Components::new(&geom).is_empty());
    }

    #[test]
    fn test_single_coordinate() {
        let geom: Geometry<f64> = LineString::from(vec![(2., 3.)]).into();
        let comps = Components::new(&geom);
        assert_eq!(comps.points, vec![Coordinate { x: 2., y: 3. }]);
        assert!(comps.lines.is_empty());

        let shell = Polygon::new(LineString::from(vec![(1., 1.)]), vec![]);
        let geom = Geometry::GeometryCollection(GeometryCollection(vec![
            shell.into(),
            line_string![(x: 0., y: 0.), (x: 1., y: 0.)].into(),
        ]));
        let comps = Components::new(&geom);
        assert_eq!(comps.points, vec![Coordinate { x: 1., y: 1. }]);
        assert!(comps.polygons.is_empty());
        assert_eq!(comps.lines.len(), 1);
    }
}
