//! Polygon → vector path conversion.
//!
//! Cut paths are polygonal: one `MoveTo`, a run of `LineTo`s and a
//! `ClosePath` per subpath. They are kept as a `kurbo::BezPath` so they
//! can be transformed, rasterized and written as SVG path data directly.

use kurbo::{Affine, BezPath, Line, PathEl, PathSeg, Point, Rect, Shape};

use crate::contour::Contour;
use crate::geom::path_area;
use crate::offset::OffsetPolygon;

/// A closed polygon that can be emitted as a cut path.
pub trait Outline {
    /// Vertices in pixel coordinates; the closing edge is implicit.
    fn outline_points(&self) -> Vec<Point>;
}

impl Outline for Contour {
    fn outline_points(&self) -> Vec<Point> {
        self.to_points()
    }
}

impl Outline for OffsetPolygon {
    fn outline_points(&self) -> Vec<Point> {
        self.to_points()
    }
}

impl Outline for [Point] {
    fn outline_points(&self) -> Vec<Point> {
        self.to_vec()
    }
}

/// The final, line-only cut outline in placement coordinates.
#[derive(Debug, Clone, Default)]
pub struct CutPath {
    path: BezPath,
}

impl CutPath {
    /// Wrap an existing path. Curves are flattened to lines.
    pub fn from_bezpath(path: &BezPath, tolerance: f64) -> Self {
        let mut lines = BezPath::new();
        kurbo::flatten(path.elements().iter().copied(), tolerance, |el| lines.push(el));
        CutPath { path: lines }
    }

    pub fn as_bezpath(&self) -> &BezPath {
        &self.path
    }

    pub fn elements(&self) -> &[PathEl] {
        self.path.elements()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    pub fn subpath_count(&self) -> usize {
        self.path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    /// All segments in drawing order, closing edges included.
    pub fn lines(&self) -> Vec<Line> {
        self.path
            .segments()
            .filter_map(|seg| match seg {
                PathSeg::Line(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    pub fn bounding_box(&self) -> Rect {
        self.path.bounding_box()
    }

    /// Signed enclosed area, summed over subpaths.
    pub fn signed_area(&self) -> f64 {
        path_area(&self.path)
    }

    /// Add another closed subpath.
    pub fn append(&mut self, other: &CutPath) {
        for el in other.path.elements() {
            self.path.push(*el);
        }
    }

    /// SVG path data (`M x y L x y ... Z`), embeddable verbatim.
    pub fn to_svg(&self) -> String {
        self.path.to_svg()
    }
}

impl PartialEq for CutPath {
    fn eq(&self, other: &Self) -> bool {
        self.path.elements() == other.path.elements()
    }
}

/// Emit `polygon` as a closed line path, mapped through `transform`.
///
/// An empty polygon gives an empty path.
pub fn emit<O: Outline + ?Sized>(polygon: &O, transform: Affine) -> CutPath {
    let points = polygon.outline_points();
    let mut path = BezPath::new();
    if let Some((&first, rest)) = points.split_first() {
        path.move_to(transform * first);
        for &p in rest {
            path.line_to(transform * p);
        }
        path.close_path();
    }
    CutPath { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use std::f64::consts::FRAC_PI_2;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn emits_move_lines_close() {
        let cut = emit(unit_square().as_slice(), Affine::IDENTITY);
        let els = cut.elements();
        assert_eq!(els.len(), 5);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert!(matches!(els[1], PathEl::LineTo(_)));
        assert_eq!(els[4], PathEl::ClosePath);
        assert_eq!(cut.subpath_count(), 1);
        // Three explicit edges plus the closing edge.
        assert_eq!(cut.lines().len(), 4);
    }

    #[test]
    fn empty_polygon_is_noop() {
        let empty: Vec<Point> = Vec::new();
        let cut = emit(empty.as_slice(), Affine::translate(Vec2::new(5.0, 5.0)));
        assert!(cut.is_empty());
        assert_eq!(cut.subpath_count(), 0);
        assert!(cut.lines().is_empty());
    }

    #[test]
    fn transform_is_applied() {
        let transform = Affine::translate(Vec2::new(10.0, 20.0)) * Affine::scale(2.0);
        let cut = emit(unit_square().as_slice(), transform);
        let bbox = cut.bounding_box();
        assert_eq!(bbox, Rect::new(10.0, 20.0, 12.0, 22.0));
        assert_eq!(cut.signed_area(), 4.0);
    }

    #[test]
    fn rotation_keeps_area() {
        let cut = emit(unit_square().as_slice(), Affine::rotate(FRAC_PI_2));
        assert!((cut.signed_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn contour_emits_cell_centers() {
        let contour = Contour::new(vec![(2, 2), (3, 2), (3, 3), (2, 3)]).unwrap();
        let cut = emit(&contour, Affine::IDENTITY);
        assert_eq!(cut.lines()[0], Line::new((2.0, 2.0), (3.0, 2.0)));
        let svg = cut.to_svg();
        assert!(svg.starts_with('M'), "{}", svg);
        assert!(svg.trim_end().ends_with('Z'), "{}", svg);
        assert_eq!(svg.matches('L').count(), 3);
    }

    #[test]
    fn append_adds_subpaths() {
        let mut cut = emit(unit_square().as_slice(), Affine::IDENTITY);
        let other = emit(unit_square().as_slice(), Affine::translate(Vec2::new(3.0, 0.0)));
        cut.append(&other);
        assert_eq!(cut.subpath_count(), 2);
        assert_eq!(cut.signed_area(), 2.0);
    }
}
