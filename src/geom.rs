//! Shared geometry utilities.

use kurbo::{BezPath, PathEl, Point};

/// Signed area of a closed polygon via the shoelace formula.
///
/// Positive when the vertices run counter-clockwise in y-up coordinates
/// (equivalently clockwise on screen, where y points down).
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x * points[j].y - points[j].x * points[i].y
        })
        .sum::<f64>()
        / 2.0
}

/// Signed area of a line-only BezPath, summed over its subpaths.
pub fn path_area(path: &BezPath) -> f64 {
    let mut area = 0.0;
    let mut first = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                first = p;
                current = p;
            }
            PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) | PathEl::QuadTo(_, p) => {
                area += current.x * p.y - p.x * current.y;
                current = p;
            }
            PathEl::ClosePath => {
                area += current.x * first.y - first.x * current.y;
                current = first;
            }
        }
    }
    area / 2.0
}

/// Ray-casting point-in-polygon test.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Cross product of (b - a) and (c - b).
pub fn turn(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn area_sign_follows_orientation() {
        let mut pts = square(4.0);
        assert_eq!(polygon_area(&pts), 16.0);
        pts.reverse();
        assert_eq!(polygon_area(&pts), -16.0);
    }

    #[test]
    fn path_area_matches_polygon_area() {
        let pts = square(3.0);
        let mut path = BezPath::new();
        path.move_to(pts[0]);
        for &p in &pts[1..] {
            path.line_to(p);
        }
        path.close_path();
        assert_eq!(path_area(&path), polygon_area(&pts));
    }

    #[test]
    fn point_in_square() {
        let pts = square(10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &pts));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &pts));
    }
}
