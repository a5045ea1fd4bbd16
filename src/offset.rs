//! Outward polygon offsetting for cut lines.
//!
//! Per contour:
//! 1. Drop repeated, collinear and zero-width spike vertices
//! 2. Optional RDP simplification of the staircase
//! 3. Scale to fixed-point integers, orient clockwise (y-up sense)
//! 4. Parallel offset via cavalier_contours (round joins as arcs)
//! 5. Flatten arcs into segments, round back to the integer grid

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use geo::{LineString, Simplify};
use kurbo::{Point, Vec2};

use crate::contour::Contour;
use crate::error::TraceError;
use crate::geom::{point_in_polygon, polygon_area, turn};

/// Offset-stage parameters. See `TraceConfig` for field meanings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    pub precision: f64,
    pub arc_tolerance: f64,
    pub simplify_epsilon: f64,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            precision: 100.0,
            arc_tolerance: 0.1,
            simplify_epsilon: 0.5,
        }
    }
}

/// A contour grown outward, stored in fixed-point coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPolygon {
    /// Vertices multiplied by `scale`, closing edge implicit.
    points: Vec<(i64, i64)>,
    scale: f64,
}

impl OffsetPolygon {
    /// Fixed-point vertices.
    pub fn scaled_points(&self) -> &[(i64, i64)] {
        &self.points
    }

    /// Fixed-point units per pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertices in pixel coordinates.
    pub fn to_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|&(x, y)| Point::new(x as f64 / self.scale, y as f64 / self.scale))
            .collect()
    }

    /// Shoelace area in square pixels. Positive = clockwise on screen,
    /// the same orientation as traced contours.
    pub fn signed_area(&self) -> f64 {
        polygon_area(&self.to_points())
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// Grow `contour` outward by `distance` pixels.
///
/// Fails with `OffsetComputationFailure` when no single, non-shrinking
/// polygon comes out; callers fall back to the raw contour.
pub fn offset(
    contour: &Contour,
    distance: f64,
    options: &OffsetOptions,
) -> Result<OffsetPolygon, TraceError> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(failure(format!("offset distance must be positive, got {distance}")));
    }
    if !options.precision.is_finite() || options.precision <= 0.0 {
        return Err(failure(format!("invalid precision {}", options.precision)));
    }

    let source_area = contour.area();
    if source_area <= 0.0 {
        return Err(failure("contour encloses no area"));
    }

    let mut ring = clean_ring(&contour.to_points());
    if options.simplify_epsilon > 0.0 {
        ring = clean_ring(&rdp_ring(&ring, options.simplify_epsilon));
    }
    if ring.len() < 3 {
        return Err(failure("contour collapsed during simplification"));
    }

    // Fixed point, clockwise in y-up terms: a positive offset then
    // moves every edge outward.
    let scale = options.precision;
    let mut scaled: Vec<Point> = ring
        .iter()
        .map(|p| Point::new((p.x * scale).round(), (p.y * scale).round()))
        .collect();
    if polygon_area(&scaled) > 0.0 {
        scaled.reverse();
    }

    let mut polyline = Polyline::new();
    for p in &scaled {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);

    let results = polyline.parallel_offset(distance * scale);
    if results.is_empty() {
        return Err(failure("offset produced no polygon"));
    }

    let tolerance = (options.arc_tolerance * scale).max(1.0);
    let mut loops: Vec<Vec<Point>> = results
        .iter()
        .map(|pline| {
            let vertices: Vec<(Point, f64)> = pline
                .vertex_data
                .iter()
                .map(|v| (Point::new(v.x, v.y), v.bulge))
                .collect();
            flatten(&vertices, tolerance)
        })
        .filter(|pts| pts.len() >= 3)
        .collect();
    loops.sort_by(|a, b| polygon_area(b).abs().total_cmp(&polygon_area(a).abs()));

    let Some((outer, rest)) = loops.split_first() else {
        return Err(failure("offset produced no polygon"));
    };
    // Pockets enclosed by the outer loop do not change the cut silhouette.
    let disjoint = rest
        .iter()
        .filter(|inner| !point_in_polygon(inner[0], outer))
        .count();
    if disjoint > 0 {
        return Err(failure(format!(
            "offset split into {} disjoint regions",
            disjoint + 1
        )));
    }
    if !rest.is_empty() {
        tracing::debug!(pockets = rest.len(), "dropped enclosed offset loops");
    }

    // Back on the integer grid, in the contour's orientation.
    let mut points: Vec<(i64, i64)> = Vec::with_capacity(outer.len());
    for p in outer {
        let q = (p.x.round() as i64, p.y.round() as i64);
        if points.last() != Some(&q) {
            points.push(q);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if polygon_area(outer) < 0.0 {
        points.reverse();
    }

    let polygon = OffsetPolygon { points, scale };
    if polygon.len() < 3 || polygon.area() < source_area {
        return Err(failure(format!(
            "offset area {:.1} is smaller than contour area {:.1}",
            polygon.area(),
            source_area
        )));
    }

    Ok(polygon)
}

fn failure(reason: impl Into<String>) -> TraceError {
    TraceError::OffsetComputationFailure(reason.into())
}

// ── Ring preparation ─────────────────────────────────────

/// Remove repeated points, straight-through vertices and zero-width spikes.
fn clean_ring(points: &[Point]) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        push_vertex(&mut ring, p);
    }

    // Same rules across the seam between last and first.
    loop {
        let n = ring.len();
        if n < 3 {
            break;
        }
        if ring[n - 1] == ring[0] || turn(ring[n - 2], ring[n - 1], ring[0]) == 0.0 {
            ring.pop();
        } else if turn(ring[n - 1], ring[0], ring[1]) == 0.0 {
            ring.remove(0);
        } else {
            break;
        }
    }
    ring
}

fn push_vertex(ring: &mut Vec<Point>, p: Point) {
    if ring.last() == Some(&p) {
        return;
    }
    while ring.len() >= 2 && turn(ring[ring.len() - 2], ring[ring.len() - 1], p) == 0.0 {
        ring.pop();
    }
    // A spike folds back onto its base point.
    if ring.last() != Some(&p) {
        ring.push(p);
    }
}

/// RDP-simplify a closed ring.
fn rdp_ring(ring: &[Point], epsilon: f64) -> Vec<Point> {
    let mut coords: Vec<(f64, f64)> = ring.iter().map(|p| (p.x, p.y)).collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    let mut simplified: Vec<Point> = LineString::from(coords)
        .simplify(&epsilon)
        .into_inner()
        .into_iter()
        .map(|c| Point::new(c.x, c.y))
        .collect();
    simplified.pop();
    simplified
}

// ── Arc flattening ───────────────────────────────────────

/// Flatten a closed bulge polyline into straight segments.
fn flatten(vertices: &[(Point, f64)], tolerance: f64) -> Vec<Point> {
    let n = vertices.len();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let (p0, bulge) = vertices[i];
        let (p1, _) = vertices[(i + 1) % n];
        out.push(p0);
        if bulge.abs() > 1e-9 {
            flatten_arc(p0, p1, bulge, tolerance, &mut out);
        }
    }
    out
}

/// Push the interior points of the arc p0 → p1.
///
/// `bulge` = tan(sweep / 4), positive for counter-clockwise arcs.
fn flatten_arc(p0: Point, p1: Point, bulge: f64, tolerance: f64, out: &mut Vec<Point>) {
    let chord = p1 - p0;
    let c = chord.hypot();
    if c == 0.0 {
        return;
    }
    let sweep = 4.0 * bulge.atan();
    let radius = c * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
    let left = Vec2::new(-chord.y, chord.x) / c;
    let center = p0.midpoint(p1) + left * (c / 2.0 * (1.0 - bulge * bulge) / (2.0 * bulge));
    let start = (p0 - center).atan2();

    let max_step = 2.0 * (1.0 - tolerance / radius).clamp(-1.0, 1.0).acos();
    let segments = (sweep.abs() / max_step.max(1e-3)).ceil().max(1.0) as usize;
    for k in 1..segments {
        let angle = start + sweep * k as f64 / segments as f64;
        out.push(center + Vec2::from_angle(angle) * radius);
    }
}
