//! Boundary tracing on the pixel grid.
//!
//! The tracer walks foreground cells with 4-connectivity, keeping the
//! background on its left: at every cell it tries turning left, going
//! straight, turning right, and finally turning back. Starting from the
//! first foreground cell in row-major order with a northward heading, this
//! follows the outer boundary clockwise on screen.
//!
//! ## Termination
//!
//! The walk is a deterministic function of the state (cell, heading) and
//! is injective on every state reached after the first move, so the state
//! after the first move is guaranteed to recur. The walk stops there. A
//! step cap of `4·W·H + 4` (the number of distinct states) backs this up.
//!
//! Only the region containing the start cell is traced. Holes and other
//! islands are not visited.

use kurbo::Point;

use crate::error::TraceError;
use crate::geom::polygon_area;
use crate::mask::AlphaMask;

/// A closed boundary loop in cell coordinates (y down).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contour {
    points: Vec<(i32, i32)>,
}

impl Contour {
    /// Build a contour from cell coordinates, checking the loop invariants:
    /// at least 3 distinct cells, and every consecutive pair (including
    /// last → first) one cardinal step apart.
    pub fn new(points: Vec<(i32, i32)>) -> Option<Contour> {
        if distinct_count(&points) < 3 {
            return None;
        }
        let n = points.len();
        let closed = (0..n).all(|i| is_unit_step(points[i], points[(i + 1) % n]));
        closed.then_some(Contour { points })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of unit steps around the loop.
    pub fn perimeter(&self) -> usize {
        self.points.len()
    }

    /// Shoelace area through cell centers. Positive for the tracer's
    /// clockwise-on-screen output.
    pub fn signed_area(&self) -> f64 {
        polygon_area(&self.to_points())
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Inclusive cell bounds: (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for &(x, y) in &self.points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        (min_x, min_y, max_x, max_y)
    }

    pub fn to_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|&(x, y)| Point::new(x as f64, y as f64))
            .collect()
    }
}

/// Walking direction on the y-down grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    fn left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    fn right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    fn back(self) -> Heading {
        self.left().left()
    }
}

type State = ((i32, i32), Heading);

/// Trace the boundary of the first foreground region of `mask`.
///
/// Fails with `NoForegroundPixels` when the mask is empty or the region is
/// too small to form a loop of 3 distinct cells.
pub fn trace(mask: &AlphaMask) -> Result<Contour, TraceError> {
    let start = mask
        .first_foreground()
        .ok_or(TraceError::NoForegroundPixels)?;

    // An isolated cell has nowhere to go.
    let first = advance(mask, (start, Heading::North)).ok_or(TraceError::NoForegroundPixels)?;

    let max_steps = 4 * mask.width() as usize * mask.height() as usize + 4;
    let mut points = vec![start, first.0];
    let mut state = first;
    let mut steps = 1;

    loop {
        // Every state after the first move has a foreground cell behind it,
        // so turning back always succeeds.
        let next = advance(mask, state).ok_or(TraceError::NoForegroundPixels)?;
        if next == first {
            // The current cell is the start cell, pushed on arrival.
            points.pop();
            break;
        }
        steps += 1;
        if steps > max_steps {
            return Err(TraceError::StepLimitExceeded { steps });
        }
        points.push(next.0);
        state = next;
    }

    if distinct_count(&points) < 3 {
        tracing::debug!(points = points.len(), "degenerate boundary walk");
        return Err(TraceError::NoForegroundPixels);
    }

    Ok(Contour { points })
}

/// One step of the walk: left, straight, right, back.
fn advance(mask: &AlphaMask, (cell, heading): State) -> Option<State> {
    [heading.left(), heading, heading.right(), heading.back()]
        .into_iter()
        .find_map(|h| {
            let (dx, dy) = h.delta();
            let next = (cell.0 + dx, cell.1 + dy);
            mask.get(next.0, next.1).then_some((next, h))
        })
}

fn is_unit_step(a: (i32, i32), b: (i32, i32)) -> bool {
    (a.0 - b.0).abs() + (a.1 - b.1).abs() == 1
}

fn distinct_count(points: &[(i32, i32)]) -> usize {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}
