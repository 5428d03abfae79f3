use crate::foundation::{core::Point, math::distance_to_segment};

/// Ramer–Douglas–Peucker simplification.
///
/// Keeps the first and last points and every point that deviates from its enclosing chord by
/// more than `epsilon`. Negative or NaN tolerances are treated as zero.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let epsilon = if epsilon.is_nan() { 0.0 } else { epsilon.max(0.0) };
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    simplify_span(points, epsilon, &mut out);
    out
}

// Appends the kept points of `points`, excluding its first point.
fn simplify_span(points: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    let last = points.len() - 1;
    let (index, max_dist) = farthest_interior(points);
    if index >= 1 && max_dist > epsilon {
        simplify_span(&points[..=index], epsilon, out);
        simplify_span(&points[index..], epsilon, out);
    } else {
        out.push(points[last]);
    }
}

fn farthest_interior(points: &[Point]) -> (usize, f64) {
    let first = points[0];
    let last = points[points.len() - 1];
    let mut best = (0, 0.0);
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = distance_to_segment(p, first, last);
        if d > best.1 {
            best = (i, d);
        }
    }
    best
}

/// Chaikin corner cutting, `iterations` rounds.
///
/// Each round replaces every edge with its quarter and three-quarter points; the original
/// endpoints stay fixed. Polylines with fewer than three points are returned unchanged.
pub fn chaikin_smooth(points: &[Point], iterations: u32) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut current = points.to_vec();
    for _ in 0..iterations {
        let mut next = Vec::with_capacity(current.len() * 2);
        next.push(current[0]);
        for w in current.windows(2) {
            next.push(w[0].lerp(w[1], 0.25));
            next.push(w[0].lerp(w[1], 0.75));
        }
        next.push(current[current.len() - 1]);
        current = next;
    }
    current
}

#[cfg(test)]
#[path = "../../tests/unit/path/simplify.rs"]
mod tests;
