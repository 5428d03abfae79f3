use crate::foundation::core::{Point, Vec2};

/// Distance from `p` to the segment `a -> b`, projecting onto the segment and clamping to its
/// endpoints. A degenerate segment measures distance to `a`.
pub(crate) fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Largest distance of any interior point to the chord `first -> last`.
pub(crate) fn max_chord_deviation(points: &[Point]) -> f64 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    points
        .iter()
        .skip(1)
        .take(points.len().saturating_sub(2))
        .map(|&p| distance_to_segment(p, first, last))
        .fold(0.0, f64::max)
}

pub(crate) fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point reached after travelling `fraction * total_length` along the polyline.
///
/// Fractions above 1 continue past the final point along the direction of the last
/// non-degenerate segment; fractions at or below 0 return the first point.
pub(crate) fn point_at_arc_fraction(points: &[Point], fraction: f64) -> Option<Point> {
    let first = *points.first()?;
    let total = polyline_length(points);
    if points.len() < 2 || total <= f64::EPSILON || fraction <= 0.0 {
        return Some(first);
    }

    let target = total * fraction;
    let mut travelled = 0.0;
    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if seg <= 0.0 {
            continue;
        }
        if travelled + seg >= target {
            return Some(w[0].lerp(w[1], (target - travelled) / seg));
        }
        travelled += seg;
    }

    let last = *points.last()?;
    let overshoot = target - total;
    Some(last + last_direction(points).unwrap_or(Vec2::ZERO) * overshoot)
}

fn last_direction(points: &[Point]) -> Option<Vec2> {
    points
        .windows(2)
        .rev()
        .map(|w| w[1] - w[0])
        .find(|d| d.hypot2() > 0.0)
        .map(|d| d / d.hypot())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
