use crate::foundation::{
    core::{Point, Vec2},
    math::max_chord_deviation,
};
use crate::path::simplify::{chaikin_smooth, simplify};

/// Smoothed curves longer than this are simplified a second time.
const MAX_CURVE_POINTS: usize = 50;
const RESIMPLIFY_FACTOR: f64 = 1.5;
/// Chaikin doubles the point count each round.
const MAX_SMOOTH_ITERATIONS: u32 = 6;

const SNAP_STEP_DEG: f64 = 45.0;
const SNAP_TOLERANCE_DEG: f64 = 8.0;
const SNAP_MIN_LENGTH: f64 = 5.0;

const MULTI_SEGMENT_MIN_POINTS: usize = 10;
const CORNER_ANGLE_DEG: f64 = 45.0;
const CORNER_LOOKBACK: usize = 3;
const CORNER_MIN_VECTOR: f64 = 5.0;
const CORNER_MIN_SEGMENT: f64 = 20.0;

/// Path classification stored on keyframes and returned from [`derive_path`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PathKind {
    /// No authored movement.
    #[default]
    #[serde(alias = "none")]
    Empty,
    Hold,
    Straight,
    Curve,
}

/// Refinement of a [`PathKind`] describing which constraint produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathSubKind {
    Vertical,
    Horizontal,
    AngleSnapped,
    MultiSegment,
    HorizontalLocked,
    VerticalLocked,
}

/// Caller's hint about the intended path shape.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PathMode {
    #[default]
    Auto,
    /// Always a straight chord from first to last point.
    Direct,
    /// Never classify as straight or apply axis constraints.
    Curved,
}

/// Tolerances for gesture classification, in stage units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathThresholds {
    pub straight_tol: f64,
    pub axis_lock_tol: f64,
    pub simplify_epsilon: f64,
    pub smooth_iterations: u32,
}

impl Default for PathThresholds {
    fn default() -> Self {
        Self {
            straight_tol: 5.0,
            axis_lock_tol: 5.0,
            simplify_epsilon: 3.0,
            smooth_iterations: 2,
        }
    }
}

impl PathThresholds {
    /// Defaults with the straightness tolerance scaled for high-density displays.
    pub fn for_pixel_ratio(ratio: f64) -> Self {
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        let base = Self::default();
        Self {
            straight_tol: base.straight_tol * ratio,
            ..base
        }
    }
}

/// Modifiers and thresholds for one gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathOptions {
    pub shift_held: bool,
    pub mode: PathMode,
    pub thresholds: PathThresholds,
}

/// Cleaned, classified gesture.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPath {
    pub kind: PathKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_kind: Option<PathSubKind>,
    pub points: Vec<Point>,
}

impl DerivedPath {
    fn new(kind: PathKind, points: Vec<Point>) -> Self {
        Self {
            kind,
            sub_kind: None,
            points,
        }
    }

    fn with_sub_kind(mut self, sub_kind: PathSubKind) -> Self {
        self.sub_kind = Some(sub_kind);
        self
    }
}

/// Classify and clean a raw pointer gesture.
///
/// Deterministic: the same points and options always produce the same path. Non-finite
/// samples are dropped before classification.
#[tracing::instrument(skip(raw), fields(points = raw.len()))]
pub fn derive_path(raw: &[Point], options: PathOptions) -> DerivedPath {
    let finite: Vec<Point> = raw.iter().copied().filter(|p| p.is_finite()).collect();
    if finite.len() != raw.len() {
        tracing::warn!(
            dropped = raw.len() - finite.len(),
            "dropping non-finite gesture samples"
        );
    }

    let path = classify(&finite, options);
    tracing::debug!(kind = ?path.kind, sub_kind = ?path.sub_kind, points = path.points.len(), "derived path");
    path
}

fn classify(points: &[Point], options: PathOptions) -> DerivedPath {
    let PathOptions {
        shift_held,
        mode,
        thresholds,
    } = options;

    let (first, last) = match points {
        [] => return DerivedPath::new(PathKind::Empty, Vec::new()),
        [p] => return DerivedPath::new(PathKind::Hold, vec![*p]),
        [first, .., last] => (*first, *last),
    };

    if mode == PathMode::Direct {
        return DerivedPath::new(PathKind::Straight, vec![first, last]);
    }
    if mode == PathMode::Curved {
        return smooth_curve(points, &thresholds);
    }

    if max_chord_deviation(points) <= thresholds.straight_tol {
        return if shift_held {
            constrain_straight(first, last, thresholds.axis_lock_tol)
        } else {
            DerivedPath::new(PathKind::Straight, vec![first, last])
        };
    }

    if shift_held {
        if let Some(path) = multi_segment(points) {
            return path;
        }
        if let Some(path) = axis_locked_curve(points, thresholds.simplify_epsilon) {
            return path;
        }
    }

    smooth_curve(points, &thresholds)
}

fn constrain_straight(first: Point, last: Point, axis_lock_tol: f64) -> DerivedPath {
    let d = last - first;
    if d.x.abs() < axis_lock_tol {
        return DerivedPath::new(PathKind::Straight, vec![first, Point::new(first.x, last.y)])
            .with_sub_kind(PathSubKind::Vertical);
    }
    if d.y.abs() < axis_lock_tol {
        return DerivedPath::new(PathKind::Straight, vec![first, Point::new(last.x, first.y)])
            .with_sub_kind(PathSubKind::Horizontal);
    }
    match snap_to_angle(first, last) {
        Some(end) => DerivedPath::new(PathKind::Straight, vec![first, end])
            .with_sub_kind(PathSubKind::AngleSnapped),
        None => DerivedPath::new(PathKind::Straight, vec![first, last]),
    }
}

/// Snap the chord direction to the nearest 45° multiple when within tolerance, keeping its
/// length.
fn snap_to_angle(start: Point, end: Point) -> Option<Point> {
    let d = end - start;
    let length = d.hypot();
    if length < SNAP_MIN_LENGTH {
        return None;
    }
    let angle = d.y.atan2(d.x).to_degrees();
    let snapped = (angle / SNAP_STEP_DEG).round() * SNAP_STEP_DEG;
    if (angle - snapped).abs() >= SNAP_TOLERANCE_DEG {
        return None;
    }
    Some(start + Vec2::from_angle(snapped.to_radians()) * length)
}

/// Rectilinear polyline through detected corners. Each leg runs along the dominant axis of
/// its corner-to-corner displacement, starting from the previous leg's end.
fn multi_segment(points: &[Point]) -> Option<DerivedPath> {
    if points.len() <= MULTI_SEGMENT_MIN_POINTS {
        return None;
    }
    let corners = detect_corners(points);
    if corners.len() <= 2 {
        return None;
    }

    let mut out = Vec::with_capacity(corners.len());
    let mut cursor = points[0];
    out.push(cursor);
    for &c in &corners[1..] {
        let target = points[c];
        let d = target - cursor;
        cursor = if d.x.abs() > d.y.abs() {
            Point::new(target.x, cursor.y)
        } else {
            Point::new(cursor.x, target.y)
        };
        out.push(cursor);
    }
    Some(DerivedPath::new(PathKind::Straight, out).with_sub_kind(PathSubKind::MultiSegment))
}

/// Indices of sharp direction changes, always including the first and last sample.
pub(crate) fn detect_corners(points: &[Point]) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut corners = vec![0];
    for i in 2..n - 1 {
        let lookback = i.min(CORNER_LOOKBACK);
        let prev = points[i - lookback];
        let curr = points[i];
        let next = points[(i + lookback).min(n - 1)];

        let v1 = curr - prev;
        let v2 = next - curr;
        let (m1, m2) = (v1.hypot(), v2.hypot());
        if m1 < CORNER_MIN_VECTOR || m2 < CORNER_MIN_VECTOR {
            continue;
        }

        let cos = (v1.dot(v2) / (m1 * m2)).clamp(-1.0, 1.0);
        if cos.acos().to_degrees() <= CORNER_ANGLE_DEG {
            continue;
        }

        let last_corner = points[corners[corners.len() - 1]];
        if curr.distance(last_corner) > CORNER_MIN_SEGMENT {
            corners.push(i);
        }
    }
    corners.push(n - 1);
    corners
}

fn axis_locked_curve(points: &[Point], epsilon: f64) -> Option<DerivedPath> {
    let first = points[0];
    let d = points[points.len() - 1] - first;
    let (dx, dy) = (d.x.abs(), d.y.abs());

    let (projected, sub_kind): (Vec<Point>, _) = if dx > dy * 2.0 {
        (
            points.iter().map(|p| Point::new(p.x, first.y)).collect(),
            PathSubKind::HorizontalLocked,
        )
    } else if dy > dx * 2.0 {
        (
            points.iter().map(|p| Point::new(first.x, p.y)).collect(),
            PathSubKind::VerticalLocked,
        )
    } else {
        return None;
    };

    Some(DerivedPath::new(PathKind::Curve, simplify(&projected, epsilon)).with_sub_kind(sub_kind))
}

fn smooth_curve(points: &[Point], thresholds: &PathThresholds) -> DerivedPath {
    let simplified = simplify(points, thresholds.simplify_epsilon);
    let iterations = thresholds.smooth_iterations.min(MAX_SMOOTH_ITERATIONS);
    if iterations != thresholds.smooth_iterations {
        tracing::warn!(
            requested = thresholds.smooth_iterations,
            clamped = iterations,
            "smoothing iterations exceed the limit; clamping"
        );
    }
    let smoothed = chaikin_smooth(&simplified, iterations);
    let points = if smoothed.len() > MAX_CURVE_POINTS {
        simplify(&smoothed, thresholds.simplify_epsilon * RESIMPLIFY_FACTOR)
    } else {
        smoothed
    };
    DerivedPath::new(PathKind::Curve, points)
}

#[cfg(test)]
#[path = "../../tests/unit/path/derive.rs"]
mod tests;
