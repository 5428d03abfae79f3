use crate::foundation::error::{BlockingError, BlockingResult};

/// Seconds offset past the last beat at which the final group's span nominally ends.
pub const GRID_END_SENTINEL_SECS: f64 = 1.0;

/// Ordered beat timestamps in seconds, indexed by beat number.
///
/// Produced by external beat detection and immutable afterwards.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct BeatGrid {
    timestamps: Vec<f64>,
}

impl BeatGrid {
    /// Build a grid, rejecting non-finite or decreasing timestamps.
    pub fn new(timestamps: Vec<f64>) -> BlockingResult<Self> {
        if let Some(i) = timestamps.iter().position(|t| !t.is_finite()) {
            return Err(BlockingError::validation(format!(
                "beat {i} has a non-finite timestamp"
            )));
        }
        if let Some(i) = timestamps.windows(2).position(|w| w[1] < w[0]) {
            return Err(BlockingError::validation(format!(
                "beat timestamps must be non-decreasing (beat {} precedes beat {})",
                i + 1,
                i
            )));
        }
        Ok(Self { timestamps })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Exact timestamp of `beat`, if it lies on the grid.
    pub fn time_of(&self, beat: u64) -> Option<f64> {
        let idx = usize::try_from(beat).ok()?;
        self.timestamps.get(idx).copied()
    }

    /// Timestamp of `beat`, clamped to the last beat when past the end of the grid.
    pub fn clamped_time_of(&self, beat: u64) -> Option<f64> {
        let last = self.timestamps.len().checked_sub(1)?;
        let idx = usize::try_from(beat).map_or(last, |b| b.min(last));
        Some(self.timestamps[idx])
    }

    pub fn start_time(&self) -> Option<f64> {
        self.timestamps.first().copied()
    }

    pub fn end_time(&self) -> Option<f64> {
        self.timestamps.last().copied()
    }

    /// Nominal end of the final group: one second past the last beat.
    pub fn sentinel_end(&self) -> Option<f64> {
        self.end_time().map(|t| t + GRID_END_SENTINEL_SECS)
    }

    /// Last beat at or before `time`.
    pub fn beat_at(&self, time: f64) -> Option<u64> {
        if time.is_nan() {
            return None;
        }
        let after = self.timestamps.partition_point(|&t| t <= time);
        after.checked_sub(1).map(|b| b as u64)
    }

    /// Beat whose timestamp is closest to `time`; ties resolve to the earlier beat.
    pub fn nearest_beat(&self, time: f64) -> Option<u64> {
        if time.is_nan() || self.timestamps.is_empty() {
            return None;
        }
        let after = self.timestamps.partition_point(|&t| t < time);
        let best = match (after.checked_sub(1), self.timestamps.get(after)) {
            (None, _) => 0,
            (Some(prev), None) => prev,
            (Some(prev), Some(&next)) => {
                if time - self.timestamps[prev] <= next - time {
                    prev
                } else {
                    after
                }
            }
        };
        Some(best as u64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/grid.rs"]
mod tests;
