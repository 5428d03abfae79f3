use crate::timing::{grid::BeatGrid, group::BeatGroup};

/// Windows at or below this many seconds are treated as instantaneous.
pub const DEFAULT_TRANSITION_EPSILON: f64 = 1e-6;

/// Timeline state for one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    /// Index of the active group, `None` before the first group (or with an empty grid).
    pub active_group_index: Option<usize>,
    pub in_transition: bool,
    /// Linear progress through the transition window in `[0, 1]`.
    pub progress: f64,
    pub effective_transition_start: f64,
    pub effective_transition_end: f64,
}

impl TimelineState {
    pub fn inactive() -> Self {
        Self {
            active_group_index: None,
            in_transition: false,
            progress: 0.0,
            effective_transition_start: 0.0,
            effective_transition_end: 0.0,
        }
    }
}

/// Time-mapped span `[start, end)` of one group.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GroupSpan {
    pub start: f64,
    pub end: f64,
}

/// Per-beat classification for beat markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatSlot {
    pub group_index: usize,
    pub in_transition: bool,
}

/// Resolves which beat group is active at a given time and how far its transition has run.
///
/// Groups must be sorted by `start_beat` (see [`crate::validate_groups`]). Group start beats
/// past the end of the grid map to the last timestamp.
#[derive(Clone, Copy, Debug)]
pub struct GroupTimeline<'a> {
    grid: &'a BeatGrid,
    groups: &'a [BeatGroup],
    epsilon: f64,
}

impl<'a> GroupTimeline<'a> {
    pub fn new(grid: &'a BeatGrid, groups: &'a [BeatGroup]) -> Self {
        Self {
            grid,
            groups,
            epsilon: DEFAULT_TRANSITION_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    pub fn groups(&self) -> &'a [BeatGroup] {
        self.groups
    }

    fn start_time(&self, group: &BeatGroup) -> Option<f64> {
        self.grid.clamped_time_of(u64::from(group.start_beat))
    }

    /// Time-mapped span of group `idx`. The last group ends at the grid sentinel.
    pub fn group_span(&self, idx: usize) -> Option<GroupSpan> {
        let start = self.start_time(self.groups.get(idx)?)?;
        let end = match self.groups.get(idx + 1) {
            Some(next) => self.start_time(next)?,
            None => self.grid.sentinel_end()?,
        };
        Some(GroupSpan {
            start,
            end: end.max(start),
        })
    }

    /// Seek target for the formation paired with group `idx`.
    pub fn formation_start_time(&self, idx: usize) -> Option<f64> {
        self.group_span(idx).map(|s| s.start)
    }

    /// Group whose span contains `time`. The last group stays active past its nominal end.
    pub fn active_group(&self, time: f64) -> Option<usize> {
        if self.grid.is_empty() || time.is_nan() {
            return None;
        }
        let after = self
            .groups
            .partition_point(|g| self.start_time(g).is_some_and(|s| s <= time));
        after.checked_sub(1)
    }

    /// Effective transition bounds of group `idx` in seconds, intersected with its span.
    pub fn transition_bounds(&self, idx: usize) -> Option<(f64, f64)> {
        let span = self.group_span(idx)?;
        let window = self.groups[idx].transition_window();
        let start = self.grid.clamped_time_of(window.start_beat)?;
        let end = self.grid.clamped_time_of(window.end_beat)?;

        let eff_start = start.clamp(span.start, span.end);
        let eff_end = end.clamp(eff_start, span.end);
        Some((eff_start, eff_end))
    }

    pub fn resolve(&self, time: f64) -> TimelineState {
        let Some(idx) = self.active_group(time) else {
            return TimelineState::inactive();
        };
        let Some((start, end)) = self.transition_bounds(idx) else {
            return TimelineState::inactive();
        };

        let duration = end - start;
        let (in_transition, progress) = if duration > self.epsilon && time >= start && time < end
        {
            (true, ((time - start) / duration).clamp(0.0, 1.0))
        } else if time < start {
            (false, 0.0)
        } else {
            (false, 1.0)
        };

        TimelineState {
            active_group_index: Some(idx),
            in_transition,
            progress,
            effective_transition_start: start,
            effective_transition_end: end,
        }
    }

    /// Classify every beat of the grid by owning group and transition membership.
    pub fn beat_map(&self) -> Vec<Option<BeatSlot>> {
        let mut map = vec![None; self.grid.len()];
        for (group_index, group) in self.groups.iter().enumerate() {
            let window = group.transition_window();
            let start = u64::from(group.start_beat);
            for beat in start..group.end_beat() {
                let Some(slot) = usize::try_from(beat).ok().and_then(|b| map.get_mut(b)) else {
                    break;
                };
                *slot = Some(BeatSlot {
                    group_index,
                    in_transition: window.contains(beat),
                });
            }
        }
        map
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/timeline.rs"]
mod tests;
