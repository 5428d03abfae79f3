use crate::foundation::error::{BlockingError, BlockingResult};

/// A contiguous span of beats sharing one formation.
///
/// `transition_start_beat` and `transition_length` come straight from authoring controls and
/// may be out of range (including negative); they are clamped into the group's own span when
/// resolved, never rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatGroup {
    pub start_beat: u32,
    pub length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_start_beat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Beat-index window `[start_beat, end_beat]` during which performers move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatWindow {
    pub start_beat: u64,
    pub end_beat: u64,
}

impl BeatWindow {
    pub fn len_beats(self) -> u64 {
        self.end_beat - self.start_beat
    }

    pub fn contains(self, beat: u64) -> bool {
        self.start_beat <= beat && beat < self.end_beat
    }
}

impl BeatGroup {
    pub fn new(start_beat: u32, length: u32) -> Self {
        Self {
            start_beat,
            length,
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, start_beat: i64, length: i64) -> Self {
        self.transition_start_beat = Some(start_beat);
        self.transition_length = Some(length);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Group length with the `length >= 1` floor applied.
    pub fn span_len(&self) -> u32 {
        self.length.max(1)
    }

    /// First beat after this group (exclusive end).
    pub fn end_beat(&self) -> u64 {
        u64::from(self.start_beat) + u64::from(self.span_len())
    }

    /// Resolve the transition window, applying defaults and clamping into
    /// `[start_beat, start_beat + length)`.
    ///
    /// Defaults: the window opens on the group's first beat and lasts `length - 1` beats.
    pub fn transition_window(&self) -> BeatWindow {
        let start = i64::from(self.start_beat);
        let len = i64::from(self.span_len());
        let last = start + len - 1;

        let t_start = self.transition_start_beat.unwrap_or(start).clamp(start, last);
        let t_len = self.transition_length.unwrap_or(len - 1).clamp(0, last - t_start);

        BeatWindow {
            start_beat: t_start as u64,
            end_beat: (t_start + t_len) as u64,
        }
    }

    /// True when the stored transition settings would be altered by clamping.
    pub fn transition_is_clamped(&self) -> bool {
        let w = self.transition_window();
        let start_moved = self
            .transition_start_beat
            .is_some_and(|s| s != w.start_beat as i64);
        let len_moved = self
            .transition_length
            .is_some_and(|l| l != w.len_beats() as i64);
        start_moved || len_moved
    }

    fn overlaps_next(&self, next: &BeatGroup) -> bool {
        self.end_beat() > u64::from(next.start_beat)
    }
}

/// Check that groups are ascending by start beat and do not overlap.
pub fn validate_groups(groups: &[BeatGroup]) -> BlockingResult<()> {
    if let Some(i) = groups.iter().position(|g| g.length == 0) {
        return Err(BlockingError::validation(format!(
            "group {i} must span at least one beat"
        )));
    }
    for (i, w) in groups.windows(2).enumerate() {
        if w[1].start_beat < w[0].start_beat {
            return Err(BlockingError::validation(format!(
                "groups must be sorted by start beat (group {} starts before group {i})",
                i + 1
            )));
        }
        if w[0].overlaps_next(&w[1]) {
            return Err(BlockingError::validation(format!(
                "group {i} (beats {}..{}) overlaps group {} starting at beat {}",
                w[0].start_beat,
                w[0].end_beat(),
                i + 1,
                w[1].start_beat
            )));
        }
    }
    Ok(())
}

/// Start beat for a group appended after `groups`: the end of the last group, or `first_beat`
/// when there are none yet.
pub fn next_group_start(groups: &[BeatGroup], first_beat: u32) -> u32 {
    groups.last().map_or(first_beat, |g| {
        u32::try_from(g.end_beat()).unwrap_or(u32::MAX)
    })
}

/// Position at which `group` can be inserted into sorted `groups` without overlap.
pub(crate) fn insertion_slot(groups: &[BeatGroup], group: &BeatGroup) -> BlockingResult<usize> {
    let slot = groups.partition_point(|g| g.start_beat < group.start_beat);
    let prev = slot.checked_sub(1).and_then(|p| groups.get(p));
    check_between(prev, groups.get(slot), group)?;
    Ok(slot)
}

/// Validate `group` against the neighbours it would sit between.
pub(crate) fn check_between(
    prev: Option<&BeatGroup>,
    next: Option<&BeatGroup>,
    group: &BeatGroup,
) -> BlockingResult<()> {
    if group.length == 0 {
        return Err(BlockingError::timeline("group must span at least one beat"));
    }
    if let Some(prev) = prev
        && (prev.start_beat > group.start_beat || prev.overlaps_next(group))
    {
        return Err(BlockingError::timeline(format!(
            "group at beat {} overlaps the group starting at beat {}",
            group.start_beat, prev.start_beat
        )));
    }
    if let Some(next) = next
        && (group.start_beat > next.start_beat || group.overlaps_next(next))
    {
        return Err(BlockingError::timeline(format!(
            "group at beat {} overlaps the group starting at beat {}",
            group.start_beat, next.start_beat
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timing/group.rs"]
mod tests;
