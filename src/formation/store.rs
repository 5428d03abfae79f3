use std::cell::RefCell;
use std::collections::HashSet;

use crate::animation::ease::Ease;
use crate::foundation::core::{PerformerId, Point};
use crate::foundation::error::{BlockingError, BlockingResult};
use crate::formation::model::{Formation, Performer, PerformerKeyframe};
use crate::path::derive::{DerivedPath, PathKind};
use crate::timing::group::{
    BeatGroup, check_between, insertion_slot, next_group_start, validate_groups,
};

/// Resolved position of a performer at the start and end of one formation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Endpoints {
    pub start: Point,
    pub end: Point,
}

/// Per-performer prefix of resolved endpoints, indexed by formation.
#[derive(Debug, Default)]
struct EndpointCache {
    chains: Vec<Vec<Endpoints>>,
}

/// Beat groups, their paired formations and the performers they move.
///
/// `groups[i]` and `formations[i]` always describe the same span; every edit keeps the two in
/// lockstep. Each formation starts where the previous one actually ended, so endpoints are
/// resolved as a chain from the performers' initial positions and memoized until the next
/// edit.
#[derive(Debug, Default)]
pub struct FormationStore {
    performers: Vec<Performer>,
    groups: Vec<BeatGroup>,
    formations: Vec<Formation>,
    endpoints: RefCell<EndpointCache>,
}

impl Clone for FormationStore {
    fn clone(&self) -> Self {
        Self {
            performers: self.performers.clone(),
            groups: self.groups.clone(),
            formations: self.formations.clone(),
            endpoints: RefCell::default(),
        }
    }
}

impl FormationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from plain data, validating ids, group order and pairing.
    pub fn from_parts(
        performers: Vec<Performer>,
        groups: Vec<BeatGroup>,
        formations: Vec<Formation>,
    ) -> BlockingResult<Self> {
        let mut seen = HashSet::new();
        for p in &performers {
            if !seen.insert(&p.id) {
                return Err(BlockingError::validation(format!(
                    "duplicate performer id '{}'",
                    p.id
                )));
            }
            check_position(&p.id, p.initial_position)?;
        }

        validate_groups(&groups)?;
        if groups.len() != formations.len() {
            return Err(BlockingError::validation(format!(
                "{} groups but {} formations; each group needs exactly one formation",
                groups.len(),
                formations.len()
            )));
        }

        for (i, f) in formations.iter().enumerate() {
            if let Some(id) = f.keyframes.keys().find(|id| !seen.contains(id)) {
                return Err(BlockingError::validation(format!(
                    "formation {i} references unknown performer '{id}'"
                )));
            }
        }

        Ok(Self {
            performers,
            groups,
            formations,
            endpoints: RefCell::default(),
        })
    }

    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    pub fn groups(&self) -> &[BeatGroup] {
        &self.groups
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn performer(&self, id: &PerformerId) -> Option<&Performer> {
        self.slot_of(id).map(|s| &self.performers[s])
    }

    pub fn formation(&self, idx: usize) -> Option<&Formation> {
        self.formations.get(idx)
    }

    pub(crate) fn slot_of(&self, id: &PerformerId) -> Option<usize> {
        self.performers.iter().position(|p| &p.id == id)
    }

    /// Where `id` stands when formation `idx` begins.
    pub fn actual_start(&self, id: &PerformerId, idx: usize) -> Option<Point> {
        self.endpoints(id, idx).map(|e| e.start)
    }

    /// Where `id` stands when formation `idx` ends.
    pub fn actual_end(&self, id: &PerformerId, idx: usize) -> Option<Point> {
        self.endpoints(id, idx).map(|e| e.end)
    }

    /// Resolved endpoints of `id` in formation `idx`. Indices past the last formation resolve
    /// to a stationary pair at the end of the chain.
    pub fn endpoints(&self, id: &PerformerId, idx: usize) -> Option<Endpoints> {
        self.slot_of(id).map(|slot| self.endpoints_at(slot, idx))
    }

    pub(crate) fn endpoints_at(&self, slot: usize, idx: usize) -> Endpoints {
        let idx = idx.min(self.formations.len());
        let mut cache = self.endpoints.borrow_mut();
        if cache.chains.len() != self.performers.len() {
            cache.chains = vec![Vec::new(); self.performers.len()];
        }

        let performer = &self.performers[slot];
        let chain = &mut cache.chains[slot];
        if chain.len() <= idx {
            tracing::trace!(performer = %performer.id, from = chain.len(), to = idx, "extending endpoint chain");
        }
        while chain.len() <= idx {
            let i = chain.len();
            let start = chain.last().map_or(performer.initial_position, |e| e.end);
            let end = self
                .formations
                .get(i)
                .and_then(|f| f.keyframe(&performer.id))
                .and_then(PerformerKeyframe::displacement)
                .map_or(start, |d| start + d);
            chain.push(Endpoints { start, end });
        }
        chain[idx]
    }

    fn invalidate(&mut self) {
        let cache = self.endpoints.get_mut();
        if !cache.chains.is_empty() {
            tracing::debug!("invalidating endpoint chains");
        }
        cache.chains.clear();
    }

    pub fn add_performer(&mut self, performer: Performer) -> BlockingResult<()> {
        if self.slot_of(&performer.id).is_some() {
            return Err(BlockingError::formation(format!(
                "performer '{}' already exists",
                performer.id
            )));
        }
        check_position(&performer.id, performer.initial_position)?;
        self.performers.push(performer);
        self.invalidate();
        Ok(())
    }

    /// Remove a performer and every keyframe that references them.
    pub fn remove_performer(&mut self, id: &PerformerId) -> BlockingResult<Performer> {
        let slot = self.require_slot(id)?;
        for f in &mut self.formations {
            f.keyframes.remove(id);
        }
        let removed = self.performers.remove(slot);
        self.invalidate();
        Ok(removed)
    }

    pub fn set_initial_position(&mut self, id: &PerformerId, position: Point) -> BlockingResult<()> {
        let slot = self.require_slot(id)?;
        check_position(id, position)?;
        self.performers[slot].initial_position = position;
        self.invalidate();
        Ok(())
    }

    /// Insert `group` in start-beat order with an empty formation. Returns its index.
    pub fn insert_group(&mut self, group: BeatGroup) -> BlockingResult<usize> {
        let slot = insertion_slot(&self.groups, &group)?;
        warn_if_clamped(&group);
        self.groups.insert(slot, group);
        self.formations.insert(slot, Formation::default());
        self.invalidate();
        Ok(slot)
    }

    /// Append a group of `length` beats directly after the last one (or at `first_beat`).
    pub fn append_group(&mut self, length: u32, first_beat: u32) -> BlockingResult<usize> {
        let start = next_group_start(&self.groups, first_beat);
        self.insert_group(BeatGroup::new(start, length))
    }

    /// Replace group `idx` in place; it must still fit between its neighbours.
    pub fn update_group(&mut self, idx: usize, group: BeatGroup) -> BlockingResult<()> {
        self.require_formation(idx)?;
        let prev = idx.checked_sub(1).and_then(|p| self.groups.get(p));
        check_between(prev, self.groups.get(idx + 1), &group)?;
        warn_if_clamped(&group);
        self.groups[idx] = group;
        self.invalidate();
        Ok(())
    }

    /// Remove group `idx` together with its formation.
    pub fn remove_group(&mut self, idx: usize) -> BlockingResult<(BeatGroup, Formation)> {
        self.require_formation(idx)?;
        let group = self.groups.remove(idx);
        let formation = self.formations.remove(idx);
        self.invalidate();
        Ok((group, formation))
    }

    pub fn set_path(
        &mut self,
        idx: usize,
        id: &PerformerId,
        points: Vec<Point>,
        kind: PathKind,
    ) -> BlockingResult<()> {
        let keyframe = self.keyframe_mut(idx, id)?;
        keyframe.raw_path = points;
        keyframe.path_kind = kind;
        self.invalidate();
        Ok(())
    }

    pub fn set_derived_path(
        &mut self,
        idx: usize,
        id: &PerformerId,
        path: DerivedPath,
    ) -> BlockingResult<()> {
        self.set_path(idx, id, path.points, path.kind)
    }

    /// Drop the authored path; the performer then holds position for this formation.
    pub fn clear_path(&mut self, idx: usize, id: &PerformerId) -> BlockingResult<()> {
        self.set_path(idx, id, Vec::new(), PathKind::Empty)
    }

    pub fn set_transition(
        &mut self,
        idx: usize,
        id: &PerformerId,
        ease: Option<Ease>,
    ) -> BlockingResult<()> {
        self.keyframe_mut(idx, id)?.transition = ease;
        Ok(())
    }

    pub fn set_formation_ease(&mut self, idx: usize, ease: Option<Ease>) -> BlockingResult<()> {
        self.require_formation(idx)?;
        self.formations[idx].default_ease = ease;
        Ok(())
    }

    pub fn rename_formation(&mut self, idx: usize, name: Option<String>) -> BlockingResult<()> {
        self.require_formation(idx)?;
        self.formations[idx].name = name;
        Ok(())
    }

    fn keyframe_mut(
        &mut self,
        idx: usize,
        id: &PerformerId,
    ) -> BlockingResult<&mut PerformerKeyframe> {
        self.require_slot(id)?;
        self.require_formation(idx)?;
        Ok(self.formations[idx].keyframes.entry(id.clone()).or_default())
    }

    fn require_slot(&self, id: &PerformerId) -> BlockingResult<usize> {
        self.slot_of(id)
            .ok_or_else(|| BlockingError::formation(format!("unknown performer '{id}'")))
    }

    fn require_formation(&self, idx: usize) -> BlockingResult<()> {
        if idx < self.formations.len() {
            Ok(())
        } else {
            Err(BlockingError::formation(format!(
                "formation index {idx} out of range ({} formations)",
                self.formations.len()
            )))
        }
    }
}

fn check_position(id: &PerformerId, p: Point) -> BlockingResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(BlockingError::validation(format!(
            "performer '{id}' has a non-finite position"
        )))
    }
}

fn warn_if_clamped(group: &BeatGroup) {
    if group.transition_is_clamped() {
        let w = group.transition_window();
        tracing::warn!(
            start_beat = group.start_beat,
            clamped_start = w.start_beat,
            clamped_len = w.len_beats(),
            "transition window exceeds its group; clamping"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formation/store.rs"]
mod tests;
