use crate::animation::ease::Ease;
use crate::engine::settings::EngineSettings;
use crate::formation::store::FormationStore;
use crate::foundation::core::{PerformerId, Point};
use crate::foundation::math::point_at_arc_fraction;
use crate::timing::{
    grid::BeatGrid,
    timeline::{GroupTimeline, TimelineState},
};

/// Position of one performer at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PerformerPosition {
    pub id: PerformerId,
    pub position: Point,
}

/// Per-frame position queries over a beat grid and a formation store.
///
/// Stateless apart from the store's endpoint cache: every call recomputes from the time it
/// is given, so a host loop can call it once per animation frame.
#[derive(Clone, Copy, Debug)]
pub struct PositionEngine<'a> {
    grid: &'a BeatGrid,
    store: &'a FormationStore,
    settings: EngineSettings,
}

impl<'a> PositionEngine<'a> {
    pub fn new(grid: &'a BeatGrid, store: &'a FormationStore) -> Self {
        Self::with_settings(grid, store, EngineSettings::default())
    }

    pub fn with_settings(
        grid: &'a BeatGrid,
        store: &'a FormationStore,
        settings: EngineSettings,
    ) -> Self {
        Self {
            grid,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn timeline(&self) -> GroupTimeline<'a> {
        GroupTimeline::new(self.grid, self.store.groups())
            .with_epsilon(self.settings.transition_epsilon)
    }

    pub fn resolve_timeline(&self, time: f64) -> TimelineState {
        self.timeline().resolve(time)
    }

    /// Easing applied to `id` during formation `idx`.
    pub fn ease_for(&self, idx: usize, id: &PerformerId) -> Ease {
        self.store
            .formation(idx)
            .map_or(self.settings.default_ease, |f| {
                f.ease_for(id, self.settings.default_ease)
            })
    }

    /// Stage position of `id` at `time`, or `None` for an unknown performer.
    pub fn resolve_position(&self, id: &PerformerId, time: f64) -> Option<Point> {
        let slot = self.store.slot_of(id)?;
        let state = self.resolve_timeline(time);
        tracing::trace!(performer = %id, time, group = ?state.active_group_index, "resolve position");
        Some(self.position_in(&state, slot))
    }

    /// Positions of every performer, in store order, from a single timeline evaluation.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn resolve_all(&self, time: f64) -> Vec<PerformerPosition> {
        let state = self.resolve_timeline(time);
        self.store
            .performers()
            .iter()
            .enumerate()
            .map(|(slot, p)| PerformerPosition {
                id: p.id.clone(),
                position: self.position_in(&state, slot),
            })
            .collect()
    }

    fn position_in(&self, state: &TimelineState, slot: usize) -> Point {
        let performer = &self.store.performers()[slot];
        let Some(idx) = state.active_group_index else {
            return performer.initial_position;
        };

        let endpoints = self.store.endpoints_at(slot, idx);
        let Some(keyframe) = self
            .store
            .formation(idx)
            .and_then(|f| f.keyframe(&performer.id))
            .filter(|k| k.has_path())
        else {
            return endpoints.start;
        };

        // Outside the window the performer rests exactly on a chain endpoint.
        if !state.in_transition {
            return if state.progress <= 0.0 {
                endpoints.start
            } else {
                endpoints.end
            };
        }

        let delta = endpoints.start - keyframe.raw_path[0];
        let fraction = self.ease_for(idx, &performer.id).apply(state.progress);

        match point_at_arc_fraction(&keyframe.raw_path, fraction) {
            Some(p) if (p + delta).is_finite() => p + delta,
            _ => {
                tracing::warn!(performer = %performer.id, formation = idx, "path sample degraded to formation start");
                endpoints.start
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/position.rs"]
mod tests;
