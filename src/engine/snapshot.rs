use crate::engine::{position::PositionEngine, settings::EngineSettings};
use crate::formation::model::{Formation, Performer};
use crate::formation::store::FormationStore;
use crate::foundation::error::{BlockingError, BlockingResult};
use crate::timing::{grid::BeatGrid, group::BeatGroup};

/// Serializable state of a whole project: beat timestamps, groups, formations and performers.
///
/// `groups[i]` pairs with `formations[i]`. A snapshot with groups but no formations at all is
/// accepted and gets one empty formation per group; any other length mismatch is rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoreographySnapshot {
    pub beats: Vec<f64>,
    pub groups: Vec<BeatGroup>,
    pub formations: Vec<Formation>,
    pub performers: Vec<Performer>,
    pub settings: EngineSettings,
}

impl ChoreographySnapshot {
    pub fn from_json_str(s: &str) -> BlockingResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> BlockingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[tracing::instrument(
        skip(self),
        fields(
            beats = self.beats.len(),
            groups = self.groups.len(),
            performers = self.performers.len()
        )
    )]
    pub fn into_choreography(self) -> BlockingResult<Choreography> {
        let Self {
            beats,
            groups,
            mut formations,
            performers,
            settings,
        } = self;

        if !settings.transition_epsilon.is_finite() || settings.transition_epsilon < 0.0 {
            return Err(BlockingError::validation(format!(
                "transitionEpsilon must be a finite non-negative number, got {}",
                settings.transition_epsilon
            )));
        }

        if formations.is_empty() && !groups.is_empty() {
            tracing::debug!("snapshot has no formations, creating empty ones");
            formations = vec![Formation::default(); groups.len()];
        }

        let grid = BeatGrid::new(beats)?;
        let store = FormationStore::from_parts(performers, groups, formations)?;
        Ok(Choreography::new(grid, store, settings))
    }
}

/// A loaded project: owns the beat grid, the formation store and engine settings.
#[derive(Clone, Debug, Default)]
pub struct Choreography {
    grid: BeatGrid,
    store: FormationStore,
    settings: EngineSettings,
}

impl Choreography {
    pub fn new(grid: BeatGrid, store: FormationStore, settings: EngineSettings) -> Self {
        Self {
            grid,
            store,
            settings,
        }
    }

    pub fn from_snapshot(snapshot: ChoreographySnapshot) -> BlockingResult<Self> {
        snapshot.into_choreography()
    }

    pub fn from_json_str(s: &str) -> BlockingResult<Self> {
        ChoreographySnapshot::from_json_str(s)?.into_choreography()
    }

    pub fn grid(&self) -> &BeatGrid {
        &self.grid
    }

    /// Replace the beat grid, e.g. after re-running beat detection.
    pub fn set_grid(&mut self, grid: BeatGrid) {
        self.grid = grid;
    }

    pub fn store(&self) -> &FormationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FormationStore {
        &mut self.store
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: EngineSettings) {
        self.settings = settings;
    }

    pub fn engine(&self) -> PositionEngine<'_> {
        PositionEngine::with_settings(&self.grid, &self.store, self.settings)
    }

    pub fn to_snapshot(&self) -> ChoreographySnapshot {
        ChoreographySnapshot {
            beats: self.grid.timestamps().to_vec(),
            groups: self.store.groups().to_vec(),
            formations: self.store.formations().to_vec(),
            performers: self.store.performers().to_vec(),
            settings: self.settings,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/snapshot.rs"]
mod tests;
