//! Beatblock is a beat-synchronized formation timeline and path-interpolation engine for
//! choreography blocking.
//!
//! A project is a [`BeatGrid`] of detected beat timestamps, an ordered list of [`BeatGroup`]s
//! each paired with a [`Formation`], and the [`Performer`]s those formations move:
//!
//! - Load a [`ChoreographySnapshot`] (or build a [`FormationStore`] by hand)
//! - Turn freehand gestures into clean paths with [`derive_path`]
//! - Ask a [`PositionEngine`] where everyone stands at any playback time
#![forbid(unsafe_code)]

mod animation;
mod engine;
mod formation;
mod foundation;
mod path;
mod timing;

pub use crate::foundation::core::{PerformerId, Point, Vec2};
pub use crate::foundation::error::{BlockingError, BlockingResult};

pub use crate::animation::ease::Ease;
pub use crate::engine::position::{PerformerPosition, PositionEngine};
pub use crate::engine::settings::EngineSettings;
pub use crate::engine::snapshot::{Choreography, ChoreographySnapshot};
pub use crate::formation::model::{DisplayShape, Formation, Performer, PerformerKeyframe};
pub use crate::formation::store::{Endpoints, FormationStore};
pub use crate::path::derive::{
    DerivedPath, PathKind, PathMode, PathOptions, PathSubKind, PathThresholds, derive_path,
};
pub use crate::path::simplify::{chaikin_smooth, simplify};
pub use crate::timing::grid::{BeatGrid, GRID_END_SENTINEL_SECS};
pub use crate::timing::group::{BeatGroup, BeatWindow, next_group_start, validate_groups};
pub use crate::timing::timeline::{
    BeatSlot, DEFAULT_TRANSITION_EPSILON, GroupSpan, GroupTimeline, TimelineState,
};
