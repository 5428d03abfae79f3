use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::foundation::core::{PerformerId, Point, Vec2};
use crate::path::derive::{DerivedPath, PathKind};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum DisplayShape {
    #[default]
    Circle,
    Triangle,
    Square,
}

/// A performer and the stage position they hold before the first formation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    pub id: PerformerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub shape: DisplayShape,
    pub initial_position: Point,
}

impl Performer {
    pub fn new(id: impl Into<PerformerId>, initial_position: Point) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            color: String::new(),
            shape: DisplayShape::default(),
            initial_position,
        }
    }
}

/// One performer's authored movement within a formation.
///
/// `raw_path` keeps the coordinates as drawn; only its displacement from its own first point
/// is meaningful, since the formation may start from a different resolved position.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformerKeyframe {
    #[serde(default, alias = "path", skip_serializing_if = "Vec::is_empty")]
    pub raw_path: Vec<Point>,
    #[serde(default)]
    pub path_kind: PathKind,
    /// Per-performer easing override.
    #[serde(
        default,
        rename = "transitionType",
        skip_serializing_if = "Option::is_none"
    )]
    pub transition: Option<Ease>,
}

impl PerformerKeyframe {
    pub fn from_derived(path: DerivedPath) -> Self {
        Self {
            raw_path: path.points,
            path_kind: path.kind,
            transition: None,
        }
    }

    /// A keyframe moves its performer only with a non-empty, fully finite path.
    pub fn has_path(&self) -> bool {
        !self.raw_path.is_empty() && self.raw_path.iter().all(|p| p.is_finite())
    }

    /// Net movement over the formation, `last - first`.
    pub fn displacement(&self) -> Option<Vec2> {
        if !self.has_path() {
            return None;
        }
        let first = self.raw_path.first()?;
        let last = self.raw_path.last()?;
        Some(*last - *first)
    }
}

/// Target layout paired with one beat group.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Formation-wide easing used when a performer has no override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ease: Option<Ease>,
    #[serde(default)]
    pub keyframes: BTreeMap<PerformerId, PerformerKeyframe>,
}

impl Formation {
    pub fn keyframe(&self, id: &PerformerId) -> Option<&PerformerKeyframe> {
        self.keyframes.get(id)
    }

    /// Easing for `id`: performer override, then formation default, then `global`.
    pub fn ease_for(&self, id: &PerformerId, global: Ease) -> Ease {
        self.keyframe(id)
            .and_then(|k| k.transition)
            .or(self.default_ease)
            .unwrap_or(global)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/formation/model.rs"]
mod tests;
