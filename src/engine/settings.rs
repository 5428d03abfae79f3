use crate::animation::ease::Ease;
use crate::timing::timeline::DEFAULT_TRANSITION_EPSILON;

/// Engine-wide defaults, deserialized from the `settings` block of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    /// Easing used when neither the performer nor the formation picks one.
    pub default_ease: Ease,
    /// Transition windows this short (seconds) are treated as instantaneous.
    pub transition_epsilon: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_ease: Ease::Linear,
            transition_epsilon: DEFAULT_TRANSITION_EPSILON,
        }
    }
}
