use std::{fmt, str::FromStr};

use crate::foundation::error::{BlockingError, BlockingResult};

/// Named timing curves applied to transition progress.
///
/// Input progress is clamped to `[0, 1]`; output is not. [`Ease::Bounce`] intentionally
/// overshoots past 1 before settling.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Ease {
    #[default]
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "easeIn")]
    InQuad,
    #[serde(rename = "easeOut")]
    OutQuad,
    #[serde(rename = "easeInOut")]
    InOutQuad,
    /// Hold until 60% of the window, then move quickly.
    #[serde(rename = "delayed")]
    Delayed,
    /// Arrive at 40% of the window and wait.
    #[serde(rename = "early")]
    Early,
    #[serde(rename = "bounce")]
    Bounce,
}

impl Ease {
    pub const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::Delayed,
        Ease::Early,
        Ease::Bounce,
    ];

    /// Wire name, as used in snapshots and by authoring tools.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InQuad => "easeIn",
            Self::OutQuad => "easeOut",
            Self::InOutQuad => "easeInOut",
            Self::Delayed => "delayed",
            Self::Early => "early",
            Self::Bounce => "bounce",
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() {
            return 0.0;
        }
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::Delayed => {
                if t < 0.6 {
                    0.0
                } else {
                    (t - 0.6) * 2.5
                }
            }
            Self::Early => (t * 2.5).min(1.0),
            Self::Bounce => {
                if t < 0.7 {
                    1.4 * t
                } else if t < 0.85 {
                    0.98 + ((t - 0.7) * 20.0).sin() * 0.05
                } else {
                    1.0
                }
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = BlockingError;

    fn from_str(s: &str) -> BlockingResult<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| BlockingError::validation(format!("unknown transition type '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
