//! Tunable constants for placement, sizing and animation.

use desktop_app_contract::PixelSize;
use serde::{Deserialize, Serialize};

use crate::{error::WindowManagerError, model::AnimationPhase};

/// Minimum window size applied when an app declares none.
pub const DEFAULT_MIN_SIZE: PixelSize = PixelSize::new(200, 140);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Diagonal offset between consecutive cascaded windows.
    pub cascade_step: i32,
    /// Number of cascade positions before wrapping back to the origin.
    pub cascade_slots: usize,
    /// Upper bound on the initial window size.
    pub max_initial_size: PixelSize,
    /// Fraction of the work area used for the initial window size.
    pub initial_fraction: f32,
    /// Origin offset of the default (unsnapped) rectangle.
    pub default_offset: i32,
    /// Fraction of the work area used for the default (unsnapped) rectangle.
    pub default_fraction: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cascade_step: 28,
            cascade_slots: 8,
            max_initial_size: PixelSize::new(900, 700),
            initial_fraction: 0.6,
            default_offset: 80,
            default_fraction: 0.6,
        }
    }
}

/// CSS timing curve used to interpolate a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingCurve {
    Linear,
    EaseOut,
    EaseIn,
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl TimingCurve {
    pub fn css(self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::EaseOut => "ease-out".to_string(),
            Self::EaseIn => "ease-in".to_string(),
            Self::EaseInOut => "ease-in-out".to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub duration_ms: u32,
    pub curve: TimingCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub opening: PhaseTiming,
    pub closing: PhaseTiming,
    pub minimizing: PhaseTiming,
    pub restoring: PhaseTiming,
}

impl AnimationConfig {
    /// Timing for `phase`; `None` for [`AnimationPhase::Idle`].
    pub fn timing(&self, phase: AnimationPhase) -> Option<PhaseTiming> {
        match phase {
            AnimationPhase::Idle => None,
            AnimationPhase::Opening => Some(self.opening),
            AnimationPhase::Closing => Some(self.closing),
            AnimationPhase::Minimizing => Some(self.minimizing),
            AnimationPhase::Restoring => Some(self.restoring),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            opening: PhaseTiming {
                duration_ms: 220,
                curve: TimingCurve::CubicBezier(0.2, 0.9, 0.3, 1.0),
            },
            closing: PhaseTiming {
                duration_ms: 180,
                curve: TimingCurve::EaseIn,
            },
            minimizing: PhaseTiming {
                duration_ms: 460,
                curve: TimingCurve::CubicBezier(0.55, 0.0, 0.75, 0.2),
            },
            restoring: PhaseTiming {
                duration_ms: 420,
                curve: TimingCurve::CubicBezier(0.2, 0.8, 0.4, 1.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub placement: PlacementConfig,
    pub default_min_size: PixelSize,
    pub animation: AnimationConfig,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            default_min_size: DEFAULT_MIN_SIZE,
            animation: AnimationConfig::default(),
        }
    }
}

impl WindowManagerConfig {
    /// Parses a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::InvalidConfig`] for malformed JSON or out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, WindowManagerError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| WindowManagerError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), WindowManagerError> {
        let placement = &self.placement;
        if placement.cascade_slots == 0 {
            return Err(WindowManagerError::InvalidConfig(
                "placement.cascade_slots must be at least 1".to_string(),
            ));
        }
        for (name, fraction) in [
            ("placement.initial_fraction", placement.initial_fraction),
            ("placement.default_fraction", placement.default_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(WindowManagerError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {fraction}"
                )));
            }
        }
        if self.default_min_size.w < 0 || self.default_min_size.h < 0 {
            return Err(WindowManagerError::InvalidConfig(
                "default_min_size must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
