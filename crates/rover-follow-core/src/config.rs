use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fusion voter settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FusionParams {
    /// Max x/y disagreement (px) between the two estimators for averaging.
    pub pos_tolerance: i32,
    /// Max radius disagreement relative to the Hough radius.
    pub radius_rel_tolerance: f32,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            pos_tolerance: 20,
            radius_rel_tolerance: 0.30,
        }
    }
}

/// Accumulation law used by the temporal tracker.
///
/// Exponential smoothing is the default: the running-sum mean rejects more
/// noise but adapts slowly once the target actually moves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum SmoothingLaw {
    Exponential { alpha: f32 },
    RunningSum,
}

impl Default for SmoothingLaw {
    fn default() -> Self {
        Self::Exponential { alpha: 0.2 }
    }
}

/// Temporal tracker settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Max drift (px) in any of x, y, r before the detection is treated as
    /// a different target and the track restarts.
    pub continuity_tolerance: f32,
    /// Consecutive no-detection frames tolerated before the track drops.
    pub max_misses: u32,
    #[serde(default)]
    pub smoothing: SmoothingLaw,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            continuity_tolerance: 40.0,
            max_misses: 10,
            smoothing: SmoothingLaw::default(),
        }
    }
}

/// Which way to scan when the target has never been seen.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    #[default]
    Left,
    Right,
}

/// Steering policy settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SteeringParams {
    /// Pixel window around the frame center treated as "aligned".
    pub center_dead_zone: f32,
    /// Apparent radius (px) at which the rover has arrived.
    pub desired_radius: f32,
    /// Colored-pixel area window signalling arrival when no circle is
    /// resolvable (target fills the view).
    #[serde(default)]
    pub arrived_area_low: Option<u32>,
    #[serde(default)]
    pub arrived_area_high: Option<u32>,
    /// Proportional gain on the horizontal centering error.
    pub kp_rotate: f32,
    /// Proportional gain on the radius (distance) error.
    pub kp_forward: f32,
    /// Clamp for the rotation component.
    pub max_speed: f32,
    /// Clamp for the forward component.
    pub max_forward_speed: f32,
    /// Max per-frame change of each wheel speed.
    pub max_slew_delta: f32,
    /// In-place rotation speed while scanning for a lost target.
    pub search_speed: f32,
    #[serde(default)]
    pub default_search_direction: SearchDirection,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            center_dead_zone: 50.0,
            desired_radius: 50.0,
            arrived_area_low: None,
            arrived_area_high: None,
            kp_rotate: 0.5,
            kp_forward: 0.3,
            max_speed: 100.0,
            max_forward_speed: 100.0,
            max_slew_delta: 20.0,
            search_speed: 60.0,
            default_search_direction: SearchDirection::Left,
        }
    }
}

/// Complete configuration for the follow pipeline.
///
/// Validated once at startup; the per-frame path assumes a valid config
/// and never re-checks it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FollowParams {
    pub frame_width: u32,
    #[serde(default)]
    pub fusion: FusionParams,
    #[serde(default)]
    pub tracker: TrackerParams,
    #[serde(default)]
    pub steering: SteeringParams,
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            frame_width: 640,
            fusion: FusionParams::default(),
            tracker: TrackerParams::default(),
            steering: SteeringParams::default(),
        }
    }
}

fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value < 0.0 || !value.is_finite() {
        return Err(ConfigError::NegativeParameter { name, value });
    }
    Ok(())
}

fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ConfigError::NonPositiveParameter { name, value });
    }
    Ok(())
}

impl FollowParams {
    /// Load parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&text)?;
        Ok(params)
    }

    /// Validate every numeric constraint. A zero frame width or zero
    /// desired radius is a configuration error, not a runtime condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_width == 0 {
            return Err(ConfigError::ZeroFrameWidth);
        }
        if self.fusion.pos_tolerance < 0 {
            return Err(ConfigError::NegativeParameter {
                name: "fusion.pos_tolerance",
                value: self.fusion.pos_tolerance as f32,
            });
        }
        require_non_negative(
            "fusion.radius_rel_tolerance",
            self.fusion.radius_rel_tolerance,
        )?;
        require_non_negative(
            "tracker.continuity_tolerance",
            self.tracker.continuity_tolerance,
        )?;
        if let SmoothingLaw::Exponential { alpha } = self.tracker.smoothing {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(ConfigError::AlphaOutOfRange(alpha));
            }
        }

        let s = &self.steering;
        if s.desired_radius <= 0.0 || !s.desired_radius.is_finite() {
            return Err(ConfigError::ZeroDesiredRadius);
        }
        require_non_negative("steering.center_dead_zone", s.center_dead_zone)?;
        require_non_negative("steering.kp_rotate", s.kp_rotate)?;
        require_non_negative("steering.kp_forward", s.kp_forward)?;
        require_positive("steering.max_speed", s.max_speed)?;
        require_positive("steering.max_forward_speed", s.max_forward_speed)?;
        require_positive("steering.max_slew_delta", s.max_slew_delta)?;
        require_positive("steering.search_speed", s.search_speed)?;
        if let (Some(low), Some(high)) = (s.arrived_area_low, s.arrived_area_high) {
            if low > high {
                return Err(ConfigError::InvertedAreaWindow { low, high });
            }
        }
        Ok(())
    }
}
