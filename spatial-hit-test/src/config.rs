//! Tunable hit-test policy, loadable from JSON.

use constants::coordinate_system::WORLD_ORIGIN_HEIGHT;
use constants::hit_test::{
    DRAG_ON_INFINITE_PLANES_ENABLED, FEATURE_CONE_OPENING_ANGLE_DEGREES, FEATURE_MAX_DISTANCE,
    FEATURE_MAX_RESULTS, FEATURE_MIN_DISTANCE, INFINITE_PLANE_MAX_DIRECTION_Y,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::HitTestError;

/// Resolver policy. Missing JSON fields fall back to the defaults in
/// `constants::hit_test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Full opening angle of the high-quality feature cone, in degrees.
    pub cone_opening_angle_degrees: f32,
    pub feature_min_distance: f32,
    pub feature_max_distance: f32,
    pub feature_max_results: usize,
    /// The infinite-plane fallback only runs for rays with
    /// `direction.y <= infinite_plane_max_direction_y`.
    pub infinite_plane_max_direction_y: f32,
    pub drag_on_infinite_planes_enabled: bool,
    /// Infinite-plane height used when a query has no reference height.
    pub default_reference_height: f32,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            cone_opening_angle_degrees: FEATURE_CONE_OPENING_ANGLE_DEGREES,
            feature_min_distance: FEATURE_MIN_DISTANCE,
            feature_max_distance: FEATURE_MAX_DISTANCE,
            feature_max_results: FEATURE_MAX_RESULTS,
            infinite_plane_max_direction_y: INFINITE_PLANE_MAX_DIRECTION_Y,
            drag_on_infinite_planes_enabled: DRAG_ON_INFINITE_PLANES_ENABLED,
            default_reference_height: WORLD_ORIGIN_HEIGHT,
        }
    }
}

/// Half of a cone opening angle, in radians. Openings above 360 degrees are
/// capped.
pub fn half_angle_radians(opening_angle_degrees: f32) -> f32 {
    (opening_angle_degrees.min(360.0) * 0.5).to_radians()
}

impl HitTestConfig {
    pub fn from_json_str(json: &str) -> Result<Self, HitTestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HitTestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, HitTestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Half-angle of the feature cone in radians.
    pub fn cone_half_angle_radians(&self) -> f32 {
        half_angle_radians(self.cone_opening_angle_degrees)
    }

    pub fn validate(&self) -> Result<(), HitTestError> {
        let floats = [
            ("cone_opening_angle_degrees", self.cone_opening_angle_degrees),
            ("feature_min_distance", self.feature_min_distance),
            ("feature_max_distance", self.feature_max_distance),
            ("infinite_plane_max_direction_y", self.infinite_plane_max_direction_y),
            ("default_reference_height", self.default_reference_height),
        ];
        if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(HitTestError::InvalidConfig(format!("{} must be finite", name)));
        }
        if self.cone_opening_angle_degrees <= 0.0 {
            return Err(HitTestError::InvalidConfig(
                "cone_opening_angle_degrees must be positive".into(),
            ));
        }
        if self.feature_min_distance < 0.0 || self.feature_min_distance > self.feature_max_distance {
            return Err(HitTestError::InvalidConfig(format!(
                "feature distance range {}..{} is empty",
                self.feature_min_distance, self.feature_max_distance
            )));
        }
        if self.feature_max_results == 0 {
            return Err(HitTestError::InvalidConfig(
                "feature_max_results must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Per-query options supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitTestOptions {
    /// Prefer the infinite plane even when a feature hit exists. Only honoured
    /// when `drag_on_infinite_planes_enabled` is set in the config.
    pub drag_on_infinite_plane: bool,
    /// Height of the infinite plane, typically the dragged object's height.
    pub reference_height: Option<f32>,
}
