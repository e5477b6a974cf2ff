use bevy::math::{Vec2, Vec3};
use constants::plane_visuals::{
    DEBUG_GRID_TILE_SIZE, DEBUG_PLANE_VERTICAL_OFFSET, OCCLUSION_PLANE_INSET,
    OCCLUSION_PLANE_VERTICAL_OFFSET, SHOW_DEBUG_VISUALIZATION, USE_OCCLUSION_PLANES,
};
use serde::{Deserialize, Serialize};

use super::anchor::PlaneAnchor;

/// Which per-plane sub-surfaces are maintained alongside each anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneVisualConfig {
    pub show_debug_visualization: bool,
    pub use_occlusion_planes: bool,
}

impl Default for PlaneVisualConfig {
    fn default() -> Self {
        Self {
            show_debug_visualization: SHOW_DEBUG_VISUALIZATION,
            use_occlusion_planes: USE_OCCLUSION_PLANES,
        }
    }
}

/// Grid surface drawn over a tracked plane. Positions are anchor-local.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugSurface {
    pub size: Vec2,
    pub local_position: Vec3,
    /// Grid texture repeat so one tile covers `DEBUG_GRID_TILE_SIZE` metres.
    pub texture_scale: Vec2,
    /// Texture offset that keeps the grid centred.
    pub texture_offset: Vec2,
}

impl DebugSurface {
    fn for_anchor(anchor: &PlaneAnchor) -> Self {
        let texture_scale = anchor.extent / DEBUG_GRID_TILE_SIZE;
        Self {
            size: anchor.extent,
            local_position: Vec3::new(
                anchor.center.x,
                DEBUG_PLANE_VERTICAL_OFFSET,
                anchor.center.z,
            ),
            texture_scale,
            texture_offset: (texture_scale - Vec2::ONE) * -0.5,
        }
    }
}

/// Depth-only surface that hides virtual content behind the real plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcclusionSurface {
    pub size: Vec2,
    pub local_position: Vec3,
}

impl OcclusionSurface {
    fn for_anchor(anchor: &PlaneAnchor) -> Self {
        Self {
            size: (anchor.extent - Vec2::splat(OCCLUSION_PLANE_INSET)).max(Vec2::ZERO),
            local_position: Vec3::new(
                anchor.center.x,
                OCCLUSION_PLANE_VERTICAL_OFFSET,
                anchor.center.z,
            ),
        }
    }
}

/// Sub-surfaces currently attached to an anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaneVisuals {
    pub debug: Option<DebugSurface>,
    pub occlusion: Option<OcclusionSurface>,
}

impl PlaneVisuals {
    pub fn build(anchor: &PlaneAnchor, config: &PlaneVisualConfig) -> Self {
        Self {
            debug: config
                .show_debug_visualization
                .then(|| DebugSurface::for_anchor(anchor)),
            occlusion: config
                .use_occlusion_planes
                .then(|| OcclusionSurface::for_anchor(anchor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::PlaneAnchorId;
    use approx::assert_relative_eq;
    use bevy::math::Mat4;

    fn anchor(extent: Vec2) -> PlaneAnchor {
        PlaneAnchor::new(PlaneAnchorId(1), Vec3::new(0.3, 0.0, -0.2), extent, Mat4::IDENTITY)
    }

    #[test]
    fn default_config_builds_debug_only() {
        let visuals = PlaneVisuals::build(&anchor(Vec2::new(1.2, 2.4)), &PlaneVisualConfig::default());
        let debug = visuals.debug.unwrap();
        assert!(visuals.occlusion.is_none());
        assert_eq!(debug.size, Vec2::new(1.2, 2.4));
        assert_eq!(debug.local_position, Vec3::new(0.3, -0.002, -0.2));
        assert_relative_eq!(debug.texture_scale.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(debug.texture_scale.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(debug.texture_offset.x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(debug.texture_offset.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn occlusion_surface_is_inset_and_lowered() {
        let config = PlaneVisualConfig {
            show_debug_visualization: false,
            use_occlusion_planes: true,
        };
        let visuals = PlaneVisuals::build(&anchor(Vec2::new(1.0, 0.03)), &config);
        let occlusion = visuals.occlusion.unwrap();
        assert!(visuals.debug.is_none());
        assert_relative_eq!(occlusion.size.x, 0.95, epsilon = 1e-6);
        assert_eq!(occlusion.size.y, 0.0);
        assert_eq!(occlusion.local_position, Vec3::new(0.3, -0.01, -0.2));
    }
}
