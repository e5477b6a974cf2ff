use bevy::math::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a tracked plane, assigned by the tracking subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneAnchorId(pub u64);

impl fmt::Display for PlaneAnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane#{}", self.0)
    }
}

/// A detected horizontal surface.
///
/// The surface lies in the anchor-local XZ plane at `center.y`, spanning
/// `extent.x` along local X and `extent.y` along local Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneAnchor {
    pub id: PlaneAnchorId,
    /// Centre of the surface in anchor-local coordinates.
    pub center: Vec3,
    /// Width (local X) and depth (local Z).
    pub extent: Vec2,
    /// Anchor-to-world pose.
    pub transform: Mat4,
}

impl PlaneAnchor {
    pub fn new(id: PlaneAnchorId, center: Vec3, extent: Vec2, transform: Mat4) -> Self {
        Self {
            id,
            center,
            extent,
            transform,
        }
    }

    /// Axis-aligned plane whose pose origin is its world-space centre.
    pub fn horizontal(id: PlaneAnchorId, world_center: Vec3, extent: Vec2) -> Self {
        Self::new(id, Vec3::ZERO, extent, Mat4::from_translation(world_center))
    }

    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point3(self.center)
    }

    /// Whether an anchor-local point lies within the rectangular extent.
    /// Height is not checked.
    pub fn contains_local(&self, local: Vec3) -> bool {
        let half = self.extent * 0.5;
        (local.x - self.center.x).abs() <= half.x && (local.z - self.center.z).abs() <= half.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_local_respects_extent_and_centre() {
        let anchor = PlaneAnchor::new(
            PlaneAnchorId(1),
            Vec3::new(1.0, 0.0, 0.0),
            Vec2::new(2.0, 1.0),
            Mat4::IDENTITY,
        );
        assert!(anchor.contains_local(Vec3::new(1.9, 0.0, 0.4)));
        assert!(anchor.contains_local(Vec3::new(0.0, 0.0, -0.5)));
        assert!(!anchor.contains_local(Vec3::new(-0.1, 0.0, 0.0)));
        assert!(!anchor.contains_local(Vec3::new(1.0, 0.0, 0.6)));
    }

    #[test]
    fn world_center_applies_pose() {
        let anchor = PlaneAnchor::new(
            PlaneAnchorId(2),
            Vec3::new(0.5, 0.0, 0.0),
            Vec2::ONE,
            Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        );
        assert_eq!(anchor.world_center(), Vec3::new(0.5, 1.0, 0.0));
    }
}
