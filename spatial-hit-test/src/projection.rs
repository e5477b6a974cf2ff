//! Screen-to-ray projection.
//!
//! A tap is turned into a world-space ray that starts at the camera and passes
//! through the tapped pixel's point on the far clipping plane.

use bevy::math::{Mat4, Vec2, Vec3};
use constants::coordinate_system::FAR_CLIP_NDC_DEPTH;
use serde::{Deserialize, Serialize};

use crate::error::HitTestError;
use crate::math::HitRay;

/// Camera pose for the current tracking frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Camera-to-world transform.
    pub world_transform: Mat4,
}

impl CameraFrame {
    pub fn new(world_transform: Mat4) -> Self {
        Self { world_transform }
    }

    pub fn position(&self) -> Vec3 {
        self.world_transform.w_axis.truncate()
    }
}

/// Maps a screen point to its world position on the far clipping plane.
///
/// Supplied by whatever owns the viewport; returns `None` when the point
/// cannot be unprojected.
pub trait ViewportUnproject {
    fn unproject_far(&self, screen_point: Vec2) -> Option<Vec3>;
}

impl<F> ViewportUnproject for F
where
    F: Fn(Vec2) -> Option<Vec3>,
{
    fn unproject_far(&self, screen_point: Vec2) -> Option<Vec3> {
        self(screen_point)
    }
}

/// Unprojection through an inverse view-projection matrix.
///
/// Screen points are in pixels with the origin at the top-left corner.
/// Depth is expected in the 0..1 range with the far plane at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpaceUnprojector {
    pub inverse_view_projection: Mat4,
    pub viewport_size: Vec2,
}

impl ClipSpaceUnprojector {
    pub fn new(view_projection: Mat4, viewport_size: Vec2) -> Self {
        Self {
            inverse_view_projection: view_projection.inverse(),
            viewport_size,
        }
    }

    /// Build from a camera pose and its projection matrix.
    pub fn from_camera(frame: &CameraFrame, projection: Mat4, viewport_size: Vec2) -> Self {
        let view = frame.world_transform.inverse();
        Self::new(projection * view, viewport_size)
    }

    fn screen_to_ndc(&self, screen_point: Vec2) -> Option<Vec2> {
        if self.viewport_size.x <= 0.0 || self.viewport_size.y <= 0.0 {
            return None;
        }
        let uv = screen_point / self.viewport_size;
        Some(Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0))
    }
}

impl ViewportUnproject for ClipSpaceUnprojector {
    fn unproject_far(&self, screen_point: Vec2) -> Option<Vec3> {
        let ndc = self.screen_to_ndc(screen_point)?;
        let world = self
            .inverse_view_projection
            .project_point3(ndc.extend(FAR_CLIP_NDC_DEPTH));
        world.is_finite().then_some(world)
    }
}

/// Build the hit-test ray for a screen point.
///
/// Fails with `NoActiveFrame` before touching any geometry when there is no
/// camera pose, or when the viewport cannot unproject the point.
pub fn project_ray(
    screen_point: Vec2,
    frame: Option<&CameraFrame>,
    unproject: &impl ViewportUnproject,
) -> Result<HitRay, HitTestError> {
    let frame = frame.ok_or(HitTestError::NoActiveFrame)?;
    let far_point = unproject
        .unproject_far(screen_point)
        .ok_or(HitTestError::NoActiveFrame)?;
    HitRay::through(frame.position(), far_point)
}
