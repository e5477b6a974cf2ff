use bevy::log::warn;
use bevy::math::Vec3;
use constants::hit_test::PARALLEL_EPSILON;

use super::anchor::{PlaneAnchor, PlaneAnchorId};
use crate::math::HitRay;

/// Intersection of a ray with a bounded plane anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    pub position: Vec3,
    /// Distance from the ray origin along the ray.
    pub distance: f32,
    pub anchor: PlaneAnchorId,
}

/// Intersect `ray` with a single anchor's rectangular surface.
///
/// Returns the world hit point and its distance along the ray. Hits on the
/// supporting plane outside the extent, behind the origin, or for rays parallel
/// to the surface are misses.
pub fn ray_hits_plane_anchor(ray: &HitRay, anchor: &PlaneAnchor) -> Option<(Vec3, f32)> {
    let det = anchor.transform.determinant();
    if !det.is_finite() || det.abs() < PARALLEL_EPSILON {
        warn!("Skipping {} with singular pose", anchor.id);
        return None;
    }

    let inv = anchor.transform.inverse();
    let o_local = inv.transform_point3(ray.origin());
    let d_local = inv.transform_vector3(ray.direction());

    // Local planes are horizontal: normal is local +Y.
    if d_local.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t_local = (anchor.center.y - o_local.y) / d_local.y;
    if t_local < 0.0 {
        return None;
    }

    let local_hit = o_local + d_local * t_local;
    if !anchor.contains_local(local_hit) {
        return None;
    }

    let world_hit = anchor.transform.transform_point3(local_hit);
    Some((world_hit, ray.project_t(world_hit)))
}

/// Closest bounded-plane hit along the ray. Equal distances keep the earlier
/// anchor.
pub fn hit_test_planes<'a>(
    ray: &HitRay,
    anchors: impl IntoIterator<Item = &'a PlaneAnchor>,
) -> Option<PlaneHit> {
    let mut best: Option<PlaneHit> = None;
    for anchor in anchors {
        let Some((position, distance)) = ray_hits_plane_anchor(ray, anchor) else {
            continue;
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(PlaneHit {
                position,
                distance,
                anchor: anchor.id,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::math::{Mat4, Quat, Vec2};

    fn down_from(origin: Vec3) -> HitRay {
        HitRay::new(origin, Vec3::NEG_Y).unwrap()
    }

    fn floor(id: u64, y: f32, half: f32) -> PlaneAnchor {
        PlaneAnchor::horizontal(PlaneAnchorId(id), Vec3::new(0.0, y, 0.0), Vec2::splat(half * 2.0))
    }

    #[test]
    fn hit_inside_extent() {
        let hit = hit_test_planes(&down_from(Vec3::new(0.0, 1.5, 0.0)), &[floor(1, 0.0, 1.0)]).unwrap();
        assert_eq!(hit.anchor, PlaneAnchorId(1));
        assert_relative_eq!(hit.position.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(hit.distance, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn miss_outside_extent_on_supporting_plane() {
        let ray = down_from(Vec3::new(1.5, 1.5, 0.0));
        assert!(hit_test_planes(&ray, &[floor(1, 0.0, 1.0)]).is_none());
    }

    #[test]
    fn miss_when_plane_is_behind_origin() {
        let ray = HitRay::new(Vec3::new(0.0, 1.5, 0.0), Vec3::Y).unwrap();
        assert!(hit_test_planes(&ray, &[floor(1, 0.0, 1.0)]).is_none());
    }

    #[test]
    fn miss_when_ray_parallel_to_surface() {
        let ray = HitRay::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!(hit_test_planes(&ray, &[floor(1, 0.0, 1.0)]).is_none());
    }

    #[test]
    fn nearest_of_stacked_planes_wins() {
        let ray = down_from(Vec3::new(0.0, 2.0, 0.0));
        let anchors = [floor(1, 0.0, 1.0), floor(2, 0.8, 1.0)];
        let hit = hit_test_planes(&ray, &anchors).unwrap();
        assert_eq!(hit.anchor, PlaneAnchorId(2));
        assert_relative_eq!(hit.distance, 1.2, epsilon = 1e-6);
    }

    #[test]
    fn equal_distance_keeps_first_anchor() {
        let ray = down_from(Vec3::new(0.0, 1.0, 0.0));
        let anchors = [floor(7, 0.0, 1.0), floor(3, 0.0, 1.0)];
        assert_eq!(hit_test_planes(&ray, &anchors).unwrap().anchor, PlaneAnchorId(7));
    }

    #[test]
    fn extent_is_measured_in_anchor_space() {
        // Rotate 90 degrees about Y: local X (2 m wide) now runs along world Z.
        let transform = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::ZERO,
        );
        let anchor = PlaneAnchor::new(PlaneAnchorId(1), Vec3::ZERO, Vec2::new(2.0, 0.5), transform);

        assert!(hit_test_planes(&down_from(Vec3::new(0.0, 1.0, 0.9)), &[anchor]).is_some());
        assert!(hit_test_planes(&down_from(Vec3::new(0.9, 1.0, 0.0)), &[anchor]).is_none());
    }

    #[test]
    fn singular_pose_is_skipped() {
        let anchor = PlaneAnchor::new(PlaneAnchorId(1), Vec3::ZERO, Vec2::ONE, Mat4::ZERO);
        assert!(hit_test_planes(&down_from(Vec3::Y), &[anchor]).is_none());
    }
}
