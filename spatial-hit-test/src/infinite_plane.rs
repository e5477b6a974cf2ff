//! Unbounded horizontal plane intersection used as a fallback.

use bevy::math::Vec3;
use constants::hit_test::PARALLEL_EPSILON;

use crate::math::HitRay;

/// Intersect a ray with the unbounded horizontal plane at height `plane_y`.
///
/// A ray lying in the plane returns its origin. Rays parallel to but off the
/// plane, and planes behind the origin, miss.
pub fn intersect_horizontal_plane(ray: &HitRay, plane_y: f32) -> Option<Vec3> {
    if ray.direction().y.abs() < PARALLEL_EPSILON {
        return ((ray.origin().y - plane_y).abs() < PARALLEL_EPSILON).then_some(ray.origin());
    }

    let t = (plane_y - ray.origin().y) / ray.direction().y;
    if t < 0.0 {
        return None;
    }

    let mut hit = ray.point_at(t);
    // Remove rounding error so the hit lies exactly on the plane.
    hit.y = plane_y;
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ray(origin: Vec3, direction: Vec3) -> HitRay {
        HitRay::new(origin, direction).unwrap()
    }

    #[test]
    fn downward_ray_hits_at_plane_height() {
        let r = ray(Vec3::new(0.3, 1.7, -0.2), Vec3::new(0.4, -1.0, 0.25));
        for plane_y in [0.0, -0.75, 1.2] {
            let hit = intersect_horizontal_plane(&r, plane_y).unwrap();
            assert_relative_eq!(hit.y, plane_y, epsilon = 1e-6);
        }
    }

    #[test]
    fn upward_ray_hits_plane_above() {
        let hit = intersect_horizontal_plane(&ray(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)), 2.0).unwrap();
        assert_relative_eq!(hit.x, 2.0, epsilon = 1e-5);
        assert_eq!(hit.y, 2.0);
    }

    #[test]
    fn coincident_horizontal_ray_returns_origin() {
        let origin = Vec3::new(1.0, 0.5, 2.0);
        assert_eq!(intersect_horizontal_plane(&ray(origin, Vec3::X), 0.5), Some(origin));
    }

    #[test]
    fn parallel_offset_ray_misses() {
        assert!(intersect_horizontal_plane(&ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z), 0.0).is_none());
    }

    #[test]
    fn plane_behind_origin_misses() {
        assert!(intersect_horizontal_plane(&ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Y), 0.0).is_none());
    }
}
