//! Vector and ray primitives shared by every hit-test stage.
//!
//! Vector arithmetic (add, subtract, scale, dot, cross, length) comes from
//! `bevy::math::Vec3`. This module adds checked normalisation and a ray type
//! whose direction is always unit length.

use bevy::math::{Dir3, Ray3d, Vec3};
use constants::hit_test::DEGENERATE_VECTOR_EPSILON;
use serde::{Deserialize, Serialize};

use crate::error::HitTestError;

/// Normalise `v`, failing when it is too short to have a direction.
pub fn normalize_checked(v: Vec3) -> Result<Vec3, HitTestError> {
    let length = v.length();
    if !length.is_finite() || length < DEGENERATE_VECTOR_EPSILON {
        return Err(HitTestError::DegenerateVector { length });
    }
    Ok(v / length)
}

/// Hit-test ray. `direction` is unit length; the only way in is through
/// `HitRay::new`, deserialisation included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RayParts", into = "RayParts")]
pub struct HitRay {
    origin: Vec3,
    direction: Vec3,
}

#[derive(Serialize, Deserialize)]
struct RayParts {
    origin: Vec3,
    direction: Vec3,
}

impl TryFrom<RayParts> for HitRay {
    type Error = HitTestError;

    fn try_from(parts: RayParts) -> Result<Self, Self::Error> {
        Self::new(parts.origin, parts.direction)
    }
}

impl From<HitRay> for RayParts {
    fn from(ray: HitRay) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction,
        }
    }
}

impl HitRay {
    /// Build a ray, normalising `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, HitTestError> {
        Ok(Self {
            origin,
            direction: normalize_checked(direction)?,
        })
    }

    /// Ray from `origin` through `target`.
    pub fn through(origin: Vec3, target: Vec3) -> Result<Self, HitTestError> {
        Self::new(origin, target - origin)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Signed distance along the ray of the point closest to `point`.
    pub fn project_t(&self, point: Vec3) -> f32 {
        self.direction.dot(point - self.origin)
    }

    /// Point on the (infinite) line through the ray closest to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.point_at(self.project_t(point))
    }

    /// Perpendicular distance from `point` to the line through the ray.
    pub fn perpendicular_distance(&self, point: Vec3) -> f32 {
        (point - self.origin).cross(self.direction).length()
    }
}

impl From<Ray3d> for HitRay {
    fn from(ray: Ray3d) -> Self {
        Self {
            origin: ray.origin,
            direction: *ray.direction,
        }
    }
}

impl From<HitRay> for Ray3d {
    fn from(ray: HitRay) -> Self {
        Ray3d::new(ray.origin, Dir3::new_unchecked(ray.direction))
    }
}
