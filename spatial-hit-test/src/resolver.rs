//! Priority chain that turns a ray into a single world position.
//!
//! Stages run in `RESOLVE_ORDER`; the first one that produces a finite
//! position wins.
//!
//! ```text
//! ExistingPlane       bounded plane anchors           hit_existing_plane = true
//! InfinitePlane       horizontal plane fallback       hit_existing_plane = true
//!                     (only if the cone search failed, or drag mode is on)
//! HighQualityFeature  cone-constrained feature hit    hit_existing_plane = false
//! NearestFeature      globally nearest feature        hit_existing_plane = false
//! ```
//!
//! The cone search result is computed at most once per query and shared by
//! the `InfinitePlane` gate and the `HighQualityFeature` stage.

use bevy::log::{debug, warn};
use bevy::math::{Vec2, Vec3};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

use crate::config::{HitTestConfig, HitTestOptions};
use crate::error::HitTestError;
use crate::features::{FeatureSearch, HitTestCandidate, nearest_feature};
use crate::infinite_plane::intersect_horizontal_plane;
use crate::math::HitRay;
use crate::plane::{PlaneAnchor, PlaneAnchorId, hit_test_planes};
use crate::projection::{CameraFrame, ViewportUnproject, project_ray};

/// Resolution strategies, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitStage {
    ExistingPlane,
    InfinitePlane,
    HighQualityFeature,
    NearestFeature,
}

pub const RESOLVE_ORDER: [HitStage; 4] = [
    HitStage::ExistingPlane,
    HitStage::InfinitePlane,
    HitStage::HighQualityFeature,
    HitStage::NearestFeature,
];

/// Outcome of resolving one tap. `position == None` means nothing was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedHit {
    pub position: Option<Vec3>,
    pub plane_anchor: Option<PlaneAnchorId>,
    pub hit_existing_plane: bool,
    /// Stage that produced the position.
    pub stage: Option<HitStage>,
}

impl ResolvedHit {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn is_hit(&self) -> bool {
        self.position.is_some()
    }

    fn at(stage: HitStage, position: Vec3, plane_anchor: Option<PlaneAnchorId>) -> Self {
        Self {
            position: Some(position),
            plane_anchor,
            hit_existing_plane: matches!(stage, HitStage::ExistingPlane | HitStage::InfinitePlane),
            stage: Some(stage),
        }
    }
}

/// Everything one resolution looks at. Borrowed from the caller's frame
/// snapshot and never retained.
pub struct HitQuery<'a> {
    pub ray: HitRay,
    pub planes: &'a [PlaneAnchor],
    pub features: &'a [Vec3],
    pub options: HitTestOptions,
    high_quality: OnceCell<Option<HitTestCandidate>>,
}

impl<'a> HitQuery<'a> {
    pub fn new(
        ray: HitRay,
        planes: &'a [PlaneAnchor],
        features: &'a [Vec3],
        options: HitTestOptions,
    ) -> Self {
        Self {
            ray,
            planes,
            features,
            options,
            high_quality: OnceCell::new(),
        }
    }
}

/// Resolves rays against the current plane and feature snapshot.
#[derive(Resource, Debug, Clone, Default)]
pub struct HitTestResolver {
    config: HitTestConfig,
}

impl HitTestResolver {
    pub fn new(config: HitTestConfig) -> Result<Self, HitTestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HitTestConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        ray: HitRay,
        planes: &[PlaneAnchor],
        features: &[Vec3],
        options: HitTestOptions,
    ) -> ResolvedHit {
        self.resolve_query(&HitQuery::new(ray, planes, features, options))
    }

    pub fn resolve_query(&self, query: &HitQuery<'_>) -> ResolvedHit {
        RESOLVE_ORDER
            .iter()
            .find_map(|&stage| self.evaluate(stage, query))
            .unwrap_or_else(|| {
                debug!("Hit test found nothing for ray {:?}", query.ray);
                ResolvedHit::miss()
            })
    }

    /// Project a screen point and resolve it.
    ///
    /// Fails only when no ray can be built; a ray that hits nothing resolves
    /// to `ResolvedHit::miss()`.
    pub fn resolve_screen_point(
        &self,
        screen_point: Vec2,
        frame: Option<&CameraFrame>,
        unproject: &impl ViewportUnproject,
        planes: &[PlaneAnchor],
        features: &[Vec3],
        options: HitTestOptions,
    ) -> Result<ResolvedHit, HitTestError> {
        let ray = project_ray(screen_point, frame, unproject)?;
        Ok(self.resolve(ray, planes, features, options))
    }

    /// Run a single stage. `None` means the stage did not apply or missed.
    pub fn evaluate(&self, stage: HitStage, query: &HitQuery<'_>) -> Option<ResolvedHit> {
        let resolved = match stage {
            HitStage::ExistingPlane => hit_test_planes(&query.ray, query.planes)
                .map(|hit| ResolvedHit::at(stage, hit.position, Some(hit.anchor))),
            HitStage::InfinitePlane => self
                .infinite_plane_hit(query)
                .map(|position| ResolvedHit::at(stage, position, None)),
            HitStage::HighQualityFeature => self
                .high_quality_feature(query)
                .map(|candidate| ResolvedHit::at(stage, candidate.position, None)),
            HitStage::NearestFeature => nearest_feature(&query.ray, query.features)
                .map(|candidate| ResolvedHit::at(stage, candidate.position, None)),
        }?;

        match resolved.position {
            Some(position) if position.is_finite() => {
                debug!("Hit test resolved by {:?} at {:?}", stage, position);
                Some(resolved)
            }
            _ => {
                warn!("Discarding non-finite {:?} hit", stage);
                None
            }
        }
    }

    /// Best cone-constrained feature candidate, computed once per query.
    pub fn high_quality_feature(&self, query: &HitQuery<'_>) -> Option<HitTestCandidate> {
        *query.high_quality.get_or_init(|| {
            FeatureSearch::from_config(&self.config)
                .search(&query.ray, query.features)
                .into_iter()
                .next()
        })
    }

    fn infinite_plane_hit(&self, query: &HitQuery<'_>) -> Option<Vec3> {
        let drag_requested =
            query.options.drag_on_infinite_plane && self.config.drag_on_infinite_planes_enabled;
        if !drag_requested && self.high_quality_feature(query).is_some() {
            return None;
        }

        // Planes above the camera, or rays almost parallel to the ground.
        if query.ray.direction().y > self.config.infinite_plane_max_direction_y {
            return None;
        }

        let plane_y = query
            .options
            .reference_height
            .unwrap_or(self.config.default_reference_height);
        intersect_horizontal_plane(&query.ray, plane_y)
    }
}
