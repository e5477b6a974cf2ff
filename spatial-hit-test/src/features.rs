//! Proximity search over the tracked feature-point cloud.
//!
//! Each feature is scored by its perpendicular distance to the ray and
//! projected onto the ray to give a candidate position. The cloud is small
//! and rebuilt every frame, so every search is a linear scan with no index.

use bevy::log::debug;
use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::{HitTestConfig, half_angle_radians};
use crate::math::{HitRay, normalize_checked};

/// A feature point projected onto the hit-test ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTestCandidate {
    /// Point on the ray closest to the feature.
    pub position: Vec3,
    /// Distance from the ray origin to `position`.
    pub distance_along_ray: f32,
    /// The feature point itself.
    pub source_point: Vec3,
    /// Distance from the feature to the ray.
    pub perpendicular_distance: f32,
}

impl HitTestCandidate {
    pub fn from_feature(ray: &HitRay, feature: Vec3) -> Self {
        let position = ray.closest_point(feature);
        Self {
            position,
            distance_along_ray: (position - ray.origin()).length(),
            source_point: feature,
            perpendicular_distance: ray.perpendicular_distance(feature),
        }
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.distance_along_ray.is_finite()
            && self.perpendicular_distance.is_finite()
    }
}

/// Filtering applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchMode {
    /// Keep features within `half_angle` (radians) of the ray direction whose
    /// projection lies in `min_distance..=max_distance`. Ranked by distance
    /// along the ray.
    Cone {
        half_angle: f32,
        min_distance: f32,
        max_distance: f32,
    },
    /// Keep every feature. Ranked by perpendicular distance.
    Unconstrained,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSearch {
    pub mode: SearchMode,
    pub max_results: usize,
}

impl FeatureSearch {
    pub fn cone(
        opening_angle_degrees: f32,
        min_distance: f32,
        max_distance: f32,
        max_results: usize,
    ) -> Self {
        Self {
            mode: SearchMode::Cone {
                half_angle: half_angle_radians(opening_angle_degrees),
                min_distance,
                max_distance,
            },
            max_results,
        }
    }

    /// The high-quality cone search described by `config`.
    pub fn from_config(config: &HitTestConfig) -> Self {
        Self {
            mode: SearchMode::Cone {
                half_angle: config.cone_half_angle_radians(),
                min_distance: config.feature_min_distance,
                max_distance: config.feature_max_distance,
            },
            max_results: config.feature_max_results,
        }
    }

    /// Single globally nearest feature, regardless of direction or distance.
    pub fn unconstrained() -> Self {
        Self {
            mode: SearchMode::Unconstrained,
            max_results: 1,
        }
    }

    /// Candidates ordered best first, at most `max_results` of them.
    pub fn search(&self, ray: &HitRay, features: &[Vec3]) -> Vec<HitTestCandidate> {
        let mut results: Vec<HitTestCandidate> = features
            .iter()
            .filter(|f| f.is_finite())
            .filter_map(|&feature| self.accept(ray, feature))
            .collect();

        match self.mode {
            SearchMode::Cone { .. } => results.sort_by(by_distance_along_ray),
            SearchMode::Unconstrained => results.sort_by(by_perpendicular_distance),
        }
        results.truncate(self.max_results);

        debug!(
            "Feature search {:?}: {} of {} features kept",
            self.mode,
            results.len(),
            features.len()
        );
        results
    }

    fn accept(&self, ray: &HitRay, feature: Vec3) -> Option<HitTestCandidate> {
        let candidate = HitTestCandidate::from_feature(ray, feature);
        if !candidate.is_finite() {
            return None;
        }

        let SearchMode::Cone {
            half_angle,
            min_distance,
            max_distance,
        } = self.mode
        else {
            return Some(candidate);
        };

        if candidate.distance_along_ray < min_distance
            || candidate.distance_along_ray > max_distance
        {
            return None;
        }

        // A feature at the ray origin has no direction and cannot be in the cone.
        let to_feature = normalize_checked(feature - ray.origin()).ok()?;
        let angle = ray.direction().dot(to_feature).clamp(-1.0, 1.0).acos();
        if angle > half_angle {
            return None;
        }

        Some(candidate)
    }
}

/// Feature closest to the ray, projected onto it.
pub fn nearest_feature(ray: &HitRay, features: &[Vec3]) -> Option<HitTestCandidate> {
    FeatureSearch::unconstrained()
        .search(ray, features)
        .into_iter()
        .next()
}

fn by_distance_along_ray(a: &HitTestCandidate, b: &HitTestCandidate) -> Ordering {
    a.distance_along_ray
        .total_cmp(&b.distance_along_ray)
        .then(a.perpendicular_distance.total_cmp(&b.perpendicular_distance))
}

fn by_perpendicular_distance(a: &HitTestCandidate, b: &HitTestCandidate) -> Ordering {
    a.perpendicular_distance
        .total_cmp(&b.perpendicular_distance)
        .then(a.distance_along_ray.total_cmp(&b.distance_along_ray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn forward_ray() -> HitRay {
        HitRay::new(Vec3::ZERO, Vec3::Z).unwrap()
    }

    /// Point at `distance` from the origin, `degrees` off +Z towards +X.
    fn at_angle(degrees: f32, distance: f32) -> Vec3 {
        let r = degrees.to_radians();
        Vec3::new(r.sin(), 0.0, r.cos()) * distance
    }

    fn default_cone() -> FeatureSearch {
        FeatureSearch::from_config(&HitTestConfig::default())
    }

    #[test]
    fn candidate_projects_onto_ray() {
        let c = HitTestCandidate::from_feature(&forward_ray(), Vec3::new(0.3, 0.4, 1.0));
        assert_eq!(c.position, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(c.distance_along_ray, 1.0, epsilon = 1e-6);
        assert_relative_eq!(c.perpendicular_distance, 0.5, epsilon = 1e-6);
        assert_eq!(c.source_point, Vec3::new(0.3, 0.4, 1.0));
    }

    #[test]
    fn cone_excludes_points_outside_half_angle() {
        let features = [at_angle(20.0, 1.0)];
        assert!(default_cone().search(&forward_ray(), &features).is_empty());
    }

    #[test]
    fn cone_keeps_points_inside_half_angle() {
        let features = [at_angle(5.0, 1.0)];
        let results = default_cone().search(&forward_ray(), &features);
        assert_eq!(results.len(), 1);
        assert_relative_eq!(results[0].distance_along_ray, 5f32.to_radians().cos(), epsilon = 1e-5);
    }

    #[test]
    fn cone_excludes_points_outside_distance_range() {
        let features = [Vec3::new(0.0, 0.0, 0.1), Vec3::new(0.0, 0.0, 2.5)];
        assert!(default_cone().search(&forward_ray(), &features).is_empty());
    }

    #[test]
    fn cone_excludes_points_behind_origin() {
        let features = [Vec3::new(0.0, 0.0, -1.0)];
        assert!(default_cone().search(&forward_ray(), &features).is_empty());
    }

    #[test]
    fn cone_ranks_by_distance_along_ray() {
        let features = [
            at_angle(1.0, 1.5),
            at_angle(8.0, 0.5),
            at_angle(3.0, 1.0),
        ];
        let search = FeatureSearch::cone(18.0, 0.2, 2.0, 3);
        let results = search.search(&forward_ray(), &features);
        let order: Vec<Vec3> = results.iter().map(|c| c.source_point).collect();
        assert_eq!(order, vec![features[1], features[2], features[0]]);
    }

    #[test]
    fn cone_ties_break_on_perpendicular_distance() {
        let features = [Vec3::new(0.1, 0.0, 1.0), Vec3::new(0.02, 0.0, 1.0)];
        let search = FeatureSearch::cone(18.0, 0.2, 2.0, 2);
        let results = search.search(&forward_ray(), &features);
        assert_eq!(results[0].source_point, features[1]);
    }

    #[test]
    fn results_are_capped() {
        let features = [at_angle(1.0, 1.0), at_angle(1.0, 1.2), at_angle(1.0, 1.4)];
        assert_eq!(default_cone().search(&forward_ray(), &features).len(), 1);
    }

    #[test]
    fn unconstrained_finds_globally_nearest() {
        // Far outside the cone and range, but closest to the line.
        let features = [Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.01, 0.0, -10.0)];
        let nearest = nearest_feature(&forward_ray(), &features).unwrap();
        assert_eq!(nearest.source_point, features[1]);
        assert_eq!(nearest.position, Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn unconstrained_ties_break_on_distance_along_ray() {
        let features = [Vec3::new(0.5, 0.0, 3.0), Vec3::new(-0.5, 0.0, 1.0)];
        let search = FeatureSearch {
            mode: SearchMode::Unconstrained,
            max_results: 2,
        };
        let results = search.search(&forward_ray(), &features);
        let order: Vec<Vec3> = results.iter().map(|c| c.source_point).collect();
        assert_eq!(order, vec![features[1], features[0]]);
        assert_eq!(
            nearest_feature(&forward_ray(), &features).unwrap().position,
            Vec3::new(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn cone_constructor_matches_config_half_angle() {
        let config = HitTestConfig::default();
        let search = FeatureSearch::cone(
            config.cone_opening_angle_degrees,
            config.feature_min_distance,
            config.feature_max_distance,
            config.feature_max_results,
        );
        assert_eq!(search, FeatureSearch::from_config(&config));
    }

    #[test]
    fn unconstrained_on_empty_cloud_is_none() {
        assert!(nearest_feature(&forward_ray(), &[]).is_none());
    }

    #[test]
    fn non_finite_features_are_ignored() {
        let features = [Vec3::new(f32::NAN, 0.0, 1.0), Vec3::new(0.0, 0.1, 1.0)];
        let nearest = nearest_feature(&forward_ray(), &features).unwrap();
        assert_eq!(nearest.source_point, features[1]);
    }
}
