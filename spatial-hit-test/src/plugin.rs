//! ECS wiring for the hit-test pipeline.
//!
//! ```text
//! PlaneAnchorUpdate ──> apply_plane_anchor_updates ──> PlaneAnchorStore
//! ScreenTap ──> resolve_screen_taps ──> TapResolved ──> record_measurements
//!                 (TrackingFrame + store snapshot)         └─> MeasurementCompleted
//! ```

use bevy::prelude::*;

use crate::config::{HitTestConfig, HitTestOptions};
use crate::error::HitTestError;
use crate::measure::{MEASURE_COMPLETED, MeasureSession, Measurement};
use crate::plane::{PlaneAnchor, PlaneAnchorId, PlaneAnchorStore, PlaneVisualConfig};
use crate::projection::{CameraFrame, ClipSpaceUnprojector};
use crate::resolver::{HitTestResolver, ResolvedHit};

/// Latest tracking output. The host updates this every frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct TrackingFrame {
    /// `None` until tracking has produced a pose.
    pub camera: Option<CameraFrame>,
    pub projection: Mat4,
    pub viewport_size: Vec2,
    /// Raw feature points, replaced wholesale each frame.
    pub feature_points: Vec<Vec3>,
}

impl TrackingFrame {
    pub fn unprojector(&self) -> Option<ClipSpaceUnprojector> {
        self.camera
            .as_ref()
            .map(|camera| ClipSpaceUnprojector::from_camera(camera, self.projection, self.viewport_size))
    }
}

/// Anchor lifecycle notification from the tracking subsystem.
#[derive(Event, Debug, Clone)]
pub enum PlaneAnchorUpdate {
    Upsert(PlaneAnchor),
    Remove(PlaneAnchorId),
}

/// User tap in viewport pixels (top-left origin).
#[derive(Event, Debug, Clone, Copy)]
pub struct ScreenTap {
    pub screen_point: Vec2,
    pub options: HitTestOptions,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct TapResolved {
    pub screen_point: Vec2,
    pub hit: ResolvedHit,
}

#[derive(Event, Debug, Clone)]
pub struct MeasurementCompleted {
    pub measurement: Measurement,
    /// Notification name for `payload`, always `measure_completed`.
    pub method: &'static str,
    pub payload: serde_json::Value,
}

impl MeasurementCompleted {
    pub fn new(measurement: Measurement) -> Self {
        let payload = measurement.notification_payload();
        Self {
            measurement,
            method: MEASURE_COMPLETED,
            payload,
        }
    }
}

pub fn apply_plane_anchor_updates(
    mut updates: EventReader<PlaneAnchorUpdate>,
    store: Res<PlaneAnchorStore>,
) {
    for update in updates.read() {
        match update {
            PlaneAnchorUpdate::Upsert(anchor) => {
                store.upsert(*anchor);
            }
            PlaneAnchorUpdate::Remove(id) => {
                store.remove(*id);
            }
        }
    }
}

pub fn resolve_screen_taps(
    mut taps: EventReader<ScreenTap>,
    frame: Res<TrackingFrame>,
    store: Res<PlaneAnchorStore>,
    resolver: Res<HitTestResolver>,
    mut resolved: EventWriter<TapResolved>,
) {
    if taps.is_empty() {
        return;
    }

    let planes = store.snapshot();
    let Some(unprojector) = frame.unprojector() else {
        debug!("Ignoring {} tap(s): {}", taps.len(), HitTestError::NoActiveFrame);
        taps.clear();
        return;
    };

    for tap in taps.read() {
        match resolver.resolve_screen_point(
            tap.screen_point,
            frame.camera.as_ref(),
            &unprojector,
            &planes,
            &frame.feature_points,
            tap.options,
        ) {
            Ok(hit) => {
                resolved.write(TapResolved {
                    screen_point: tap.screen_point,
                    hit,
                });
            }
            Err(e) => debug!("Ignoring tap at {:?}: {}", tap.screen_point, e),
        }
    }
}

pub fn record_measurements(
    mut resolved: EventReader<TapResolved>,
    mut session: ResMut<MeasureSession>,
    mut completed: EventWriter<MeasurementCompleted>,
) {
    for tap in resolved.read() {
        let Some(placement) = session.place_hit(&tap.hit) else {
            continue;
        };
        if let Some(measurement) = placement.measurement {
            completed.write(MeasurementCompleted::new(measurement));
        }
    }
}

/// Registers the hit-test resources, events and systems.
pub struct HitTestPlugin {
    pub resolver: HitTestResolver,
    pub visuals: PlaneVisualConfig,
}

impl HitTestPlugin {
    pub fn new(config: HitTestConfig, visuals: PlaneVisualConfig) -> Result<Self, HitTestError> {
        Ok(Self {
            resolver: HitTestResolver::new(config)?,
            visuals,
        })
    }
}

impl Default for HitTestPlugin {
    fn default() -> Self {
        Self {
            resolver: HitTestResolver::default(),
            visuals: PlaneVisualConfig::default(),
        }
    }
}

impl Plugin for HitTestPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.resolver.clone())
            .insert_resource(PlaneAnchorStore::new(self.visuals))
            .init_resource::<TrackingFrame>()
            .init_resource::<MeasureSession>()
            .add_event::<PlaneAnchorUpdate>()
            .add_event::<ScreenTap>()
            .add_event::<TapResolved>()
            .add_event::<MeasurementCompleted>()
            .add_systems(
                Update,
                (
                    apply_plane_anchor_updates,
                    resolve_screen_taps,
                    record_measurements,
                )
                    .chain(),
            );
    }
}
