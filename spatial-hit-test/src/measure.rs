//! Marker placement and distance measurement between consecutive hits.

use bevy::log::info;
use bevy::math::Vec3;
use bevy::prelude::Resource;
use constants::measurement::{MEASUREMENT_LABEL_PRECISION, MIN_DRAWABLE_DISTANCE};
use serde::{Deserialize, Serialize};

use crate::plane::PlaneAnchorId;
use crate::resolver::ResolvedHit;

/// Notification name sent when an edge is completed.
pub const MEASURE_COMPLETED: &str = "measure_completed";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: u32,
    pub position: Vec3,
    pub plane_anchor: Option<PlaneAnchorId>,
}

/// Edge between two consecutive markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: u32,
    pub start_marker: u32,
    pub end_marker: u32,
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
    /// Midpoint of the edge, where the distance label is anchored.
    pub label_position: Vec3,
    pub label: String,
}

impl Measurement {
    fn between(id: u32, start: &Marker, end: &Marker) -> Self {
        let span = end.position - start.position;
        let distance = span.length();
        Self {
            id,
            start_marker: start.id,
            end_marker: end.id,
            start: start.position,
            end: end.position,
            distance,
            label_position: start.position + span / 2.0,
            label: format_distance(distance),
        }
    }

    /// Edges shorter than `MIN_DRAWABLE_DISTANCE` have no visible segment.
    pub fn is_drawable(&self) -> bool {
        self.distance > MIN_DRAWABLE_DISTANCE
    }

    pub fn notification_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "start": [self.start.x, self.start.y, self.start.z],
            "end": [self.end.x, self.end.y, self.end.z],
            "distance": self.distance,
            "label": self.label,
        })
    }
}

pub fn format_distance(distance: f32) -> String {
    format!("{:.*}", MEASUREMENT_LABEL_PRECISION, distance)
}

/// Marker placed by `MeasureSession::place`, plus the edge it closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub marker: Marker,
    pub measurement: Option<Measurement>,
}

/// Markers placed by successive taps, each connected to the one before.
#[derive(Resource, Debug, Default)]
pub struct MeasureSession {
    markers: Vec<Marker>,
    measurements: Vec<Measurement>,
    next_marker_id: u32,
    next_measurement_id: u32,
}

impl MeasureSession {
    /// Drop a marker at `position`. Non-finite positions are refused.
    pub fn place(
        &mut self,
        position: Vec3,
        plane_anchor: Option<PlaneAnchorId>,
    ) -> Option<Placement> {
        if !position.is_finite() {
            return None;
        }

        let marker = Marker {
            id: self.next_marker_id,
            position,
            plane_anchor,
        };
        self.next_marker_id += 1;

        let measurement = self.markers.last().map(|previous| {
            let m = Measurement::between(self.next_measurement_id, previous, &marker);
            self.next_measurement_id += 1;
            m
        });
        if let Some(m) = &measurement {
            info!("Measurement {} completed: {} m", m.id, m.label);
            self.measurements.push(m.clone());
        }
        self.markers.push(marker);

        Some(Placement {
            marker,
            measurement,
        })
    }

    /// Place a marker for a resolved tap, if it found a position.
    pub fn place_hit(&mut self, hit: &ResolvedHit) -> Option<Placement> {
        self.place(hit.position?, hit.plane_anchor)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn total_length(&self) -> f32 {
        self.measurements.iter().map(|m| m.distance).sum()
    }

    /// Forget all markers. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.measurements.clear();
    }
}
