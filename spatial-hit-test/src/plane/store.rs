use bevy::log::info;
use bevy::prelude::Resource;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::anchor::{PlaneAnchor, PlaneAnchorId};
use super::visuals::{PlaneVisualConfig, PlaneVisuals};

/// Stored state for one tracked plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPlane {
    pub anchor: PlaneAnchor,
    pub visuals: PlaneVisuals,
}

/// What a store mutation did to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneLifecycleEvent {
    Added(PlaneAnchorId),
    Updated(PlaneAnchorId),
    Removed(PlaneAnchorId),
}

#[derive(Default)]
struct PlaneArena {
    slots: Vec<Option<TrackedPlane>>,
    index: HashMap<PlaneAnchorId, usize>,
    free: Vec<usize>,
    visual_config: PlaneVisualConfig,
}

impl PlaneArena {
    fn insert(&mut self, plane: TrackedPlane) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(plane);
                slot
            }
            None => {
                self.slots.push(Some(plane));
                self.slots.len() - 1
            }
        }
    }

    fn upsert(&mut self, anchor: PlaneAnchor) -> PlaneLifecycleEvent {
        let visuals = PlaneVisuals::build(&anchor, &self.visual_config);
        let plane = TrackedPlane { anchor, visuals };

        if let Some(&slot) = self.index.get(&anchor.id) {
            self.slots[slot] = Some(plane);
            info!("Plane anchor updated: {} (extent {:?})", anchor.id, anchor.extent);
            return PlaneLifecycleEvent::Updated(anchor.id);
        }

        let slot = self.insert(plane);
        self.index.insert(anchor.id, slot);
        info!("Plane anchor added: {} (extent {:?})", anchor.id, anchor.extent);
        PlaneLifecycleEvent::Added(anchor.id)
    }

    fn planes(&self) -> impl Iterator<Item = &TrackedPlane> {
        self.slots.iter().flatten()
    }
}

/// Live mapping from anchor id to tracked plane state.
///
/// Mutations take a write lock and snapshots a read lock, so a snapshot never
/// observes a half-applied update. Snapshots are copies; callers can hold them
/// across later updates. Ordering follows arena slots, which is stable for a
/// given sequence of updates.
#[derive(Resource, Default)]
pub struct PlaneAnchorStore {
    inner: RwLock<PlaneArena>,
}

impl PlaneAnchorStore {
    pub fn new(visual_config: PlaneVisualConfig) -> Self {
        Self {
            inner: RwLock::new(PlaneArena {
                visual_config,
                ..Default::default()
            }),
        }
    }

    /// Insert a new anchor or replace the stored state of an existing one.
    pub fn upsert(&self, anchor: PlaneAnchor) -> PlaneLifecycleEvent {
        self.inner.write().upsert(anchor)
    }

    /// Apply one tracking update's worth of anchors under a single write
    /// lock. Snapshots see either none or all of the batch.
    pub fn upsert_batch(
        &self,
        anchors: impl IntoIterator<Item = PlaneAnchor>,
    ) -> Vec<PlaneLifecycleEvent> {
        let mut arena = self.inner.write();
        anchors.into_iter().map(|anchor| arena.upsert(anchor)).collect()
    }

    /// Remove an anchor, returning its final state so attached surfaces can be
    /// torn down.
    pub fn remove(&self, id: PlaneAnchorId) -> Option<TrackedPlane> {
        let mut arena = self.inner.write();
        let slot = arena.index.remove(&id)?;
        let removed = arena.slots[slot].take();
        arena.free.push(slot);
        info!("Plane anchor removed: {}", id);
        removed
    }

    /// Consistent copy of every stored anchor.
    pub fn snapshot(&self) -> Vec<PlaneAnchor> {
        self.inner.read().planes().map(|p| p.anchor).collect()
    }

    pub fn get(&self, id: PlaneAnchorId) -> Option<TrackedPlane> {
        let arena = self.inner.read();
        let slot = *arena.index.get(&id)?;
        arena.slots[slot]
    }

    pub fn contains(&self, id: PlaneAnchorId) -> bool {
        self.inner.read().index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn visual_config(&self) -> PlaneVisualConfig {
        self.inner.read().visual_config
    }

    /// Change which sub-surfaces are maintained, rebuilding them for every
    /// stored anchor.
    pub fn set_visual_config(&self, config: PlaneVisualConfig) {
        let mut arena = self.inner.write();
        if arena.visual_config == config {
            return;
        }
        arena.visual_config = config;
        for plane in arena.slots.iter_mut().flatten() {
            plane.visuals = PlaneVisuals::build(&plane.anchor, &config);
        }
        info!(
            "Plane visuals updated: debug={}, occlusion={}",
            config.show_debug_visualization, config.use_occlusion_planes
        );
    }

    /// Drop every anchor, e.g. when tracking is reset.
    pub fn clear(&self) -> Vec<PlaneAnchorId> {
        let mut arena = self.inner.write();
        let removed: Vec<PlaneAnchorId> = arena.planes().map(|p| p.anchor.id).collect();
        let visual_config = arena.visual_config;
        *arena = PlaneArena {
            visual_config,
            ..Default::default()
        };
        info!("Plane anchor store cleared: {} anchor(s) removed", removed.len());
        removed
    }
}
