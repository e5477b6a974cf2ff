//! Tracked planar surfaces.
//!
//! Anchors arrive from the tracking subsystem and are kept in an id-indexed
//! arena (`PlaneAnchorStore`). Each stored anchor carries a renderer-agnostic
//! description of its debug and occlusion surfaces, rebuilt whenever the
//! anchor or the visual configuration changes.
//!
//! ## Hit testing
//!
//! ```text
//! world ray
//!   └─> anchor-local space (inverse pose)
//!       └─> intersect local horizontal plane through the anchor centre
//!           └─> reject if outside the rectangular extent
//!               └─> closest hit along the ray wins
//! ```

/// Plane anchor identity and geometry.
pub mod anchor;

/// Ray intersection against bounded plane anchors.
pub mod bounded;

/// Arena-backed anchor store with consistent snapshots.
pub mod store;

/// Debug and occlusion surface descriptions tied to anchor lifecycle.
pub mod visuals;

pub use anchor::{PlaneAnchor, PlaneAnchorId};
pub use bounded::{PlaneHit, hit_test_planes, ray_hits_plane_anchor};
pub use store::{PlaneAnchorStore, PlaneLifecycleEvent, TrackedPlane};
pub use visuals::{DebugSurface, OcclusionSurface, PlaneVisualConfig, PlaneVisuals};
