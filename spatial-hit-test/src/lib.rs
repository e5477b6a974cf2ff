//! Spatial hit testing for tap-to-measure on a tracked camera view.
//!
//! Turns a screen tap into a 3D world position using whatever the tracking
//! subsystem currently knows about the scene: bounded plane anchors, a sparse
//! feature-point cloud, and as a last resort an assumed horizontal ground plane.
//!
//! ## Pipeline
//!
//! ```text
//! screen point + camera pose
//!   └─> project_ray()                 (NoActiveFrame if no pose)
//!       └─> HitTestResolver::resolve()
//!           ├─> 1. bounded plane anchors      (PlaneAnchorStore snapshot)
//!           ├─> 2. cone-constrained features  (computed, held back)
//!           ├─> 3. infinite horizontal plane  (only if 2 failed or drag mode)
//!           ├─> 4. result of 2
//!           └─> 5. nearest feature, unconstrained
//!               └─> ResolvedHit { position, plane_anchor, hit_existing_plane }
//! ```
//!
//! Geometric misses are values (`ResolvedHit::miss()`), not errors. Only a
//! missing camera pose or a degenerate direction produce `HitTestError`.
//!
//! ## Threading
//!
//! Resolution is pure computation over borrowed snapshots. `PlaneAnchorStore`
//! guards its arena with a read/write lock so tracking callbacks can upsert
//! and remove anchors while input handlers take snapshots.
//!
//! ## Bevy integration
//!
//! `HitTestPlugin` registers the store, resolver, tracking frame and a
//! `MeasureSession`, and resolves `ScreenTap` events into `TapResolved` and
//! `MeasurementCompleted` events.

pub mod config;
pub mod error;
pub mod features;
pub mod infinite_plane;
pub mod math;
pub mod measure;
pub mod plane;
pub mod plugin;
pub mod projection;
pub mod resolver;

pub use config::{HitTestConfig, HitTestOptions};
pub use error::HitTestError;
pub use features::{FeatureSearch, HitTestCandidate, SearchMode, nearest_feature};
pub use infinite_plane::intersect_horizontal_plane;
pub use math::{HitRay, normalize_checked};
pub use measure::{MeasureSession, Measurement};
pub use plane::{PlaneAnchor, PlaneAnchorId, PlaneAnchorStore, PlaneVisualConfig};
pub use plugin::{HitTestPlugin, ScreenTap, TapResolved, TrackingFrame};
pub use projection::{CameraFrame, ClipSpaceUnprojector, ViewportUnproject, project_ray};
pub use resolver::{HitStage, HitTestResolver, ResolvedHit};
