/// Normalised device depth of the far clipping plane used when unprojecting
/// screen points (0..1 depth range, far = 1).
pub const FAR_CLIP_NDC_DEPTH: f32 = 1.0;

/// Height of the world origin, used as the infinite-plane height when the
/// caller gives no reference height.
pub const WORLD_ORIGIN_HEIGHT: f32 = 0.0;
